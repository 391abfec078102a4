//! AI Integration Layer
//!
//! LLM providers, prompt construction and the narrative service the
//! analysis pipeline talks to.

pub mod json_repair;
pub mod narrative;
pub mod prompt;
pub mod provider;

pub use json_repair::extract_json;
pub use narrative::{
    LlmNarrator, NarrativeService, OfflineNarrator, OverviewDraft, OverviewRequest,
};
pub use prompt::PromptBuilder;
pub use provider::{
    AnthropicProvider, LlmProvider, LlmResponse, OllamaProvider, OpenAiProvider, ProviderConfig,
    ResponseMetadata, SharedProvider, TokenUsage, create_provider,
};
