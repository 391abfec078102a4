//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/codebrief/) and project (.codebrief/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::ProviderConfig;
use crate::analyzer::Language;
use crate::constants::{analysis, llm, report};
use crate::pipeline::{BusinessRules, PipelineOptions};
use crate::types::{CodebriefError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What to analyze and where to write the report
    pub analysis: AnalysisConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Pipeline thresholds and narrative switches
    pub pipeline: PipelineOptions,

    /// Business-logic keyword / annotation / utility lists
    pub rules: BusinessRules,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `CodebriefError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(CodebriefError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(CodebriefError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(CodebriefError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        if !llm::SUPPORTED_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(CodebriefError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.llm.provider,
                llm::SUPPORTED_PROVIDERS.join(", ")
            )));
        }

        let threshold = self.pipeline.high_complexity_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(CodebriefError::Config(format!(
                "pipeline.high_complexity_threshold must be a non-negative number, got {}",
                threshold
            )));
        }

        if self.analysis.max_file_size == 0 {
            return Err(CodebriefError::Config(
                "analysis.max_file_size must be greater than 0".to_string(),
            ));
        }

        self.analysis.language()?;

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Codebase root
    pub path: PathBuf,

    /// Report file
    pub output: PathBuf,

    /// `auto` or a language tag (`java`, `python`, ...)
    pub target_language: String,

    /// Glob patterns to include (empty keeps everything)
    pub include: Vec<String>,

    /// Glob patterns to exclude
    pub exclude: Vec<String>,

    /// Maximum file size in bytes
    pub max_file_size: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            output: PathBuf::from(report::DEFAULT_OUTPUT_PATH),
            target_language: "auto".to_string(),
            include: Vec::new(),
            exclude: [
                "**/target/**",
                "**/build/**",
                "**/dist/**",
                "**/.git/**",
                "**/.idea/**",
                "**/.vscode/**",
                "**/node_modules/**",
                "**/venv/**",
                "**/env/**",
                "**/__pycache__/**",
                "**/*.pyc",
                "**/*.class",
                "**/*.jar",
                "**/*.war",
                "**/*.min.js",
                "**/*.min.css",
                "**/vendor/**",
                "**/coverage/**",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_file_size: analysis::MAX_FILE_SIZE,
        }
    }
}

impl AnalysisConfig {
    /// Language override, `None` for `auto`
    pub fn language(&self) -> Result<Option<Language>> {
        if self.target_language.trim().eq_ignore_ascii_case("auto") {
            return Ok(None);
        }
        self.target_language
            .parse::<Language>()
            .map(Some)
            .map_err(|_| {
                CodebriefError::Config(format!(
                    "Unknown target_language: {}",
                    self.target_language
                ))
            })
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Use the narrative service at all; `false` runs fully offline
    pub enabled: bool,

    /// Provider name
    pub provider: String,

    /// Model name (provider default when unset)
    pub model: Option<String>,

    /// Endpoint override
    pub api_base: Option<String>,

    /// Prefer the OPENAI_API_KEY / ANTHROPIC_API_KEY environment variables
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for LLM generation (0.0 = deterministic)
    pub temperature: f32,

    pub max_tokens: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: llm::DEFAULT_PROVIDER.to_string(),
            model: None,
            api_base: None,
            api_key: None,
            timeout_secs: llm::DEFAULT_TIMEOUT_SECS,
            temperature: llm::DEFAULT_TEMPERATURE,
            max_tokens: llm::DEFAULT_MAX_TOKENS,
        }
    }
}

impl LlmConfig {
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
            temperature: self.temperature,
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
