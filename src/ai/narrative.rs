//! Narrative Service
//!
//! The pipeline's only view of the language model. Every operation is
//! best-effort: failures come back as `None` or an empty list and are logged,
//! never propagated.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::prompt;
use super::provider::SharedProvider;
use crate::types::{
    ComplexityMetrics, ComplexitySummary, ComponentMap, ErrorClassifier, ProjectContext,
    StatisticsSummary,
};

// =============================================================================
// Overview Exchange Types
// =============================================================================

/// Inputs for the project overview request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverviewRequest {
    pub readme: Option<String>,
    /// Contents of the language build file (pom.xml, package.json, ...)
    pub build_file: Option<String>,
    /// Relative source paths
    pub file_structure: Vec<String>,
    pub language: String,
    pub frameworks: Vec<String>,
}

/// Overview fields as returned by the model. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverviewDraft {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub key_technologies: Option<Vec<String>>,
    pub architecture_pattern: Option<String>,
    pub main_features: Option<Vec<String>>,
    pub dependencies: Option<Vec<String>>,
}

impl OverviewDraft {
    /// Read a draft leniently: lists may arrive as comma-separated strings
    /// and blank values count as missing.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        Self {
            project_name: text_field(value, "project_name"),
            description: text_field(value, "description"),
            purpose: text_field(value, "purpose"),
            key_technologies: list_field(value, "key_technologies"),
            architecture_pattern: text_field(value, "architecture_pattern"),
            main_features: list_field(value, "main_features"),
            dependencies: list_field(value, "dependencies"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Narrative Service Trait
// =============================================================================

#[async_trait]
pub trait NarrativeService: Send + Sync {
    /// 2-3 sentence reading of the complexity figures
    async fn interpret_complexity(
        &self,
        metrics: &ComplexityMetrics,
        context: &ProjectContext,
    ) -> Option<String>;

    /// One-sentence description of a method
    async fn describe_method(
        &self,
        signature: &str,
        class_name: &str,
        annotations: &[String],
    ) -> Option<String>;

    /// Raw aspect lines; the aspect identifier cleans and filters them
    async fn identify_aspects(
        &self,
        statistics: &StatisticsSummary,
        complexity: &ComplexitySummary,
        components: &ComponentMap,
        context: &ProjectContext,
    ) -> Option<Vec<String>>;

    async fn recommend(&self, summary: &str) -> Vec<String>;

    async fn project_overview(&self, request: &OverviewRequest) -> Option<OverviewDraft>;
}

// =============================================================================
// LLM-backed Narrator
// =============================================================================

pub struct LlmNarrator {
    provider: SharedProvider,
}

impl LlmNarrator {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    async fn ask(&self, operation: &str, prompt: &str, schema: &Value) -> Option<Value> {
        match self.provider.generate(prompt, schema).await {
            Ok(response) => {
                debug!(
                    operation,
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Narrative request completed"
                );
                Some(response.content)
            }
            Err(e) => {
                let error = ErrorClassifier::classify_error(&e, self.provider.name());
                warn!("{} request failed: {}", operation, error);
                None
            }
        }
    }
}

#[async_trait]
impl NarrativeService for LlmNarrator {
    async fn interpret_complexity(
        &self,
        metrics: &ComplexityMetrics,
        context: &ProjectContext,
    ) -> Option<String> {
        let prompt = prompt::complexity_interpretation(metrics, context);
        let value = self
            .ask("interpret_complexity", &prompt, &text_schema("interpretation"))
            .await?;
        text_field(&value, "interpretation")
    }

    async fn describe_method(
        &self,
        signature: &str,
        class_name: &str,
        annotations: &[String],
    ) -> Option<String> {
        let prompt = prompt::method_description(signature, class_name, annotations);
        let value = self
            .ask("describe_method", &prompt, &text_schema("description"))
            .await?;
        text_field(&value, "description")
            .map(|d| unquote(&d))
            .filter(|d| !d.is_empty())
    }

    async fn identify_aspects(
        &self,
        statistics: &StatisticsSummary,
        complexity: &ComplexitySummary,
        components: &ComponentMap,
        context: &ProjectContext,
    ) -> Option<Vec<String>> {
        let prompt = prompt::noteworthy_aspects(statistics, complexity, components, context);
        let value = self
            .ask("identify_aspects", &prompt, &list_schema("aspects"))
            .await?;
        raw_lines(&value, "aspects")
    }

    async fn recommend(&self, summary: &str) -> Vec<String> {
        let prompt = prompt::recommendations(summary);
        self.ask("recommend", &prompt, &list_schema("recommendations"))
            .await
            .and_then(|value| list_field(&value, "recommendations"))
            .unwrap_or_default()
    }

    async fn project_overview(&self, request: &OverviewRequest) -> Option<OverviewDraft> {
        let prompt = prompt::project_overview(request);
        let value = self
            .ask("project_overview", &prompt, &overview_schema())
            .await?;
        Some(OverviewDraft::from_value(&value)).filter(|draft| !draft.is_empty())
    }
}

// =============================================================================
// Offline Narrator
// =============================================================================

/// Narrator for runs without a model; every request comes back empty
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineNarrator;

#[async_trait]
impl NarrativeService for OfflineNarrator {
    async fn interpret_complexity(&self, _: &ComplexityMetrics, _: &ProjectContext) -> Option<String> {
        None
    }

    async fn describe_method(&self, _: &str, _: &str, _: &[String]) -> Option<String> {
        None
    }

    async fn identify_aspects(
        &self,
        _: &StatisticsSummary,
        _: &ComplexitySummary,
        _: &ComponentMap,
        _: &ProjectContext,
    ) -> Option<Vec<String>> {
        None
    }

    async fn recommend(&self, _: &str) -> Vec<String> {
        Vec::new()
    }

    async fn project_overview(&self, _: &OverviewRequest) -> Option<OverviewDraft> {
        None
    }
}

// =============================================================================
// Schemas & Response Helpers
// =============================================================================

fn text_schema(field: &str) -> Value {
    json!({
        "type": "object",
        "properties": { field: { "type": "string" } },
        "required": [field]
    })
}

fn list_schema(field: &str) -> Value {
    json!({
        "type": "object",
        "properties": { field: { "type": "array", "items": { "type": "string" } } },
        "required": [field]
    })
}

fn overview_schema() -> Value {
    let list = json!({ "type": "array", "items": { "type": "string" } });
    json!({
        "type": "object",
        "properties": {
            "project_name": { "type": "string" },
            "description": { "type": "string" },
            "purpose": { "type": "string" },
            "key_technologies": list,
            "architecture_pattern": { "type": "string" },
            "main_features": list,
            "dependencies": list
        },
        "required": ["project_name", "description", "purpose"]
    })
}

/// Non-blank string under `field`, or the value itself when the model
/// answered with a bare string
fn text_field(value: &Value, field: &str) -> Option<String> {
    let text = match value {
        Value::String(s) => s.as_str(),
        _ => value.get(field)?.as_str()?,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Non-blank strings from an array under `field` (or a bare array). A string
/// is split on commas.
fn list_field(value: &Value, field: &str) -> Option<Vec<String>> {
    let target = match value {
        Value::Array(_) => value,
        _ => value.get(field)?,
    };

    let items: Vec<String> = match target {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => return None,
    };

    (!items.is_empty()).then_some(items)
}

/// Aspect lines as the model wrote them. A single string is split into lines.
fn raw_lines(value: &Value, field: &str) -> Option<Vec<String>> {
    let target = match value {
        Value::Array(_) | Value::String(_) => value,
        _ => value.get(field)?,
    };

    let lines: Vec<String> = match target {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(str::lines)
            .map(String::from)
            .collect(),
        Value::String(s) => s.lines().map(String::from).collect(),
        _ => return None,
    };

    (!lines.is_empty()).then_some(lines)
}

fn unquote(text: &str) -> String {
    text.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string()
}

// =============================================================================
// Test Doubles
// =============================================================================

#[cfg(test)]
pub mod testing {
    //! Scripted narrator and provider used across the crate's tests

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::ai::provider::{LlmProvider, LlmResponse};
    use crate::types::{CodebriefError, Result};

    /// Narrator with canned answers that records every call
    #[derive(Default)]
    pub struct ScriptedNarrator {
        interpretation: Option<String>,
        descriptions: HashMap<String, String>,
        default_description: Option<String>,
        aspects: Option<Vec<String>>,
        recommendations: Vec<String>,
        overview: Option<OverviewDraft>,
        calls: Mutex<Vec<&'static str>>,
        described: Mutex<Vec<String>>,
        overview_requests: Mutex<Vec<OverviewRequest>>,
    }

    impl ScriptedNarrator {
        pub fn with_interpretation(mut self, text: &str) -> Self {
            self.interpretation = Some(text.to_string());
            self
        }

        /// Answer for one signature; other signatures fail unless a default is set
        pub fn with_description(mut self, signature: &str, text: &str) -> Self {
            self.descriptions
                .insert(signature.to_string(), text.to_string());
            self
        }

        pub fn with_default_description(mut self, text: &str) -> Self {
            self.default_description = Some(text.to_string());
            self
        }

        pub fn with_aspects(mut self, lines: &[&str]) -> Self {
            self.aspects = Some(lines.iter().map(|s| s.to_string()).collect());
            self
        }

        pub fn with_recommendations(mut self, items: &[&str]) -> Self {
            self.recommendations = items.iter().map(|s| s.to_string()).collect();
            self
        }

        pub fn with_overview(mut self, draft: OverviewDraft) -> Self {
            self.overview = Some(draft);
            self
        }

        /// Number of calls made to `operation`
        pub fn calls(&self, operation: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|op| **op == operation)
                .count()
        }

        pub fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Signatures passed to `describe_method`, in call order
        pub fn described(&self) -> Vec<String> {
            self.described.lock().unwrap().clone()
        }

        /// Requests passed to `project_overview`, in call order
        pub fn overview_requests(&self) -> Vec<OverviewRequest> {
            self.overview_requests.lock().unwrap().clone()
        }

        fn record(&self, operation: &'static str) {
            self.calls.lock().unwrap().push(operation);
        }
    }

    #[async_trait]
    impl NarrativeService for ScriptedNarrator {
        async fn interpret_complexity(
            &self,
            _: &ComplexityMetrics,
            _: &ProjectContext,
        ) -> Option<String> {
            self.record("interpret_complexity");
            self.interpretation.clone()
        }

        async fn describe_method(&self, signature: &str, _: &str, _: &[String]) -> Option<String> {
            self.record("describe_method");
            self.described.lock().unwrap().push(signature.to_string());
            self.descriptions
                .get(signature)
                .cloned()
                .or_else(|| self.default_description.clone())
        }

        async fn identify_aspects(
            &self,
            _: &StatisticsSummary,
            _: &ComplexitySummary,
            _: &ComponentMap,
            _: &ProjectContext,
        ) -> Option<Vec<String>> {
            self.record("identify_aspects");
            self.aspects.clone()
        }

        async fn recommend(&self, _: &str) -> Vec<String> {
            self.record("recommend");
            self.recommendations.clone()
        }

        async fn project_overview(&self, request: &OverviewRequest) -> Option<OverviewDraft> {
            self.record("project_overview");
            self.overview_requests.lock().unwrap().push(request.clone());
            self.overview.clone()
        }
    }

    /// Provider returning one fixed reply (or error) for every request
    pub struct MockProvider {
        reply: std::result::Result<Value, String>,
        pub call_count: AtomicU32,
        pub last_prompt: Mutex<String>,
    }

    impl MockProvider {
        pub fn replying(reply: Value) -> Self {
            Self {
                reply: Ok(reply),
                call_count: AtomicU32::new(0),
                last_prompt: Mutex::new(String::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                call_count: AtomicU32::new(0),
                last_prompt: Mutex::new(String::new()),
            }
        }

        pub fn calls(&self) -> u32 {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn generate(&self, prompt: &str, _schema: &Value) -> Result<LlmResponse> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            match &self.reply {
                Ok(value) => Ok(LlmResponse::content_only(value.clone())),
                Err(message) => Err(CodebriefError::LlmApi(message.clone())),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }
}
