//! Ollama local model provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, TokenUsage, http_client,
    prompt_utils,
};
use crate::ai::json_repair::extract_json;
use crate::types::{CodebriefError, ErrorCategory, ErrorClassifier, LlmError, Result};

const DEFAULT_API_BASE: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "codellama";
const PROVIDER: &str = "ollama";

#[derive(Debug)]
pub struct OllamaProvider {
    api_base: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_base = validate_endpoint(config.api_base.as_deref().unwrap_or(DEFAULT_API_BASE))?;

        Ok(Self {
            api_base,
            model: config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: config.temperature,
            client: http_client(config.timeout_secs)?,
        })
    }

    fn build_request(&self, prompt: &str, schema: &Value) -> GenerateRequest {
        GenerateRequest {
            model: self.model.clone(),
            prompt: prompt_utils::build_schema_prompt(prompt, schema),
            stream: false,
            format: "json",
            options: GenerateOptions {
                temperature: self.temperature,
            },
        }
    }
}

/// Accept only http(s) endpoints. Remote hosts are allowed with a warning.
fn validate_endpoint(endpoint: &str) -> Result<String> {
    let url = url::Url::parse(endpoint).map_err(|e| {
        CodebriefError::Config(format!("Invalid Ollama endpoint '{}': {}", endpoint, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CodebriefError::Config(format!(
            "Ollama endpoint must use http or https, got: {}",
            url.scheme()
        )));
    }

    if let Some(host) = url.host_str()
        && !matches!(host, "localhost" | "127.0.0.1" | "[::1]")
    {
        warn!("Ollama endpoint is not local: {}", host);
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<LlmResponse> {
        debug!("Requesting generation from Ollama (model: {})", self.model);

        let response = self
            .client
            .post(format!("{}/api/generate", self.api_base))
            .json(&self.build_request(prompt, schema))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    CodebriefError::Llm(LlmError::with_provider(
                        ErrorCategory::Network,
                        format!(
                            "Failed to connect to Ollama at {}. Is `ollama serve` running?",
                            self.api_base
                        ),
                        PROVIDER,
                    ))
                } else {
                    CodebriefError::LlmApi(format!("Ollama request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Ollama API error ({}): {}", status, body),
                PROVIDER,
            )
            .into());
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CodebriefError::LlmApi(format!("Failed to parse Ollama response: {}", e)))?;

        let usage = TokenUsage::new(
            body.prompt_eval_count.unwrap_or(0),
            body.eval_count.unwrap_or(0),
        );

        Ok(LlmResponse::new(
            extract_json(&body.response)?,
            usage,
            ResponseMetadata::new(PROVIDER, &self.model),
        ))
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(api_base: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            provider: PROVIDER.to_string(),
            api_base: api_base.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let provider = OllamaProvider::new(config(None)).unwrap();
        assert_eq!(provider.api_base, DEFAULT_API_BASE);
        assert_eq!(provider.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_endpoint_validation() {
        assert!(OllamaProvider::new(config(Some("ftp://localhost:11434"))).is_err());
        assert!(OllamaProvider::new(config(Some("not a url"))).is_err());

        let provider = OllamaProvider::new(config(Some("http://gpu-box:11434/"))).unwrap();
        assert_eq!(provider.api_base, "http://gpu-box:11434");
    }

    #[test]
    fn test_request_shape() {
        let provider = OllamaProvider::new(config(None)).unwrap();
        let schema = json!({"type": "object"});
        let request = serde_json::to_value(provider.build_request("Explain", &schema)).unwrap();

        assert_eq!(request["format"], "json");
        assert_eq!(request["stream"], false);
        assert!(request["prompt"].as_str().unwrap().starts_with("Explain"));
    }

    #[test]
    fn test_response_counts_are_optional() {
        let body: GenerateResponse =
            serde_json::from_value(json!({"response": "{}"})).unwrap();
        assert_eq!(body.prompt_eval_count, None);
    }
}
