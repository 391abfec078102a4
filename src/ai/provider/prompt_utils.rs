//! Schema instructions shared by the providers

use serde_json::Value;

const ANALYST_ROLE: &str = "You are an expert software analyst. Always respond with valid JSON.";

fn schema_block(schema: &Value) -> Option<String> {
    if schema.is_null() {
        return None;
    }
    let rendered = serde_json::to_string_pretty(schema).ok()?;
    Some(format!(
        "Respond with valid JSON matching this schema:\n```json\n{}\n```\n\nRespond ONLY with valid JSON, no explanation.",
        rendered
    ))
}

/// System message for chat-style APIs (OpenAI, Anthropic)
pub fn system_prompt(schema: &Value) -> String {
    match schema_block(schema) {
        Some(block) => format!("{}\n\n{}", ANALYST_ROLE, block),
        None => ANALYST_ROLE.to_string(),
    }
}

/// Single prompt with schema instructions appended, for completion APIs
/// that take no system message (Ollama)
pub fn build_schema_prompt(user_prompt: &str, schema: &Value) -> String {
    match schema_block(schema) {
        Some(block) => format!("{}\n\n---\n\n{}", user_prompt, block),
        None => user_prompt.to_string(),
    }
}
