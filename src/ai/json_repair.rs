//! JSON extraction for model replies
//!
//! Models wrap JSON in code fences, prepend prose, leave trailing commas, or
//! stop mid-document when they hit the token limit. [`extract_json`] tries a
//! short sequence of increasingly lenient readings and returns the first one
//! that parses.

use serde_json::Value;
use tracing::debug;

use crate::types::{CodebriefError, Result};

/// Parse a model reply into JSON.
///
/// Order of attempts: the cleaned text as-is, the cleaned text after
/// repair, then the first embedded object or array found in the text
/// (repaired as well).
pub fn extract_json(reply: &str) -> Result<Value> {
    let cleaned = clean(reply);

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Ok(value);
    }

    let repaired = repair(cleaned);
    if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
        debug!("Parsed model reply after repair");
        return Ok(value);
    }

    if let Some(embedded) = embedded_json(cleaned) {
        let candidate = repair(embedded);
        if let Ok(value) = serde_json::from_str::<Value>(&candidate) {
            debug!("Parsed JSON embedded in model reply");
            return Ok(value);
        }
    }

    let preview: String = cleaned.chars().take(200).collect();
    Err(CodebriefError::LlmApi(format!(
        "Model reply is not valid JSON: {preview}"
    )))
}

/// Trim whitespace and BOM, and unwrap a surrounding code fence
fn clean(reply: &str) -> &str {
    let mut text = reply.trim().trim_start_matches('\u{feff}').trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string (`json`, `JSON`, ...) up to the first newline
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
        if let Some(body) = text.trim_end().strip_suffix("```") {
            text = body;
        }
    }

    text.trim()
}

/// Remove trailing commas, close an unterminated string, and append the
/// closers for any still-open containers in nesting order.
fn repair(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut open: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' => {
                drop_trailing_comma(&mut out);
                if open.last() == Some(&ch) {
                    open.pop();
                }
            }
            _ => {}
        }
        out.push(ch);
    }

    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }

    drop_trailing_comma(&mut out);
    while let Some(closer) = open.pop() {
        out.push(closer);
    }
    out
}

fn drop_trailing_comma(out: &mut String) {
    let kept = out.trim_end().len();
    if out[..kept].ends_with(',') {
        out.truncate(kept - 1);
    }
}

/// Slice from the first `{` or `[` to its matching closer, or to the end of
/// the text when the document is cut off.
fn embedded_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let body = &text[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in body.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&body[..offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    Some(body)
}
