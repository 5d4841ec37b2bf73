//! Helpers for reading stage artifacts
//!
//! Models often wrap structured output in Markdown code fences. These helpers
//! find the structured part when there is one and leave plain text alone.

use serde_json::Value;

/// Field holding the article when the final artifact is a structured record
pub const FINAL_OUTPUT_FIELD: &str = "final_output";

/// Body of the first fenced code block, preferring a block tagged `lang`
///
/// Handles:
/// - ```json (or any `lang`) blocks
/// - Generic ``` blocks
pub fn extract_fenced<'a>(text: &'a str, lang: &str) -> Option<&'a str> {
    let tagged = format!("```{}", lang);
    let start = match text.find(&tagged) {
        Some(pos) => pos + tagged.len(),
        None => {
            let pos = text.find("```")? + 3;
            // Skip an info string such as `yaml` on the opening fence
            text[pos..].find('\n').map(|nl| pos + nl)?
        }
    };
    let end = text[start..].find("```").map(|pos| pos + start)?;
    Some(text[start..end].trim())
}

/// Parse an artifact as JSON, directly or from inside a fenced block
pub fn parse_json_artifact(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }
    extract_fenced(trimmed, "json").and_then(|body| serde_json::from_str(body).ok())
}

/// Text to write as the final article
///
/// A JSON object carrying a string `final_output` yields that field; any
/// other artifact is returned unchanged.
pub fn final_text(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Object(record)) => match record.get(FINAL_OUTPUT_FIELD) {
            Some(Value::String(text)) => text.clone(),
            _ => raw.to_string(),
        },
        _ => raw.to_string(),
    }
}

/// JSON document persisted for an intermediate artifact
pub fn intermediate_value(raw: &str) -> Value {
    parse_json_artifact(raw).unwrap_or_else(|| Value::String(raw.to_string()))
}
