//! Pull the JSON object out of a model reply.
//!
//! Models often wrap JSON in Markdown fences or add a sentence before it.
//! We accept the reply if the whole text (after removing a fence) parses,
//! or failing that, the span from the first `{` to the last `}` does.

use serde_json::Value;

use crate::error::BedrockError;

pub fn extract_json(text: &str) -> Result<Value, BedrockError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(BedrockError::ResponseParse("empty reply".to_string()));
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return Ok(value);
    }

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&body[start..=end])
            .map_err(|e| BedrockError::ResponseParse(format!("invalid JSON object: {e}"))),
        _ => Err(BedrockError::ResponseParse(
            "no JSON object in reply".to_string(),
        )),
    }
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
