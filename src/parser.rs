use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;

/// Pull a JSON value of type `T` out of an LLM response.
///
/// Tries the whole text, then a fenced ```json block, then the span between
/// the first `{` and the last `}`.
pub fn extract_json<T: DeserializeOwned>(response: &str) -> Result<T> {
    let trimmed = response.trim();

    if let Ok(value) = serde_json::from_str::<T>(trimmed) {
        return Ok(value);
    }

    if let Some(block) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<T>(block) {
            return Ok(value);
        }
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => serde_json::from_str::<T>(&trimmed[start..=end])
            .map_err(|e| anyhow!("Failed to parse JSON from response: {}", e)),
        _ => Err(anyhow!("No JSON object found in response")),
    }
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    // Skip a language tag such as `json`
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}
