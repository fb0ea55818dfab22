//! Decoding of model replies that are supposed to be JSON but are not
//! trusted to be.

use serde::de::DeserializeOwned;
use tracing::warn;

const FENCE: &str = "```";

/// Strip a Markdown code fence (with or without a language tag) wrapped
/// around the payload. Text outside the fence is dropped. Replies without a
/// fence are returned trimmed.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find(FENCE) else {
        return trimmed;
    };
    let body = &trimmed[start + FENCE.len()..];
    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let body = match body.rfind(FENCE) {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

/// Decode `reply` as `T`, or produce `fallback()` when it does not decode.
///
/// A reply that is already valid JSON is taken as is, so backticks inside
/// its string values are left alone. Fences are only stripped otherwise.
pub fn decode_or_else<T, F>(reply: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let trimmed = reply.trim();
    if !trimmed.starts_with(FENCE) {
        if let Ok(value) = serde_json::from_str(trimmed) {
            return value;
        }
    }
    match serde_json::from_str(strip_code_fences(trimmed)) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "model reply did not match the requested schema");
            fallback()
        }
    }
}
