//! Normalizing the model's final answer into a JSON string.
//!
//! 1. parse the answer as-is
//! 2. otherwise cut it after the last `}` and parse that prefix
//! 3. otherwise return a synthesized error object
//!
//! [`recover_json`] always returns a valid JSON string.

use serde_json::{Value, json};

/// Characters of the original answer kept in the fallback payload.
const ORIGINAL_PREVIEW_CHARS: usize = 500;

const FALLBACK_ERROR: &str = "Failed to parse the model response as JSON; it may have been truncated";
const FALLBACK_SUGGESTION: &str = "Try simplifying the input or raising max_tokens";

/// Why a model answer could not be turned into JSON.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecoveryError {
    #[error("empty response from model")]
    Empty,

    #[error("invalid JSON ({parse}); truncation recovery failed ({recovery})")]
    Unrecoverable { parse: String, recovery: String },
}

/// Parse a model answer, trying truncation recovery once.
pub fn parse_model_json(raw: &str) -> Result<Value, RecoveryError> {
    if raw.trim().is_empty() {
        return Err(RecoveryError::Empty);
    }

    let parse_err = match serde_json::from_str::<Value>(raw) {
        Ok(value) => return Ok(value),
        Err(e) => e.to_string(),
    };

    let recovery = match raw.rfind('}') {
        Some(idx) if idx > 0 => match serde_json::from_str::<Value>(&raw[..=idx]) {
            Ok(value) => {
                tracing::warn!(dropped_bytes = raw.len() - idx - 1, "recovered truncated JSON answer");
                return Ok(value);
            }
            Err(e) => e.to_string(),
        },
        _ => "no closing brace".to_string(),
    };

    Err(RecoveryError::Unrecoverable { parse: parse_err, recovery })
}

/// Normalize a model answer into a JSON string; never fails.
pub fn recover_json(raw: &str) -> String {
    match parse_model_json(raw) {
        Ok(value) => value.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, chars = raw.chars().count(), "model answer is not JSON, returning fallback");
            fallback_payload(raw).to_string()
        }
    }
}

fn fallback_payload(raw: &str) -> Value {
    let original = if raw.trim().is_empty() {
        "empty response".to_string()
    } else {
        let preview: String = raw.chars().take(ORIGINAL_PREVIEW_CHARS).collect();
        format!("{preview}...")
    };

    json!({
        "error": FALLBACK_ERROR,
        "originalResponse": original,
        "suggestion": FALLBACK_SUGGESTION,
    })
}
