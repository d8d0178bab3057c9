//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-scout server.

pub mod enhance;
pub mod fetch_url;
pub mod web_search;

pub use enhance::EnhanceProfileParams;
pub use fetch_url::FetchUrlParams;
pub use web_search::WebSearchParams;

use chrono::Utc;
use rmcp::model::{CallToolResult, Content};
use scout_core::Error;
use serde_json::{Value, json};

/// Successful result carrying pretty-printed JSON.
pub(crate) fn json_result(value: &Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(serde_json::to_string_pretty(value).unwrap_or_default())])
}

/// Error result carrying `{error, message, timestamp}` instead of a protocol error.
pub(crate) fn error_result(err: &Error) -> CallToolResult {
    let payload = json!({
        "error": err.code(),
        "message": err.to_string(),
        "timestamp": Utc::now().to_rfc3339(),
    });
    CallToolResult::error(vec![Content::text(payload.to_string())])
}
