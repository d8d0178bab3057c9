//! fetch_url_content tool implementation.
//!
//! Fetches one page with retries and returns the extracted content. Fetch
//! failures come back as data (`error`, `retryCount`), not as tool errors.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use scout_agent::Tool;
use scout_core::Error;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::ServerState;

/// Input parameters for fetch_url_content tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchUrlParams {
    /// The complete http(s) URL to fetch.
    pub url: String,
}

pub async fn fetch_url_impl(state: &ServerState, params: FetchUrlParams) -> Result<CallToolResult, McpError> {
    let url = params.url.trim();
    if url.is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let payload = state.tools().execute(&Tool::FetchUrlContent { url: url.to_string() }).await;
    Ok(json_result(&payload))
}
