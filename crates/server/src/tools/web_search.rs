//! web_search tool implementation.
//!
//! A full URL is fetched like `fetch_url_content`. Keywords go to Brave
//! Search when a key is configured; otherwise the answer suggests a URL.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use scout_agent::Tool;
use scout_core::Error;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::ServerState;

/// Input parameters for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// Keywords, or a complete http(s) URL.
    pub query: String,
}

pub async fn search_impl(state: &ServerState, params: WebSearchParams) -> Result<CallToolResult, McpError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(Error::InvalidInput("query cannot be empty".into()).into());
    }

    let payload = state.tools().execute(&Tool::WebSearch { query: query.to_string() }).await;
    Ok(json_result(&payload))
}
