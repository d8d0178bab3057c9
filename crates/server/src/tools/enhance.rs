//! enhance_profile tool implementation.
//!
//! Runs the research agent over a free-form self-introduction. URLs found in
//! the text are merged with the explicit `urls` list and fetched by the model.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use scout_client::merge_urls;
use scout_core::Error;
use serde::{Deserialize, Serialize};

use super::error_result;
use crate::state::ServerState;

/// Input parameters for enhance_profile tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EnhanceProfileParams {
    /// The expert's self-introduction (required).
    pub input: String,

    /// Replaces the default system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Extra URLs to fetch, in addition to any found in `input`.
    #[serde(default)]
    pub urls: Option<Vec<String>>,
}

/// Implementation of the enhance_profile tool.
pub async fn enhance_impl(state: &ServerState, params: EnhanceProfileParams) -> Result<CallToolResult, McpError> {
    if params.input.trim().is_empty() {
        return Err(Error::InvalidInput("input cannot be empty".into()).into());
    }

    let agent = match state.agent() {
        Ok(agent) => agent,
        Err(e) => {
            tracing::warn!(error = %e, "enhance_profile unavailable");
            return Ok(error_result(&e));
        }
    };
    let urls = merge_urls(params.urls.as_deref().unwrap_or_default(), &params.input);

    tracing::info!(input_chars = params.input.chars().count(), urls = urls.len(), "enhance_profile");

    match agent.run(&params.input, params.system_prompt.as_deref(), &urls).await {
        Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
        Err(e) => {
            tracing::error!(error = %e, "enhance_profile failed");
            Ok(error_result(&e.into()))
        }
    }
}
