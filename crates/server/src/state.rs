//! Long-lived clients shared by every tool call.

use std::sync::Arc;

use scout_agent::{Agent, AgentConfig, ChatModel, OpenAiClient, OpenAiConfig, ToolDispatcher};
use scout_client::{FetchClient, SearchClient, SearchConfig};
use scout_core::{AppConfig, Error};

/// Clients built once at startup.
///
/// The model client is absent when no LLM key is configured; only
/// `enhance_profile` needs it. Keyword search is absent without a Brave key.
#[derive(Clone)]
pub struct ServerState {
    config: AppConfig,
    tools: ToolDispatcher,
    model: Option<Arc<dyn ChatModel>>,
    has_search: bool,
}

impl ServerState {
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let model: Option<Arc<dyn ChatModel>> = match OpenAiConfig::from_app_config(&config) {
            Ok(llm) => Some(Arc::new(OpenAiClient::new(llm)?)),
            Err(e) => {
                tracing::warn!(error = %e, "enhance_profile disabled");
                None
            }
        };
        Self::with_model(config, model)
    }

    /// State with an explicit model client.
    pub fn with_model(config: AppConfig, model: Option<Arc<dyn ChatModel>>) -> Result<Self, Error> {
        let fetch = FetchClient::from_app_config(&config)?;
        let search = SearchConfig::from_app_config(&config).map(SearchClient::new).transpose()?;
        let has_search = search.is_some();

        Ok(Self { tools: ToolDispatcher::new(fetch, search), config, model, has_search })
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn has_search(&self) -> bool {
        self.has_search
    }

    pub fn tools(&self) -> &ToolDispatcher {
        &self.tools
    }

    /// Agent for one request, or a config error when no model is configured.
    pub fn agent(&self) -> Result<Agent, Error> {
        let Some(model) = &self.model else {
            self.config.require_llm_api_key()?;
            return Err(Error::Config("language model client unavailable".to_string()));
        };
        Ok(Agent::new(Arc::clone(model), self.tools.clone(), AgentConfig::from(&self.config)))
    }
}
