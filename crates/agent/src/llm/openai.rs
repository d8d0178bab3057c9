//! OpenAI-compatible chat-completions client.
//!
//! Works against any provider exposing `POST {base_url}/chat/completions`
//! with bearer authentication (Moonshot, OpenAI, Groq, local servers).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, header};
use scout_core::{AppConfig, ConfigError};
use serde::{Deserialize, Serialize};

use super::error::{LlmError, Result};
use super::types::{ChatMessage, ChatRequest, ChatResponse, FinishReason, ResponseFormat, ToolChoice, ToolDefinition};
use super::{ChatModel, with_retry};

/// Configuration for the OpenAI-compatible client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL, without the `/chat/completions` suffix
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Maximum retries for transient errors.
    pub max_retries: u32,
    /// Initial backoff duration for retries.
    pub retry_backoff: Duration,
    /// Name used in logs.
    pub name: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
            name: "openai-compatible".to_string(),
        }
    }

    /// Build from the app config; fails when no API key is configured.
    pub fn from_app_config(config: &AppConfig) -> std::result::Result<Self, ConfigError> {
        let api_key = config.require_llm_api_key()?;
        Ok(Self {
            timeout: config.llm_timeout(),
            max_retries: config.llm_max_retries,
            ..Self::new(api_key, config.llm_base_url.trim_end_matches('/'), &config.llm_model)
        })
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tools: &'a [ToolDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'a ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize)]
struct WireErrorResponse {
    error: WireErrorBody,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    message: String,
}

/// Chat-completions client.
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| LlmError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    async fn send(&self, body: &WireRequest<'_>) -> Result<ChatResponse> {
        let response = self
            .client
            .post(self.completions_url())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let parsed: WireResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedResponse("response has no choices".to_string()))?;

        Ok(ChatResponse { message: choice.message, finish_reason: choice.finish_reason.unwrap_or(FinishReason::Stop) })
    }

    async fn error_from_response(response: Response) -> LlmError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<WireErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        LlmError::from_status(status, message)
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = WireRequest {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            tools: &request.tools,
            tool_choice: request.tool_choice,
            response_format: request.response_format.as_ref(),
        };

        tracing::debug!(
            backend = %self.config.name,
            model = %self.config.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            json_mode = request.response_format.is_some(),
            "sending chat completion"
        );

        with_retry(self.config.max_retries, self.config.retry_backoff, &self.config.name, || self.send(&body)).await
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}
