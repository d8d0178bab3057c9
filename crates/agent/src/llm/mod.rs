//! Language-model abstraction.
//!
//! The agent loop talks to a [`ChatModel`]; [`OpenAiClient`] implements it for
//! any OpenAI-compatible chat-completions endpoint.

pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod mock;
pub mod openai;
pub mod types;

pub use error::{LlmError, Result};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, FinishReason, FunctionCall, FunctionDefinition, ResponseFormat, Role,
    ToolCall, ToolChoice, ToolDefinition,
};

use std::time::Duration;

use async_trait::async_trait;

/// A chat-completions backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one request and return the first choice.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

/// Execute an async operation with exponential backoff retry.
///
/// Retries only transient errors (network, rate limit, 5xx). Other errors are
/// returned immediately.
pub async fn with_retry<F, Fut, T>(max_retries: u32, initial_backoff: Duration, backend_name: &str, mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut backoff = initial_backoff;
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    backend = backend_name,
                    attempt,
                    max_retries,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "model request failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
