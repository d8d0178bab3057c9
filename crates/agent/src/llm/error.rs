//! Error types for the chat-completions client.

use scout_core::Error;

/// Result type alias using the model error type.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Failures talking to the language model.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// Network/connectivity error or timeout (retryable).
    #[error("network error: {0}")]
    Network(String),

    /// Rate limit exceeded (retryable with backoff).
    #[error("rate limit exceeded: {0}")]
    RateLimit(String),

    /// Provider-side 5xx failure (retryable).
    #[error("server error: {0}")]
    Server(String),

    /// Authentication failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The provider rejected the request (other 4xx).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Missing or invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RateLimit(_) | Self::Server(_))
    }

    /// Map a non-success status and provider message onto an error kind.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Auth(message),
            429 => Self::RateLimit(message),
            500..=599 => Self::Server(format!("HTTP {status}: {message}")),
            _ => Self::InvalidRequest(format!("HTTP {status}: {message}")),
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() { Self::MalformedResponse(err.to_string()) } else { Self::Network(err.to_string()) }
    }
}

impl From<LlmError> for Error {
    fn from(err: LlmError) -> Self {
        Error::Llm(err.to_string())
    }
}
