//! Unified error types for mcp-scout.
//!
//! Every variant carries a stable upper-case code prefix so tool callers can
//! match on it without parsing free text.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the mcp-scout server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty profile text).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Search API authentication error.
    #[error("SEARCH_AUTH_ERROR: {0}")]
    SearchAuthError(String),

    /// Search API rate limited.
    #[error("SEARCH_RATE_LIMITED: {0}")]
    SearchRateLimited(String),

    /// Search request failed for any other reason.
    #[error("SEARCH_FAILED: {0}")]
    SearchFailed(String),

    /// The language model could not be reached or answered with garbage.
    #[error("LLM_ERROR: {0}")]
    Llm(String),

    /// Required configuration is missing or invalid.
    #[error("CONFIG_ERROR: {0}")]
    Config(String),
}

impl Error {
    /// Stable code, matching the display prefix.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::FetchTimeout(_) => "FETCH_TIMEOUT",
            Error::FetchTooLarge(_) => "FETCH_TOO_LARGE",
            Error::HttpError(_) => "HTTP_ERROR",
            Error::SearchAuthError(_) => "SEARCH_AUTH_ERROR",
            Error::SearchRateLimited(_) => "SEARCH_RATE_LIMITED",
            Error::SearchFailed(_) => "SEARCH_FAILED",
            Error::Llm(_) => "LLM_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether a fetch attempt that failed with this error is worth repeating.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::FetchTimeout(_) | Error::HttpError(_) | Error::FetchTooLarge(_))
    }
}

impl From<crate::ConfigError> for Error {
    fn from(err: crate::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Config(msg) => (-32001, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::Llm(msg) => (-32004, msg.clone()),
            Error::FetchTimeout(msg) => (-32006, msg.clone()),
            Error::FetchTooLarge(msg) => (-32007, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::SearchAuthError(msg) => (-32009, msg.clone()),
            Error::SearchRateLimited(msg) => (-32010, msg.clone()),
            Error::SearchFailed(msg) => (-32011, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
