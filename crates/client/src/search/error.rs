//! Web search client error types.

use std::sync::Arc;

use scout_core::Error;

/// Errors from the Brave Search API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// No API key configured.
    #[error("missing API key: SCOUT_BRAVE_API_KEY not set")]
    MissingApiKey,

    /// Invalid search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the search API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// Non-success HTTP status.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { SearchError::Timeout } else { SearchError::Network(Arc::new(err)) }
    }
}

impl From<SearchError> for Error {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::AuthError | SearchError::MissingApiKey => Error::SearchAuthError(err.to_string()),
            SearchError::RateLimited => Error::SearchRateLimited(err.to_string()),
            SearchError::InvalidQuery(_) => Error::InvalidInput(err.to_string()),
            _ => Error::SearchFailed(err.to_string()),
        }
    }
}
