//! Brave Search API client for keyword queries.
//!
//! - **Endpoint**: `https://api.search.brave.com/res/v1/web/search`
//! - **Authentication**: `X-Subscription-Token` header.
//! - **Rate limiting**: requests are spaced at least one second apart
//!   (free tier); a 429 surfaces as [`SearchError::RateLimited`].
//! - **Validation**: queries must be non-empty, at most 400 characters and
//!   50 words.

pub mod error;
pub mod response;

pub use error::SearchError;
pub use response::{SearchHit, SearchResults};

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header;
use scout_core::AppConfig;
use tokio::sync::Mutex;

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com/res/v1";

const MAX_QUERY_CHARS: usize = 400;
const MAX_QUERY_WORDS: usize = 50;

/// Search client configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    /// Base URL (default: https://api.search.brave.com/res/v1)
    pub base_url: String,
    /// Request timeout (default: 10s)
    pub timeout: Duration,
    /// Results per query, 1-20 (default: 10)
    pub count: u8,
    /// Minimum spacing between requests (default: 1s)
    pub min_interval: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            count: 10,
            min_interval: Duration::from_secs(1),
        }
    }
}

impl SearchConfig {
    /// Configuration from the app config, or `None` when no key is set.
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        let api_key = config.brave_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        Some(Self { api_key: api_key.to_string(), timeout: config.timeout(), ..Default::default() })
    }
}

/// Spaces out requests to the search API.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self { last_request: Mutex::new(None), min_interval }
    }

    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Keyword search client.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    config: SearchConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        if config.api_key.is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .build()
            .map_err(|e| SearchError::Network(Arc::new(e)))?;

        let rate_limiter = Arc::new(RateLimiter::new(config.min_interval));
        Ok(Self { http, config, rate_limiter })
    }

    /// Run a keyword query and return ranked hits.
    pub async fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
        let query = validate_query(query)?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let url = format!("{}/web/search", self.config.base_url);
        let count = self.config.count.clamp(1, 20).to_string();

        let response = self
            .http
            .get(&url)
            .header("X-Subscription-Token", &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .query(&[("q", query), ("count", count.as_str())])
            .send()
            .await?;

        let status = response.status();
        match status.as_u16() {
            401 | 403 => return Err(SearchError::AuthError),
            429 => return Err(SearchError::RateLimited),
            _ if !status.is_success() => return Err(SearchError::HttpError { status: status.as_u16() }),
            _ => {}
        }

        let bytes = response.bytes().await?;
        let raw: response::BraveApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| SearchError::Parse(e.to_string()))?;
        let results = SearchResults::from(raw);

        tracing::debug!(
            query,
            elapsed_ms = start.elapsed().as_millis() as u64,
            hits = results.results.len(),
            "search completed"
        );

        Ok(results)
    }
}

fn validate_query(query: &str) -> Result<&str, SearchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::InvalidQuery("query cannot be empty".to_string()));
    }

    let chars = query.chars().count();
    if chars > MAX_QUERY_CHARS {
        return Err(SearchError::InvalidQuery(format!("query too long: {chars} chars (max {MAX_QUERY_CHARS})")));
    }

    let words = query.split_whitespace().count();
    if words > MAX_QUERY_WORDS {
        return Err(SearchError::InvalidQuery(format!("query too long: {words} words (max {MAX_QUERY_WORDS})")));
    }

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header as header_eq, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SearchClient {
        SearchClient::new(SearchConfig {
            api_key: "test-key".into(),
            base_url: server.uri(),
            min_interval: Duration::from_millis(1),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_client_new_missing_key() {
        assert!(matches!(SearchClient::new(SearchConfig::default()), Err(SearchError::MissingApiKey)));
    }

    #[test]
    fn test_config_from_app_config() {
        assert!(SearchConfig::from_app_config(&AppConfig::default()).is_none());

        let blank = AppConfig { brave_api_key: Some("  ".into()), ..Default::default() };
        assert!(SearchConfig::from_app_config(&blank).is_none());

        let set = AppConfig { brave_api_key: Some("abc".into()), ..Default::default() };
        assert_eq!(SearchConfig::from_app_config(&set).unwrap().api_key, "abc");
    }

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query("  jane doe  ").unwrap(), "jane doe");
        assert!(validate_query("   ").is_err());
        assert!(validate_query(&"a".repeat(401)).is_err());
        assert!(validate_query(&"w ".repeat(51)).is_err());
    }

    #[tokio::test]
    async fn test_search_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web/search"))
            .and(query_param("q", "jane doe designer"))
            .and(header_eq("x-subscription-token", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"query":{"original":"jane doe designer"},"web":{"results":[
                    {"title":"Jane Doe Studio","url":"https://janedoe.example.com","description":"Studio"}]}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let results = client_for(&server).search("jane doe designer").await.unwrap();
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].title, "Jane Doe Studio");
    }

    #[tokio::test]
    async fn test_search_status_mapping() {
        for (status, check) in [
            (401, (|e: &SearchError| matches!(e, SearchError::AuthError)) as fn(&SearchError) -> bool),
            (429, |e| matches!(e, SearchError::RateLimited)),
            (500, |e| matches!(e, SearchError::HttpError { status: 500 })),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let err = client_for(&server).search("query").await.unwrap_err();
            assert!(check(&err), "status {status} mapped to {err:?}");
        }
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).search("query").await.unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }
}
