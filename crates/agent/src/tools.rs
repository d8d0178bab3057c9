//! Tools offered to the model and their dispatch.
//!
//! Tool calls are parsed into the closed [`Tool`] enum and executed by an
//! exhaustive match. Every failure becomes an error-shaped JSON payload, so
//! a tool call always yields a result the model can read.

use chrono::Utc;
use scout_client::{FetchClient, SearchClient, is_http_url};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::llm::{ToolCall, ToolDefinition};
use crate::prompt::SEARCH_SUGGESTION;

pub const WEB_SEARCH: &str = "web_search";
pub const FETCH_URL_CONTENT: &str = "fetch_url_content";

/// Why a tool call could not be turned into a [`Tool`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found")]
    NotFound(String),

    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: &'static str, reason: String },
}

impl ToolError {
    /// Payload handed back to the model in place of a tool result.
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// A parsed tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tool {
    /// Fetch when `query` is a URL; otherwise keyword search or a suggestion.
    WebSearch { query: String },
    FetchUrlContent { url: String },
}

#[derive(Deserialize)]
struct WebSearchArgs {
    query: String,
}

#[derive(Deserialize)]
struct FetchUrlArgs {
    url: String,
}

impl Tool {
    /// Parse a tool name and its JSON-encoded arguments.
    pub fn parse(name: &str, arguments: &str) -> Result<Self, ToolError> {
        match name {
            WEB_SEARCH => {
                let args: WebSearchArgs = parse_args(WEB_SEARCH, arguments)?;
                Ok(Tool::WebSearch { query: args.query })
            }
            FETCH_URL_CONTENT => {
                let args: FetchUrlArgs = parse_args(FETCH_URL_CONTENT, arguments)?;
                Ok(Tool::FetchUrlContent { url: args.url })
            }
            other => Err(ToolError::NotFound(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::WebSearch { .. } => WEB_SEARCH,
            Tool::FetchUrlContent { .. } => FETCH_URL_CONTENT,
        }
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(tool: &'static str, arguments: &str) -> Result<T, ToolError> {
    let arguments = if arguments.trim().is_empty() { "{}" } else { arguments };
    serde_json::from_str(arguments).map_err(|e| ToolError::InvalidArguments { tool, reason: e.to_string() })
}

/// Definitions of every tool, in the chat-completions function format.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::function(
            WEB_SEARCH,
            "Search the web or fetch a page. A full URL is fetched and returned as page text plus structured \
             information; other queries return search results when available.",
            json!({
                "type": "object",
                "required": ["query"],
                "properties": {
                    "query": {"type": "string", "description": "URL or keywords to search for"}
                }
            }),
        ),
        ToolDefinition::function(
            FETCH_URL_CONTENT,
            "Fetch the content of the given URL directly.",
            json!({
                "type": "object",
                "required": ["url"],
                "properties": {
                    "url": {"type": "string", "description": "Complete URL to fetch"}
                }
            }),
        ),
    ]
}

/// Executes tools against the fetch and search clients.
#[derive(Clone)]
pub struct ToolDispatcher {
    fetch: FetchClient,
    search: Option<SearchClient>,
}

impl ToolDispatcher {
    pub fn new(fetch: FetchClient, search: Option<SearchClient>) -> Self {
        Self { fetch, search }
    }

    /// Parse and run one model tool call; never fails.
    pub async fn dispatch(&self, call: &ToolCall) -> Value {
        match Tool::parse(&call.function.name, &call.function.arguments) {
            Ok(tool) => {
                tracing::info!(tool = tool.name(), call_id = %call.id, "executing tool");
                self.execute(&tool).await
            }
            Err(e) => {
                tracing::warn!(tool = %call.function.name, call_id = %call.id, error = %e, "rejecting tool call");
                e.to_payload()
            }
        }
    }

    pub async fn execute(&self, tool: &Tool) -> Value {
        match tool {
            Tool::FetchUrlContent { url } => self.fetch_value(url).await,
            Tool::WebSearch { query } => self.web_search(query).await,
        }
    }

    async fn fetch_value(&self, url: &str) -> Value {
        let outcome = self.fetch.fetch_page(url).await;
        tracing::debug!(url = outcome.url(), page = outcome.is_page(), score = outcome.quality_score(), "tool fetch done");
        outcome.to_value()
    }

    async fn web_search(&self, query: &str) -> Value {
        if is_http_url(query) {
            return self.fetch_value(query.trim()).await;
        }

        let timestamp = Utc::now().to_rfc3339();
        match &self.search {
            Some(search) => match search.search(query).await {
                Ok(results) => json!({ "query": query, "results": results.results, "timestamp": timestamp }),
                Err(e) => json!({ "query": query, "error": e.to_string(), "timestamp": timestamp }),
            },
            None => json!({ "query": query, "suggestion": SEARCH_SUGGESTION, "timestamp": timestamp }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_client::{ExtractConfig, FetchConfig, RetryPolicy, SearchConfig};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetch_client() -> FetchClient {
        let config = FetchConfig {
            retry: RetryPolicy { max_attempts: 2, base_delay: Duration::from_millis(1), max_delay: Duration::from_millis(2) },
            ..Default::default()
        };
        FetchClient::new(config, ExtractConfig::default()).unwrap()
    }

    fn dispatcher() -> ToolDispatcher {
        ToolDispatcher::new(fetch_client(), None)
    }

    #[test]
    fn test_parse_known_tools() {
        assert_eq!(
            Tool::parse("fetch_url_content", r#"{"url":"https://example.com"}"#).unwrap(),
            Tool::FetchUrlContent { url: "https://example.com".into() }
        );
        assert_eq!(
            Tool::parse("web_search", r#"{"query":"jane doe"}"#).unwrap(),
            Tool::WebSearch { query: "jane doe".into() }
        );
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = Tool::parse("delete_everything", "{}").unwrap_err();
        assert_eq!(err, ToolError::NotFound("delete_everything".into()));
        assert_eq!(err.to_payload(), json!({"error": "Tool not found"}));
    }

    #[test]
    fn test_parse_bad_arguments() {
        assert!(matches!(
            Tool::parse("fetch_url_content", "{not json"),
            Err(ToolError::InvalidArguments { tool: FETCH_URL_CONTENT, .. })
        ));
        assert!(matches!(Tool::parse("web_search", ""), Err(ToolError::InvalidArguments { .. })));
        assert!(matches!(Tool::parse("web_search", r#"{"q":"x"}"#), Err(ToolError::InvalidArguments { .. })));
    }

    #[test]
    fn test_definitions_schema() {
        let defs = definitions();
        let names: Vec<_> = defs.iter().map(|d| d.function.name.as_str()).collect();

        assert_eq!(names, vec![WEB_SEARCH, FETCH_URL_CONTENT]);
        assert_eq!(defs[1].function.parameters["required"], json!(["url"]));
        assert_eq!(defs[0].kind, "function");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_payload() {
        let payload = dispatcher().dispatch(&ToolCall::new("call_1", "nope", "{}")).await;
        assert_eq!(payload, json!({"error": "Tool not found"}));
    }

    #[tokio::test]
    async fn test_web_search_keyword_without_backend_suggests_url() {
        let payload = dispatcher().execute(&Tool::WebSearch { query: "interior designer hong kong".into() }).await;

        assert_eq!(payload["query"], "interior designer hong kong");
        assert_eq!(payload["suggestion"], SEARCH_SUGGESTION);
        assert!(payload["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_web_search_url_fetches_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><head><title>Works</title></head></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let query = format!("{}/works", server.uri());
        let payload = dispatcher().execute(&Tool::WebSearch { query: query.clone() }).await;

        assert_eq!(payload["url"], query);
        assert_eq!(payload["title"], "Works");
        assert_eq!(payload["statusCode"], 200);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_a_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

        let payload = dispatcher().execute(&Tool::FetchUrlContent { url: server.uri() }).await;
        assert!(payload["error"].as_str().unwrap().contains("500"));
        assert_eq!(payload["content"], "");
        assert_eq!(payload["retryCount"], 2);
    }

    #[tokio::test]
    async fn test_web_search_with_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"query":{"original":"jane"},"web":{"results":[{"title":"Jane","url":"https://jane.example.com","description":"d"}]}}"#,
            ))
            .mount(&server)
            .await;

        let search = SearchClient::new(SearchConfig {
            api_key: "k".into(),
            base_url: server.uri(),
            min_interval: Duration::from_millis(1),
            ..Default::default()
        })
        .unwrap();
        let dispatcher = ToolDispatcher::new(fetch_client(), Some(search));

        let payload = dispatcher.execute(&Tool::WebSearch { query: "jane".into() }).await;
        assert_eq!(payload["results"][0]["url"], "https://jane.example.com");
        assert_eq!(payload["results"][0]["rank"], 1);
    }

    #[tokio::test]
    async fn test_web_search_backend_error_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(401)).mount(&server).await;

        let search = SearchClient::new(SearchConfig {
            api_key: "k".into(),
            base_url: server.uri(),
            min_interval: Duration::from_millis(1),
            ..Default::default()
        })
        .unwrap();
        let payload = ToolDispatcher::new(fetch_client(), Some(search))
            .execute(&Tool::WebSearch { query: "jane".into() })
            .await;

        assert_eq!(payload["query"], "jane");
        assert!(payload["error"].as_str().unwrap().contains("authentication"));
    }
}
