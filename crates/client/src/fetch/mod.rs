//! HTTP fetch pipeline with browser-like headers and bounded retries.
//!
//! ### Request shape
//! - Desktop browser User-Agent, Accept, Accept-Language and fetch-metadata
//!   headers, a search-engine Referer and `Cache-Control: no-cache`.
//! - gzip/brotli/deflate decoding, at most 5 redirects (configurable).
//! - Only 2xx responses succeed.
//! - Max body bytes: 5MB (configurable)
//!
//! ### Retries
//! - Up to 3 attempts in total (configurable).
//! - After failed attempt `n` the client waits `min(2^n × 1s, 10s)`.
//! - A URL that cannot be canonicalized fails immediately.
//! - [`FetchClient::fetch_page`] never returns an error: an exhausted URL
//!   becomes [`FetchOutcome::Failed`].

pub mod result;
pub mod retry;
pub mod url;

use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use chrono::Utc;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{Client, StatusCode, Url, header};

pub use result::{FetchFailure, FetchOutcome, PageContent};
pub use retry::{RetryPolicy, backoff_delay};
pub use self::url::{UrlError, canonicalize, find_urls, is_http_url, merge_urls, resolve_url};

use crate::extract::{ExtractConfig, Extractor, HeuristicExtractor, charset_from_content_type, sniff_charset};
use scout_core::{AppConfig, DEFAULT_USER_AGENT, Error};

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const REFERER: &str = "https://www.google.com/";

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Accept-Language header (default: "zh-HK,zh;q=0.9,en;q=0.8")
    pub accept_language: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "zh-HK,zh;q=0.9,en;q=0.8".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(10_000),
            max_redirects: 5,
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
            retry: RetryPolicy::from(config),
        }
    }
}

/// Response from a single fetch attempt.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The canonicalized URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// HTTP fetch client that turns URLs into extracted pages.
#[derive(Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
    extractor: Arc<dyn Extractor>,
    extract_config: ExtractConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig, extract_config: ExtractConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(browser_headers(&config.accept_language)?)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config, extractor: Arc::new(HeuristicExtractor::new()), extract_config })
    }

    /// Build a client from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(FetchConfig::from(config), ExtractConfig::from(config))
    }

    /// Perform one GET attempt, returning raw bytes and metadata.
    ///
    /// Non-2xx statuses, timeouts and oversized bodies are errors.
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self.http.get(url.as_str()).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len > self.config.max_bytes as u64
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(classify)?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(url = %url, final_url = %final_url, fetch_ms, bytes = bytes.len(), "fetched");

        Ok(FetchResponse { url: url.clone(), final_url, status, content_type, bytes, fetch_ms })
    }

    /// Fetch and extract a page, retrying transient failures with backoff.
    pub async fn fetch_page(&self, url_str: &str) -> FetchOutcome {
        let url = match canonicalize(url_str) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(url = url_str, error = %e, "rejecting url");
                return FetchOutcome::Failed(FetchFailure::new(url_str, Error::InvalidUrl(e.to_string()).to_string(), 0));
            }
        };

        let policy = self.config.retry;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.fetch(&url).await {
                Ok(response) => {
                    let page = self.build_page(url_str, response);
                    tracing::info!(
                        url = url_str,
                        attempt,
                        chars = page.full_content_length,
                        score = page.content_quality_score,
                        "page extracted"
                    );
                    return FetchOutcome::Page(Box::new(page));
                }
                Err(e) if e.is_retryable() && policy.should_retry(attempt) => {
                    let delay = policy.delay_after(attempt);
                    tracing::warn!(
                        url = url_str,
                        attempt,
                        max_attempts = policy.max_attempts,
                        backoff_ms = delay.as_millis() as u64,
                        error = %e,
                        "fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::warn!(url = url_str, attempt, error = %e, "fetch failed, giving up");
                    let message = format!("failed after {attempt} attempts: {e}");
                    return FetchOutcome::Failed(FetchFailure::new(url_str, message, attempt));
                }
            }
        }
    }

    fn build_page(&self, url_str: &str, response: FetchResponse) -> PageContent {
        let declared = response
            .content_type
            .as_deref()
            .and_then(charset_from_content_type)
            .or_else(|| sniff_charset(&response.bytes));
        let html = decode_body(&response.bytes, declared.as_deref());
        let extracted = self.extractor.extract(&html, &response.final_url, &self.extract_config);

        let charset = declared
            .or(extracted.metadata.charset)
            .unwrap_or_else(|| "UTF-8".to_string());

        PageContent {
            url: url_str.to_string(),
            canonical_url: extracted.metadata.canonical_url,
            title: extracted.metadata.title,
            og_title: extracted.metadata.og_title,
            meta_description: extracted.metadata.description,
            meta_keywords: extracted.metadata.keywords,
            content: extracted.content,
            content_quality_score: extracted.quality_score,
            content_length: extracted.content_length,
            full_content_length: extracted.full_content_length,
            links: extracted.links,
            images: extracted.images,
            contact_info: extracted.contact_info,
            structured_data: extracted.structured_data,
            timestamp: Utc::now(),
            status_code: response.status.as_u16(),
            language: extracted.metadata.language,
            charset,
            final_url: response.final_url.to_string(),
            content_type: response.content_type,
            fetch_ms: response.fetch_ms,
        }
    }
}

fn browser_headers(accept_language: &str) -> Result<header::HeaderMap, Error> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_str(accept_language)
            .map_err(|e| Error::InvalidInput(format!("invalid accept_language: {e}")))?,
    );
    headers.insert(header::CONNECTION, header::HeaderValue::from_static("keep-alive"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, header::HeaderValue::from_static("1"));
    headers.insert(header::REFERER, header::HeaderValue::from_static(REFERER));
    headers.insert("sec-fetch-dest", header::HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", header::HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", header::HeaderValue::from_static("none"));
    headers.insert(header::CACHE_CONTROL, header::HeaderValue::from_static("no-cache"));
    Ok(headers)
}

/// Decode a body in its declared charset; unknown or missing labels mean UTF-8.
fn decode_body<'a>(bytes: &'a [u8], charset: Option<&str>) -> Cow<'a, str> {
    let encoding = match charset {
        Some(label) => Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
            tracing::debug!(charset = label, "unknown charset label, decoding as UTF-8");
            UTF_8
        }),
        None => UTF_8,
    };
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = used.name(), "body contained malformed sequences");
    }
    text
}

fn classify(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::FetchTimeout(e.to_string())
    } else {
        Error::HttpError(format!("network error: {e}"))
    }
}
