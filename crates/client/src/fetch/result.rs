//! Wire shapes for the outcome of fetching one URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::{ContactInfo, Image, Link};

/// A successfully fetched and extracted page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// URL as requested
    pub url: String,
    pub canonical_url: String,
    pub title: String,
    pub og_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    /// Best-scoring content block, capped to the configured maximum characters
    pub content: String,
    /// Quality of `content` in [0, 1]
    pub content_quality_score: f64,
    /// Character count of `content` as stored
    pub content_length: usize,
    /// Character count before capping
    pub full_content_length: usize,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub contact_info: ContactInfo,
    pub structured_data: Vec<Value>,
    pub timestamp: DateTime<Utc>,
    pub status_code: u16,
    pub language: String,
    pub charset: String,
    /// URL after redirects
    pub final_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub fetch_ms: u64,
}

/// A URL that could not be fetched after exhausting its attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchFailure {
    pub url: String,
    /// Message of the last error seen
    pub error: String,
    pub title: String,
    pub content: String,
    pub content_quality_score: f64,
    pub timestamp: DateTime<Utc>,
    /// Attempts made before giving up
    pub retry_count: u32,
}

impl FetchFailure {
    pub fn new(url: impl Into<String>, error: impl Into<String>, retry_count: u32) -> Self {
        Self {
            url: url.into(),
            error: error.into(),
            title: String::new(),
            content: String::new(),
            content_quality_score: 0.0,
            timestamp: Utc::now(),
            retry_count,
        }
    }
}

/// Either a page or a failure; serialized without a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchOutcome {
    Page(Box<PageContent>),
    Failed(FetchFailure),
}

impl FetchOutcome {
    pub fn is_page(&self) -> bool {
        matches!(self, FetchOutcome::Page(_))
    }

    pub fn url(&self) -> &str {
        match self {
            FetchOutcome::Page(page) => &page.url,
            FetchOutcome::Failed(failure) => &failure.url,
        }
    }

    pub fn quality_score(&self) -> f64 {
        match self {
            FetchOutcome::Page(page) => page.content_quality_score,
            FetchOutcome::Failed(_) => 0.0,
        }
    }

    /// JSON value as handed back to the model or tool caller.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| serde_json::json!({ "url": self.url(), "error": e.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_shape() {
        let outcome = FetchOutcome::Failed(FetchFailure::new("https://gone.example.com", "HTTP_ERROR: status 404", 3));
        let value = outcome.to_value();

        assert_eq!(value["url"], "https://gone.example.com");
        assert_eq!(value["error"], "HTTP_ERROR: status 404");
        assert_eq!(value["title"], "");
        assert_eq!(value["content"], "");
        assert_eq!(value["contentQualityScore"], 0.0);
        assert_eq!(value["retryCount"], 3);
        assert!(value.get("statusCode").is_none());
        assert!(value["timestamp"].is_string());
        assert!(!outcome.is_page());
        assert_eq!(outcome.quality_score(), 0.0);
        assert_eq!(outcome.url(), "https://gone.example.com");
    }

    #[test]
    fn test_page_shape_is_camel_case() {
        let page = PageContent {
            url: "https://example.com".into(),
            canonical_url: "https://example.com/".into(),
            title: "Example".into(),
            og_title: String::new(),
            meta_description: String::new(),
            meta_keywords: String::new(),
            content: "Body".into(),
            content_quality_score: 0.5,
            content_length: 4,
            full_content_length: 4,
            links: vec![],
            images: vec![],
            contact_info: ContactInfo::default(),
            structured_data: vec![],
            timestamp: Utc::now(),
            status_code: 200,
            language: "en".into(),
            charset: "UTF-8".into(),
            final_url: "https://example.com/".into(),
            content_type: None,
            fetch_ms: 12,
        };
        let value = FetchOutcome::Page(Box::new(page)).to_value();

        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["contentLength"], 4);
        assert_eq!(value["contactInfo"]["emails"], serde_json::json!([]));
        assert_eq!(value["ogTitle"], "");
        assert!(value.get("contentType").is_none());
        assert!(value.get("error").is_none());
    }
}
