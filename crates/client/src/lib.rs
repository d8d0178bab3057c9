//! Client code for mcp-scout.
//!
//! This crate provides the page fetch pipeline with retries, heuristic content
//! extraction, and the keyword search client used by the agent tools.

pub mod extract;
pub mod fetch;
pub mod search;

pub use extract::{
    ContactInfo, ExtractConfig, ExtractionResult, Extractor, HeuristicExtractor, Image, Link, PageMetadata, clean_text,
    score_content,
};

pub use fetch::{
    FetchClient, FetchConfig, FetchFailure, FetchOutcome, FetchResponse, PageContent, RetryPolicy, find_urls,
    is_http_url, merge_urls, resolve_url,
};

pub use search::{SearchClient, SearchConfig, SearchError, SearchHit, SearchResults};
