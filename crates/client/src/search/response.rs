//! Brave Search API response types and normalization.

use serde::{Deserialize, Serialize};

/// Raw response from Brave Web Search API.
#[derive(Debug, Deserialize)]
pub struct BraveApiResponse {
    pub query: QueryInfo,
    #[serde(default)]
    pub web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
pub struct QueryInfo {
    pub original: String,
    #[serde(default)]
    #[serde(alias = "moreResultsAvailable")]
    pub more_results_available: bool,
}

#[derive(Debug, Deserialize)]
pub struct WebResults {
    pub results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub description: String,
    /// 1-based position in the result list
    pub rank: usize,
}

/// Normalized search results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub more_results_available: bool,
}

impl From<BraveApiResponse> for SearchResults {
    fn from(raw: BraveApiResponse) -> Self {
        let results = raw
            .web
            .map(|w| {
                w.results
                    .into_iter()
                    .enumerate()
                    .map(|(idx, r)| SearchHit { title: r.title, url: r.url, description: r.description, rank: idx + 1 })
                    .collect()
            })
            .unwrap_or_default();

        SearchResults { query: raw.query.original, results, more_results_available: raw.query.more_results_available }
    }
}
