//! URL canonicalization, relative-link resolution and URL discovery in free text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Candidate URLs in prose; trailing punctuation is trimmed afterwards.
static URL_IN_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s<>"'`，。、）」】]+"#).expect("invalid url regex"));

/// Characters that commonly follow a URL in prose without being part of it.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\''];

/// Canonicalize a URL string before fetching.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str().map(str::to_lowercase) {
        parsed.set_host(Some(&host)).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Resolve a possibly-relative `href` against the page URL.
///
/// Resolution failures return the input unchanged.
pub fn resolve_url(href: &str, base: &Url) -> String {
    match base.join(href) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::debug!(href, base = %base, error = %e, "could not resolve href");
            href.to_string()
        }
    }
}

/// Whether `input` starts with an `http://` or `https://` scheme (case-insensitive).
pub fn is_http_url(input: &str) -> bool {
    let input = input.trim_start();
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Find `http(s)` URLs mentioned in free text, deduplicated, in order of appearance.
pub fn find_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    URL_IN_TEXT
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION))
        .filter(|candidate| Url::parse(candidate).is_ok_and(|u| u.has_host()))
        .filter(|candidate| seen.insert(candidate.to_string()))
        .map(str::to_string)
        .collect()
}

/// Merge explicitly supplied URLs with URLs found in `text`, keeping first occurrences.
pub fn merge_urls(explicit: &[String], text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    explicit
        .iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .chain(find_urls(text))
        .filter(|u| seen.insert(u.clone()))
        .collect()
}
