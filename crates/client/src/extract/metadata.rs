//! Page-level metadata: title, meta tags, canonical URL, language, charset
//! and embedded JSON-LD blocks.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

use super::normalize::clean_text;
use crate::fetch::resolve_url;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[name="description"]"#));
static OG_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:description"]"#));
static META_KEYWORDS: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[name="keywords"]"#));
static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:title"]"#));
static CANONICAL: LazyLock<Selector> = LazyLock::new(|| selector(r#"link[rel="canonical"]"#));
static HTML_ROOT: LazyLock<Selector> = LazyLock::new(|| selector("html"));
static META_CHARSET: LazyLock<Selector> = LazyLock::new(|| selector("meta[charset]"));
static META_HTTP_EQUIV: LazyLock<Selector> = LazyLock::new(|| selector("meta[http-equiv]"));
/// Bytes scanned for a `<meta>` charset declaration.
pub const SNIFF_BYTES: usize = 4096;

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));

/// Metadata read from the document head.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub og_title: String,
    pub description: String,
    pub keywords: String,
    pub canonical_url: String,
    pub language: String,
    /// Charset declared inside the document, if any.
    pub charset: Option<String>,
}

impl PageMetadata {
    /// Read metadata from a parsed document.
    ///
    /// The canonical URL falls back to `source_url`; the description falls back
    /// to `og:description`; the language falls back to `"unknown"`.
    pub fn from_document(document: &Html, source_url: &Url) -> Self {
        let title = document
            .select(&TITLE)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()))
            .unwrap_or_default();

        let description = meta_content(document, &META_DESCRIPTION)
            .or_else(|| meta_content(document, &OG_DESCRIPTION))
            .unwrap_or_default();

        let canonical_url = document
            .select(&CANONICAL)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(|href| resolve_url(href, source_url))
            .unwrap_or_else(|| source_url.to_string());

        let language = document
            .select(&HTML_ROOT)
            .next()
            .and_then(|el| el.value().attr("lang"))
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .unwrap_or("unknown")
            .to_string();

        Self {
            title,
            og_title: meta_content(document, &OG_TITLE).unwrap_or_default(),
            description,
            keywords: meta_content(document, &META_KEYWORDS).unwrap_or_default(),
            canonical_url,
            language,
            charset: declared_charset(document),
        }
    }
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

fn declared_charset(document: &Html) -> Option<String> {
    if let Some(charset) = document
        .select(&META_CHARSET)
        .filter_map(|el| el.value().attr("charset"))
        .map(str::trim)
        .find(|c| !c.is_empty())
    {
        return Some(charset.to_uppercase());
    }

    document
        .select(&META_HTTP_EQUIV)
        .filter(|el| el.value().attr("http-equiv").is_some_and(|v| v.eq_ignore_ascii_case("content-type")))
        .filter_map(|el| el.value().attr("content"))
        .find_map(charset_from_content_type)
}

/// Charset declared by a `<meta>` tag near the start of a raw body.
///
/// Only the first [`SNIFF_BYTES`] are read, decoded lossily; charset labels
/// are ASCII so the undecoded bytes do not matter.
pub fn sniff_charset(body: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_BYTES)]);
    declared_charset(&Html::parse_document(&head))
}

/// Pull the `charset=` parameter out of a Content-Type value.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_uppercase())
        .filter(|value| !value.is_empty())
}

/// Parse up to `limit` JSON-LD blocks; malformed blocks are skipped.
pub fn extract_structured_data(document: &Html, limit: usize) -> Vec<Value> {
    document
        .select(&LD_JSON)
        .filter_map(|el| {
            let raw = el.text().collect::<String>();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed ld+json block");
                    None
                }
            }
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAD_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="zh-HK">
        <head>
            <meta charset="utf-8">
            <title>  Jane Doe | Interior   Designer </title>
            <meta name="description" content="Award-winning interior designer.">
            <meta property="og:description" content="OG description">
            <meta name="keywords" content="interior, design, Hong Kong">
            <meta property="og:title" content="Jane Doe Studio">
            <link rel="canonical" href="/about">
        </head>
        <body></body>
        </html>
    "#;

    #[test]
    fn test_from_document_full_head() {
        let doc = Html::parse_document(HEAD_HTML);
        let url = Url::parse("https://jane.example.com/about?ref=x").unwrap();
        let meta = PageMetadata::from_document(&doc, &url);

        assert_eq!(meta.title, "Jane Doe | Interior Designer");
        assert_eq!(meta.og_title, "Jane Doe Studio");
        assert_eq!(meta.description, "Award-winning interior designer.");
        assert_eq!(meta.keywords, "interior, design, Hong Kong");
        assert_eq!(meta.canonical_url, "https://jane.example.com/about");
        assert_eq!(meta.language, "zh-HK");
        assert_eq!(meta.charset.as_deref(), Some("UTF-8"));
    }

    #[test]
    fn test_from_document_fallbacks() {
        let doc = Html::parse_document(
            r#"<html><head><meta property="og:description" content="Only OG"></head><body></body></html>"#,
        );
        let url = Url::parse("https://example.com/page").unwrap();
        let meta = PageMetadata::from_document(&doc, &url);

        assert_eq!(meta.title, "");
        assert_eq!(meta.description, "Only OG");
        assert_eq!(meta.canonical_url, "https://example.com/page");
        assert_eq!(meta.language, "unknown");
        assert!(meta.charset.is_none());
    }

    #[test]
    fn test_http_equiv_charset() {
        let doc = Html::parse_document(
            r#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=Big5"></head></html>"#,
        );
        let url = Url::parse("https://example.com").unwrap();
        assert_eq!(PageMetadata::from_document(&doc, &url).charset.as_deref(), Some("BIG5"));
    }

    #[test]
    fn test_sniff_charset_from_raw_bytes() {
        let mut body = br#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=big5"><title>"#.to_vec();
        body.extend_from_slice(&[179, 93, 173, 112, 174, 118]);
        body.extend_from_slice(b"</title></head></html>");

        assert_eq!(sniff_charset(&body).as_deref(), Some("BIG5"));
        assert_eq!(sniff_charset(b"<html><head><meta charset='gbk'></head></html>").as_deref(), Some("GBK"));
        assert_eq!(sniff_charset(b"<html><head><title>plain</title></head></html>"), None);
    }

    #[test]
    fn test_sniff_charset_ignores_late_declarations() {
        let mut body = format!("<html><head><title>{}</title>", "x".repeat(SNIFF_BYTES)).into_bytes();
        body.extend_from_slice(br#"<meta charset="gbk"></head></html>"#);
        assert_eq!(sniff_charset(&body), None);
    }

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(charset_from_content_type("text/html; charset=utf-8").as_deref(), Some("UTF-8"));
        assert_eq!(charset_from_content_type(r#"text/html;charset="gbk""#).as_deref(), Some("GBK"));
        assert_eq!(charset_from_content_type("text/html"), None);
    }

    #[test]
    fn test_structured_data_skips_malformed_and_caps() {
        let doc = Html::parse_document(
            r#"
            <script type="application/ld+json">{"@type": "Person", "name": "Jane"}</script>
            <script type="application/ld+json">{ not json </script>
            <script type="application/ld+json">{"@type": "Organization"}</script>
            <script type="application/ld+json">[{"@type": "WebSite"}]</script>
            <script type="application/ld+json">{"@type": "Extra"}</script>
        "#,
        );

        let data = extract_structured_data(&doc, 3);
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["name"], "Jane");
        assert_eq!(data[1]["@type"], "Organization");
        assert!(data[2].is_array());
    }

    #[test]
    fn test_structured_data_none() {
        let doc = Html::parse_document("<html><body><script>var x = 1;</script></body></html>");
        assert!(extract_structured_data(&doc, 3).is_empty());
    }
}
