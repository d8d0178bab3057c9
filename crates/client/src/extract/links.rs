//! Link and image harvesting from HTML documents.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use super::normalize::clean_text;
use crate::fetch::resolve_url;

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img[src]").expect("invalid selector"));

/// Anchor text must be longer than this many characters to be kept.
const MIN_LINK_TEXT_CHARS: usize = 2;

/// A harvested outbound link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Link text content
    pub text: String,
    /// Absolute href
    pub href: String,
    /// Whether the href points outside the page's origin
    pub is_external: bool,
}

/// A harvested image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub alt: String,
    /// Absolute image URL
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

/// Extract up to `limit` links, resolving relative hrefs against the page URL.
///
/// Anchors whose text is empty or at most two characters long are skipped,
/// as are repeats of an href already taken.
pub fn extract_links(document: &Html, base_url: &Url, limit: usize) -> Vec<Link> {
    let origin = base_url.origin();
    let mut seen = HashSet::new();

    document
        .select(&ANCHOR)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }

            let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
            if text.chars().count() <= MIN_LINK_TEXT_CHARS {
                return None;
            }

            let resolved = resolve_url(href, base_url);
            let is_external = Url::parse(&resolved).map(|u| u.origin() != origin).unwrap_or(true);

            Some(Link { text, href: resolved, is_external })
        })
        .filter(|link| seen.insert(link.href.clone()))
        .take(limit)
        .collect()
}

/// Extract up to `limit` images that carry a non-empty `src`.
pub fn extract_images(document: &Html, base_url: &Url, limit: usize) -> Vec<Image> {
    document
        .select(&IMAGE)
        .filter_map(|element| {
            let el = element.value();
            let src = el.attr("src")?.trim();
            if src.is_empty() {
                return None;
            }

            Some(Image {
                alt: el.attr("alt").map(clean_text).unwrap_or_default(),
                src: resolve_url(src, base_url),
                width: el.attr("width").map(str::to_string),
                height: el.attr("height").map(str::to_string),
            })
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_extract_links_relative() {
        let doc = parse(
            r#"
            <html>
                <body>
                    <a href="/about">About</a>
                    <a href="contact">Contact</a>
                </body>
            </html>
        "#,
        );

        let base = Url::parse("https://example.com/path/").unwrap();
        let links = extract_links(&doc, &base, 10);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].text, "About");
        assert_eq!(links[0].href, "https://example.com/about");
        assert!(!links[0].is_external);
        assert_eq!(links[1].href, "https://example.com/path/contact");
    }

    #[test]
    fn test_extract_links_external_flag() {
        let doc = parse(r#"<a href="https://other.org/x">Elsewhere</a><a href="http://example.com/">Insecure</a>"#);
        let base = Url::parse("https://example.com").unwrap();
        let links = extract_links(&doc, &base, 10);

        assert_eq!(links.len(), 2);
        assert!(links[0].is_external);
        // different scheme is a different origin
        assert!(links[1].is_external);
    }

    #[test]
    fn test_extract_links_skips_short_or_empty_text() {
        let doc = parse(
            r#"
            <a href="/a"></a>
            <a href="/b">   </a>
            <a href="/c">Go</a>
            <a href="/d">Yes</a>
        "#,
        );
        let base = Url::parse("https://example.com").unwrap();
        let links = extract_links(&doc, &base, 10);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "Yes");
    }

    #[test]
    fn test_extract_links_duplicate() {
        let doc = parse(r#"<a href="https://example.com">First</a><a href="https://example.com">Second</a>"#);
        let base = Url::parse("https://example.com").unwrap();
        let links = extract_links(&doc, &base, 10);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "First");
    }

    #[test]
    fn test_extract_links_multiline_text() {
        let doc = parse(
            r#"
            <a href="https://example.com">
                Line 1
                Line 2
            </a>
        "#,
        );
        let base = Url::parse("https://example.com").unwrap();
        let links = extract_links(&doc, &base, 10);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "Line 1 Line 2");
    }

    #[test]
    fn test_extract_links_respects_limit() {
        let html: String = (0..30).map(|i| format!(r#"<a href="/page/{i}">Page {i}</a>"#)).collect();
        let doc = parse(&html);
        let base = Url::parse("https://example.com").unwrap();

        let links = extract_links(&doc, &base, 10);
        assert_eq!(links.len(), 10);
        assert_eq!(links[9].href, "https://example.com/page/9");
    }

    #[test]
    fn test_extract_links_fragment() {
        let doc = parse(r##"<a href="#section">Section</a>"##);
        let base = Url::parse("https://example.com").unwrap();
        let links = extract_links(&doc, &base, 10);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "https://example.com/#section");
    }

    #[test]
    fn test_extract_images() {
        let doc = parse(
            r#"
            <img src="/logo.png" alt="Logo" width="120" height="40">
            <img src="" alt="empty">
            <img alt="no src">
            <img src="https://cdn.example.net/a.jpg">
        "#,
        );
        let base = Url::parse("https://example.com/team/").unwrap();
        let images = extract_images(&doc, &base, 10);

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].src, "https://example.com/logo.png");
        assert_eq!(images[0].alt, "Logo");
        assert_eq!(images[0].width.as_deref(), Some("120"));
        assert_eq!(images[0].height.as_deref(), Some("40"));
        assert_eq!(images[1].alt, "");
        assert!(images[1].width.is_none());
    }

    #[test]
    fn test_extract_images_respects_limit() {
        let html: String = (0..25).map(|i| format!(r#"<img src="/img/{i}.png">"#)).collect();
        let doc = parse(&html);
        let base = Url::parse("https://example.com").unwrap();

        assert_eq!(extract_images(&doc, &base, 10).len(), 10);
        assert!(extract_images(&doc, &base, 0).is_empty());
    }

    #[test]
    fn test_no_links() {
        let doc = parse("<html><body><p>No links here</p></body></html>");
        let base = Url::parse("https://example.com").unwrap();
        assert!(extract_links(&doc, &base, 10).is_empty());
    }
}
