//! Content extraction from fetched HTML.
//!
//! ### Best-candidate selection
//! - Containers are tried in a fixed priority order, from semantic `main`
//!   regions through common content class names down to `body`.
//! - Within each container, noise subtrees (scripts, navigation, ads, popups,
//!   cookie banners, ...) are skipped and the remaining text is cleaned and
//!   scored.
//! - The highest-scoring non-empty candidate wins; ties keep the earlier,
//!   higher-priority container. When nothing scores above zero the content is
//!   empty.
//!
//! ### Page metadata
//! Title, meta tags, canonical URL, language, charset, links, images,
//! ld+json blocks and contact details are extracted independently of the
//! winning container, each bounded by its cap in [`ExtractConfig`].

pub mod contact;
pub mod links;
pub mod metadata;
pub mod normalize;
pub mod quality;

pub use contact::{ContactInfo, extract_contacts};
pub use links::{Image, Link, extract_images, extract_links};
pub use metadata::{PageMetadata, charset_from_content_type, extract_structured_data, sniff_charset};
pub use normalize::clean_text;
pub use quality::score_content;

use std::collections::HashSet;

use scout_core::{AppConfig, QualityConfig};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

/// Content containers in priority order.
pub const PRIMARY_SELECTORS: &[&str] = &[
    "main",
    r#"[role="main"]"#,
    ".main-content",
    ".content",
    "article",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".blog-content",
    ".page-content",
    "#content",
    "#main",
    ".container .content",
    "body",
];

/// Subtrees dropped from a container before its text is scored.
pub const NOISE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "nav",
    "footer",
    "header",
    ".ad",
    ".ads",
    ".advertisement",
    ".sidebar",
    ".navigation",
    ".menu",
    ".breadcrumb",
    ".social-share",
    ".comments",
    ".comment",
    ".popup",
    ".modal",
    ".overlay",
    r#"[class*="ad-"]"#,
    r#"[id*="ad-"]"#,
    ".cookie-notice",
    ".newsletter",
];

/// Caps and thresholds for content extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    /// Maximum characters of best content kept (default: 30000)
    pub max_content_length: usize,
    /// Maximum links reported (default: 10)
    pub max_links: usize,
    /// Maximum images reported (default: 10)
    pub max_images: usize,
    /// Maximum ld+json blocks reported (default: 3)
    pub max_structured_data: usize,
    /// Maximum emails and phones, each (default: 5)
    pub max_contacts: usize,
    pub quality: QualityConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ExtractConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_content_length: config.max_content_length,
            max_links: config.max_links,
            max_images: config.max_images,
            max_structured_data: config.max_structured_data,
            max_contacts: config.max_contacts,
            quality: config.quality.clone(),
        }
    }
}

/// Result of content extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Best content, capped to `max_content_length` characters
    pub content: String,
    /// Score of the winning candidate in [0, 1]
    pub quality_score: f64,
    /// Character count of `content`
    pub content_length: usize,
    /// Character count of the winning candidate before capping
    pub full_content_length: usize,
    /// Selector of the winning container, if any candidate scored
    pub selector: Option<&'static str>,
    pub metadata: PageMetadata,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub contact_info: ContactInfo,
    pub structured_data: Vec<Value>,
}

/// Stable extractor trait for content extraction.
pub trait Extractor: Send + Sync {
    /// Extract content and page metadata from HTML fetched from `base_url`.
    fn extract(&self, html: &str, base_url: &Url, config: &ExtractConfig) -> ExtractionResult;
}

/// One container's cleaned text and score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub selector: &'static str,
    pub text: String,
    pub score: f64,
}

/// Container-scoring extractor over [`PRIMARY_SELECTORS`].
pub struct HeuristicExtractor {
    containers: Vec<(&'static str, Selector)>,
    noise: Selector,
}

impl HeuristicExtractor {
    pub fn new() -> Self {
        let containers = PRIMARY_SELECTORS
            .iter()
            .map(|css| (*css, Selector::parse(css).expect("invalid selector")))
            .collect();
        let noise = Selector::parse(&NOISE_SELECTORS.join(", ")).expect("invalid selector");

        Self { containers, noise }
    }

    /// Score the first match of every container selector, in priority order.
    pub fn candidates(&self, document: &Html, quality: &QualityConfig) -> Vec<Candidate> {
        self.containers
            .iter()
            .filter_map(|(css, selector)| {
                let container = document.select(selector).next()?;
                let text = clean_text(&self.container_text(container));
                let score = score_content(&text, quality);
                tracing::debug!(selector = *css, score, chars = text.len(), "scored candidate");
                Some(Candidate { selector: *css, text, score })
            })
            .collect()
    }

    /// Text of `container` with noise subtrees skipped; text nodes are joined with spaces.
    fn container_text(&self, container: ElementRef<'_>) -> String {
        let noise: HashSet<_> = container.select(&self.noise).map(|el| el.id()).collect();

        container
            .descendants()
            .filter_map(|node| node.value().as_text().map(|text| (node, text)))
            .filter(|(node, _)| !node.ancestors().any(|ancestor| noise.contains(&ancestor.id())))
            .map(|(_, text)| &**text)
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the highest-scoring non-empty candidate; ties keep the earlier one.
pub fn select_best(candidates: impl IntoIterator<Item = Candidate>) -> Option<Candidate> {
    candidates.into_iter().fold(None, |best, candidate| {
        let best_score = best.as_ref().map_or(0.0, |b: &Candidate| b.score);
        if candidate.score > best_score && !candidate.text.is_empty() { Some(candidate) } else { best }
    })
}

/// Cap `text` to `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

impl Extractor for HeuristicExtractor {
    fn extract(&self, html: &str, base_url: &Url, config: &ExtractConfig) -> ExtractionResult {
        let document = Html::parse_document(html);

        let best = select_best(self.candidates(&document, &config.quality));
        let (content, quality_score, full_content_length, selector) = match best {
            Some(candidate) => {
                let full = candidate.text.chars().count();
                (truncate_chars(&candidate.text, config.max_content_length), candidate.score, full, Some(candidate.selector))
            }
            None => (String::new(), 0.0, 0, None),
        };

        ExtractionResult {
            content_length: content.chars().count(),
            content,
            quality_score,
            full_content_length,
            selector,
            metadata: PageMetadata::from_document(&document, base_url),
            links: extract_links(&document, base_url, config.max_links),
            images: extract_images(&document, base_url, config.max_images),
            contact_info: extract_contacts(html, config.max_contacts),
            structured_data: extract_structured_data(&document, config.max_structured_data),
        }
    }
}
