//! Thresholds and weights for the content-quality scorer.
//!
//! The values are empirical; they are configuration rather than constants so
//! deployments can retune them without a rebuild.

use serde::{Deserialize, Serialize};

/// Scoring thresholds for candidate content blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Texts shorter than this many characters score 0.
    pub min_content_length: usize,
    /// Texts with fewer qualifying words than this score `short_content_score`.
    pub min_word_count: usize,
    /// Duplicate-token ratio above which a text scores `repetitive_content_score`.
    pub max_duplicate_ratio: f64,
    pub short_content_score: f64,
    pub repetitive_content_score: f64,
    /// Weight of `min(len / 1000, 1)`.
    pub length_weight: f64,
    /// Weight of `min(words, 100) / 100`.
    pub word_count_weight: f64,
    /// Awarded when the text contains sentence-ending punctuation.
    pub sentence_weight: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_content_length: 100,
            min_word_count: 20,
            max_duplicate_ratio: 0.8,
            short_content_score: 0.2,
            repetitive_content_score: 0.3,
            length_weight: 0.5,
            word_count_weight: 0.3,
            sentence_weight: 0.2,
        }
    }
}
