//! Heuristic 0–1 quality score for a cleaned text block.
//!
//! ### Rules (in order)
//! 1. shorter than `min_content_length` characters → `0.0`
//! 2. fewer than `min_word_count` words (whitespace tokens longer than one
//!    character) → `short_content_score`
//! 3. duplicate ratio `1 - distinct/total` (case-insensitive) above
//!    `max_duplicate_ratio` → `repetitive_content_score`
//! 4. otherwise `length_weight * min(len/1000, 1)
//!    + word_count_weight * min(words, 100)/100
//!    + sentence_weight * [has sentence-ending punctuation]`, clamped to 1

use std::collections::HashSet;

use scout_core::QualityConfig;

/// Characters that mark the end of a sentence.
const SENTENCE_ENDINGS: &[char] = &['.', '。', '!', '?', '！', '？'];

/// Score a cleaned text block.
pub fn score_content(text: &str, config: &QualityConfig) -> f64 {
    let length = text.chars().count();
    if length == 0 || length < config.min_content_length {
        return 0.0;
    }

    let words: Vec<&str> = text.split_whitespace().filter(|w| w.chars().count() > 1).collect();
    if words.len() < config.min_word_count {
        return clamp_unit(config.short_content_score);
    }

    if duplicate_ratio(&words) > config.max_duplicate_ratio {
        return clamp_unit(config.repetitive_content_score);
    }

    let length_term = (length as f64 / 1000.0).min(1.0) * config.length_weight;
    let word_term = (words.len().min(100) as f64 / 100.0) * config.word_count_weight;
    let sentence_term = if text.contains(SENTENCE_ENDINGS) { config.sentence_weight } else { 0.0 };

    clamp_unit(length_term + word_term + sentence_term)
}

/// Share of tokens that repeat an earlier token, ignoring case.
pub fn duplicate_ratio(words: &[&str]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let distinct: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
    1.0 - distinct.len() as f64 / words.len() as f64
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(words: usize) -> String {
        (0..words).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ") + "."
    }

    #[test]
    fn test_below_min_length_scores_zero() {
        let config = QualityConfig::default();
        assert_eq!(score_content("", &config), 0.0);
        assert_eq!(score_content("short text.", &config), 0.0);
        assert_eq!(score_content(&"x".repeat(99), &config), 0.0);
    }

    #[test]
    fn test_too_few_words_scores_short() {
        let config = QualityConfig::default();
        // 100+ characters but only a handful of tokens
        let text = format!("{} {} {}", "a".repeat(40), "b".repeat(40), "c".repeat(40));
        assert_eq!(score_content(&text, &config), 0.2);
    }

    #[test]
    fn test_single_char_tokens_do_not_count() {
        let config = QualityConfig::default();
        let text = "a ".repeat(80);
        assert_eq!(score_content(&text, &config), 0.2);
    }

    #[test]
    fn test_repetitive_text_scores_repetitive() {
        let config = QualityConfig::default();
        let text = "spam ".repeat(30);
        assert_eq!(score_content(text.trim(), &config), 0.3);
    }

    #[test]
    fn test_repetition_penalty_with_relaxed_gates() {
        let config = QualityConfig { min_content_length: 0, min_word_count: 1, ..Default::default() };
        assert_eq!(score_content("spam spam spam spam spam spam", &config), 0.3);
    }

    #[test]
    fn test_duplicate_ratio_boundary_is_not_penalized() {
        // 5 tokens, 1 distinct → ratio 0.8 which does not exceed 0.8
        let config = QualityConfig { min_content_length: 0, min_word_count: 1, ..Default::default() };
        let score = score_content("spam spam spam spam spam", &config);
        assert!(score < 0.3);
        assert!(score > 0.0);
    }

    #[test]
    fn test_duplicate_ratio_case_insensitive() {
        assert!((duplicate_ratio(&["Rust", "rust", "RUST", "go"]) - 0.5).abs() < 1e-9);
        assert_eq!(duplicate_ratio(&[]), 0.0);
    }

    #[test]
    fn test_composed_score() {
        let config = QualityConfig::default();
        let text = article(50);
        let length = text.chars().count() as f64;
        let expected = (length / 1000.0).min(1.0) * 0.5 + 0.5 * 0.3 + 0.2;
        assert!((score_content(&text, &config) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_without_sentence_punctuation() {
        let config = QualityConfig::default();
        let with = article(50);
        let without = with.trim_end_matches('.').to_string();
        let diff = score_content(&with, &config) - score_content(&without, &config);
        assert!(diff > 0.19);
    }

    #[test]
    fn test_long_article_caps_at_one() {
        let config = QualityConfig::default();
        let text = article(400);
        assert!((score_content(&text, &config) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_always_in_unit_interval() {
        let config = QualityConfig::default();
        let samples = [
            String::new(),
            "。".repeat(500),
            article(5),
            article(25),
            article(2000),
            "Hello world! ".repeat(100),
            "中文內容沒有空格".repeat(50),
        ];
        for sample in &samples {
            let score = score_content(sample, &config);
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn test_oversized_weights_are_clamped() {
        let config = QualityConfig { length_weight: 1.0, word_count_weight: 1.0, sentence_weight: 1.0, ..Default::default() };
        assert_eq!(score_content(&article(200), &config), 1.0);
    }
}
