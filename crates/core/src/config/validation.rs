//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `fetch_attempts` or `max_iterations` is 0
    /// - `retry_max_ms` is smaller than `retry_base_ms`
    /// - `temperature` is outside `0.0..=2.0`
    /// - any quality ratio or score is outside `0.0..=1.0`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.fetch_attempts == 0 {
            return Err(invalid("fetch_attempts", "must be at least 1"));
        }
        if self.retry_max_ms < self.retry_base_ms {
            return Err(invalid("retry_max_ms", "must not be smaller than retry_base_ms"));
        }

        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", "must be between 0.0 and 2.0"));
        }
        if self.max_tokens == 0 {
            return Err(invalid("max_tokens", "must be greater than 0"));
        }

        let q = &self.quality;
        for (field, value) in [
            ("quality.max_duplicate_ratio", q.max_duplicate_ratio),
            ("quality.short_content_score", q.short_content_score),
            ("quality.repetitive_content_score", q.repetitive_content_score),
            ("quality.length_weight", q.length_weight),
            ("quality.word_count_weight", q.word_count_weight),
            ("quality.sentence_weight", q.sentence_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
        }

        if self.max_content_length == 0 {
            tracing::warn!("max_content_length is 0; every page will report empty content");
        }

        Ok(())
    }
}
