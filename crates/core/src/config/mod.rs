//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SCOUT_*)
//! 2. TOML config file (if SCOUT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod quality;
mod validation;

pub use quality::QualityConfig;
pub use validation::ConfigError;

/// Browser user agent presented to target sites.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SCOUT_*, nested keys split on `__`)
/// 2. TOML config file (if SCOUT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bearer token for the chat-completions API.
    ///
    /// Set via SCOUT_LLM_API_KEY. Required only when the enhance tool runs.
    #[serde(default)]
    pub llm_api_key: Option<String>,

    /// Base URL of an OpenAI-compatible chat-completions API.
    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Sampling temperature for every model call.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Token budget for every model call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on tool-calling turns before the forced final call.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Model request timeout in milliseconds.
    #[serde(default = "default_llm_timeout_ms")]
    pub llm_timeout_ms: u64,

    /// Retries for transient model transport failures.
    #[serde(default = "default_llm_max_retries")]
    pub llm_max_retries: u32,

    /// User-Agent string for page fetches.
    ///
    /// Set via SCOUT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header for page fetches.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SCOUT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via SCOUT_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Total fetch attempts per URL, including the first.
    #[serde(default = "default_fetch_attempts")]
    pub fetch_attempts: u32,

    /// Backoff base in milliseconds; the delay after attempt `n` is `2^n * base`.
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,

    /// Backoff ceiling in milliseconds.
    #[serde(default = "default_retry_max_ms")]
    pub retry_max_ms: u64,

    /// Maximum characters of best content kept per page.
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,

    /// Maximum outbound links reported per page.
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Maximum images reported per page.
    #[serde(default = "default_max_images")]
    pub max_images: usize,

    /// Maximum ld+json blocks reported per page.
    #[serde(default = "default_max_structured_data")]
    pub max_structured_data: usize,

    /// Maximum emails and, separately, phones reported per page.
    #[serde(default = "default_max_contacts")]
    pub max_contacts: usize,

    /// Brave API subscription token for keyword searches.
    ///
    /// Set via SCOUT_BRAVE_API_KEY. Without it `web_search` only fetches URLs.
    #[serde(default)]
    pub brave_api_key: Option<String>,

    /// Content-quality scoring thresholds.
    #[serde(default)]
    pub quality: QualityConfig,
}

fn default_llm_base_url() -> String {
    "https://api.moonshot.cn/v1".into()
}

fn default_llm_model() -> String {
    "moonshot-v1-128k".into()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    8000
}

fn default_max_iterations() -> usize {
    10
}

fn default_llm_timeout_ms() -> u64 {
    120_000
}

fn default_llm_max_retries() -> u32 {
    2
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_accept_language() -> String {
    "zh-HK,zh;q=0.9,en;q=0.8".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_fetch_attempts() -> u32 {
    3
}

fn default_retry_base_ms() -> u64 {
    1_000
}

fn default_retry_max_ms() -> u64 {
    10_000
}

fn default_max_content_length() -> usize {
    30_000
}

fn default_max_links() -> usize {
    10
}

fn default_max_images() -> usize {
    10
}

fn default_max_structured_data() -> usize {
    3
}

fn default_max_contacts() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm_api_key: None,
            llm_base_url: default_llm_base_url(),
            llm_model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_iterations: default_max_iterations(),
            llm_timeout_ms: default_llm_timeout_ms(),
            llm_max_retries: default_llm_max_retries(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_bytes: default_max_bytes(),
            fetch_attempts: default_fetch_attempts(),
            retry_base_ms: default_retry_base_ms(),
            retry_max_ms: default_retry_max_ms(),
            max_content_length: default_max_content_length(),
            max_links: default_max_links(),
            max_images: default_max_images(),
            max_structured_data: default_max_structured_data(),
            max_contacts: default_max_contacts(),
            brave_api_key: None,
            quality: QualityConfig::default(),
        }
    }
}

impl AppConfig {
    /// Fetch timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Model request timeout as Duration.
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SCOUT_`
    /// 2. TOML file from `SCOUT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config_file = std::env::var("SCOUT_CONFIG_FILE").ok().map(PathBuf::from);
        Self::figment(config_file)
            .extract::<Self>()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))
            .and_then(|config| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Build the layered provider chain without extracting it.
    fn figment(config_file: Option<PathBuf>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(
            Env::prefixed("SCOUT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Check if the model API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_llm_api_key(&self) -> Result<&str, ConfigError> {
        self.llm_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "llm_api_key".into(),
                hint: "Set SCOUT_LLM_API_KEY environment variable".into(),
            })
    }
}
