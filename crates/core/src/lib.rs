//! Core types and shared functionality for mcp-scout.
//!
//! This crate provides:
//! - Unified error types
//! - Layered application configuration
//! - Content-quality scoring thresholds shared by the extractor

pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigError, DEFAULT_USER_AGENT, QualityConfig};
pub use error::Error;
