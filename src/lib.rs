//! Keyseek: keyword-triggered, origin-restricted web crawls
//!
//! Given a starting URL and a search term, keyseek visits pages reachable by
//! following only same-origin hyperlinks, records every page whose raw markup
//! contains the term, and exposes progressive results while the crawl is
//! still running.

pub mod config;
pub mod crawler;
pub mod service;
pub mod storage;
pub mod task;
pub mod url;

use thiserror::Error;

/// Main error type for keyseek operations
#[derive(Debug, Error)]
pub enum KeyseekError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Keyword must be between 4 and 32 characters, got {got}")]
    InvalidKeyword { got: usize },

    #[error("Invalid crawl origin: {0}")]
    InvalidOrigin(String),

    #[error("No crawl found with id {0}")]
    TaskNotFound(String),

    #[error("Crawl dispatch channel closed")]
    DispatchClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for keyseek operations
pub type Result<T> = std::result::Result<T, KeyseekError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use service::{CrawlJob, CrawlResult, CrawlService};
pub use task::{CrawlTask, TaskStatus};
pub use url::{resolve_href, same_origin};
