//! Configuration module for keyseek
//!
//! Crawl behavior (timeouts, user agent, politeness delay, page cap) and the
//! storage location are supplied externally through a TOML file, validated on
//! load. Every knob has a default so a minimal config is just a database
//! path.

use crate::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for keyseek
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub storage: StorageConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Per-request timeout in milliseconds
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Politeness delay between successive fetches, in milliseconds
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Maximum number of pages to visit per crawl
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Bounded wait when polling an empty frontier, in milliseconds.
    /// Tuning parameter only; the loop condition is re-checked after every
    /// wait.
    #[serde(rename = "queue-poll-wait-ms", default = "default_queue_poll_wait_ms")]
    pub queue_poll_wait_ms: u64,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    "keyseek/0.1".to_string()
}

fn default_delay_ms() -> u64 {
    100
}

fn default_max_pages() -> usize {
    1_000
}

fn default_queue_poll_wait_ms() -> u64 {
    250
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            delay_ms: default_delay_ms(),
            max_pages: default_max_pages(),
            queue_poll_wait_ms: default_queue_poll_wait_ms(),
        }
    }
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn queue_poll_wait(&self) -> Duration {
        Duration::from_millis(self.queue_poll_wait_ms)
    }
}

/// Loads and parses a configuration file from the given path
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Validates a parsed configuration
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "crawler.timeout-ms must be greater than 0".to_string(),
        ));
    }
    if config.crawler.max_pages == 0 {
        return Err(ConfigError::Validation(
            "crawler.max-pages must be greater than 0".to_string(),
        ));
    }
    if config.crawler.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler.user-agent must not be empty".to_string(),
        ));
    }
    if config.storage.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage.database-path must not be empty".to_string(),
        ));
    }
    Ok(())
}
