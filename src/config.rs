//! Configuration management for chaser-element

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WebDriver endpoint
    pub webdriver_url: String,

    /// Default timeout for element synchronization in milliseconds
    pub default_timeout_ms: u64,

    /// Fixed delay between poll attempts in milliseconds
    pub poll_interval_ms: u64,

    /// Re-locate elements by their criteria when a cached handle goes stale
    pub always_locate: bool,

    /// Allow handle-based proxies with fallback criteria to re-locate
    pub relocate_handle_based: bool,

    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            default_timeout_ms: 20_000,
            poll_interval_ms: 100,
            always_locate: true,
            relocate_handle_based: false,
            log_level: "info".to_string(),
        }
    }
}

/// Staleness recovery policy copied into each element proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocatePolicy {
    /// Re-locate criteria-based proxies after staleness
    pub always_locate: bool,
    /// Re-locate handle-based proxies through their fallback criteria
    pub relocate_handle_based: bool,
}

impl Default for RelocatePolicy {
    fn default() -> Self {
        Config::default().relocate_policy()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(url) = env::var("CHASER_WEBDRIVER_URL") {
            config.webdriver_url = url;
        }

        if let Ok(timeout) = env::var("CHASER_DEFAULT_TIMEOUT") {
            config.default_timeout_ms = timeout
                .parse()
                .map_err(|_| Error::configuration("Invalid CHASER_DEFAULT_TIMEOUT"))?;
        }

        if let Ok(interval) = env::var("CHASER_POLL_INTERVAL") {
            config.poll_interval_ms = interval
                .parse()
                .map_err(|_| Error::configuration("Invalid CHASER_POLL_INTERVAL"))?;
        }

        if let Ok(always_locate) = env::var("CHASER_ALWAYS_LOCATE") {
            config.always_locate = always_locate
                .parse()
                .map_err(|_| Error::configuration("Invalid CHASER_ALWAYS_LOCATE"))?;
        }

        if let Ok(relocate) = env::var("CHASER_RELOCATE_HANDLE_BASED") {
            config.relocate_handle_based = relocate
                .parse()
                .map_err(|_| Error::configuration("Invalid CHASER_RELOCATE_HANDLE_BASED"))?;
        }

        if let Ok(log_level) = env::var("CHASER_LOG_LEVEL") {
            config.log_level = log_level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::configuration("poll_interval_ms must be greater than zero"));
        }
        Ok(())
    }

    /// Default synchronization timeout
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Delay between poll attempts
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Relocation policy handed to new element proxies
    pub fn relocate_policy(&self) -> RelocatePolicy {
        RelocatePolicy {
            always_locate: self.always_locate,
            relocate_handle_based: self.relocate_handle_based,
        }
    }
}
