//! Configuration management for the flipfinder scraper
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Marketplace filters are fixed and not configurable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::crawler::headers::DEFAULT_USER_AGENT;
use crate::crawler::pipeline::DEFAULT_RESULT_CAP;
use crate::error::Error;
use crate::parser::DEFAULT_CANDIDATE_CAP;
use crate::utils::retry::RetryPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fetcher configuration
    pub fetcher: FetcherConfig,

    /// Retry policy applied by the pipeline
    pub retry: RetryPolicy,

    /// Extraction limits
    pub extractor: ExtractorConfig,

    /// Raw document dump
    pub debug: DebugConfig,

    /// HTTP service configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Fetcher-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Override of the marketplace origin (mock servers, proxies)
    pub base_url: Option<String>,

    /// User agent string
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Skip TLS certificate verification for the marketplace host
    pub accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            accept_invalid_certs: true,
        }
    }
}

/// Extraction limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Accepted records after which extraction stops
    pub candidate_cap: usize,

    /// Records returned to the caller
    pub result_cap: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            candidate_cap: DEFAULT_CANDIDATE_CAP,
            result_cap: DEFAULT_RESULT_CAP,
        }
    }
}

/// Debug dump configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Directory receiving one file per fetched document; disabled when unset
    pub dump_dir: Option<PathBuf>,
}

/// HTTP service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind_address: SocketAddr,

    /// Allow cross-origin requests (browser extension clients)
    pub enable_cors: bool,

    /// Log every request
    pub enable_request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load validated configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load configuration from a file, without environment overrides
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from an optional file, then apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Overlay `FLIPFINDER_*` variables (and `PORT`) onto this configuration
    pub fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var("FLIPFINDER_BASE_URL") {
            self.fetcher.base_url = Some(base_url);
        }
        if let Ok(user_agent) = std::env::var("FLIPFINDER_USER_AGENT") {
            self.fetcher.user_agent = user_agent;
        }
        if let Some(secs) = env_parse("FLIPFINDER_REQUEST_TIMEOUT") {
            self.fetcher.request_timeout_secs = secs;
        }
        if let Some(accept) = env_parse("FLIPFINDER_ACCEPT_INVALID_CERTS") {
            self.fetcher.accept_invalid_certs = accept;
        }
        if let Some(max_retries) = env_parse("FLIPFINDER_MAX_RETRIES") {
            self.retry.max_retries = max_retries;
        }
        if let Some(delay) = env_parse("FLIPFINDER_RETRY_BASE_DELAY_MS") {
            self.retry.base_delay_ms = delay;
        }
        if let Ok(dir) = std::env::var("FLIPFINDER_DEBUG_DIR") {
            self.debug.dump_dir = Some(PathBuf::from(dir));
        }
        if let Some(port) = env_parse::<u16>("PORT") {
            self.server.bind_address.set_port(port);
        }
        if let Ok(level) = std::env::var("FLIPFINDER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FLIPFINDER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.fetcher.request_timeout_secs == 0 {
            return Err(Error::config("request_timeout_secs must be greater than 0"));
        }

        if self.retry.max_retries > 10 {
            return Err(Error::config("max_retries must be at most 10"));
        }

        if !(self.retry.backoff_multiplier >= 1.0 && self.retry.backoff_multiplier.is_finite()) {
            return Err(Error::config("backoff_multiplier must be a finite value >= 1.0"));
        }

        if self.extractor.result_cap == 0 {
            return Err(Error::config("result_cap must be greater than 0"));
        }

        if self.extractor.candidate_cap < self.extractor.result_cap {
            return Err(Error::config("candidate_cap must be at least result_cap"));
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.fetcher.request_timeout_secs)
    }
}
