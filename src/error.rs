//! Crate-level error type
//!
//! Fetch, query and attempt errors live in [`crate::utils::error`] and never
//! leave the pipeline. This type covers loading and validating configuration,
//! the one fallible step outside it.

use std::io;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Config file is not valid TOML for [`Config`](crate::config::Config)
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value failed validation
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the crate Error type
pub type Result<T> = std::result::Result<T, Error>;
