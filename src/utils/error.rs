//! Error types for the sold-listing scraper
//!
//! This module defines the domain errors raised by the fetcher, the query
//! validator and a single pipeline attempt.

use thiserror::Error;

/// Errors that can occur while fetching a search-results document
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (DNS, connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Non-success status code from the marketplace
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Classify a reqwest error, separating timeouts from other transport failures
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Errors raised when validating a caller-supplied query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Query was empty or whitespace-only
    #[error("Empty query provided")]
    Empty,
}

/// Outcome of a single failed pipeline attempt
#[derive(Error, Debug)]
pub enum AttemptError {
    /// The document could not be fetched
    #[error("source unavailable: {0}")]
    Unavailable(#[from] FetchError),

    /// The document was fetched but yielded no valid listings
    #[error("no listings extracted")]
    NoListings,

    /// Extraction task failed unexpectedly
    #[error("internal error: {0}")]
    Internal(String),
}

impl AttemptError {
    /// Whether this attempt found the source reachable but empty
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::NoListings)
    }
}
