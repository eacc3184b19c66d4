//! flipfinder - eBay sold-listing scraper
//!
//! Fetches a marketplace search-results page for a free-text query, extracts
//! up to ten sold listings (title, price, link) and wraps the outcome in a
//! uniform success/failure envelope.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Search URL construction, page fetching and the retry pipeline
//! - [`parser`] - Selector cascade, price normalization and record extraction
//! - [`models`] - Listing records and the result envelope
//! - [`server`] - HTTP routing layer
//! - [`utils`] - Retry policy and common helpers
//!
//! # Example
//!
//! ```no_run
//! use flipfinder::config::Config;
//! use flipfinder::crawler::SoldListingsPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let pipeline = SoldListingsPipeline::from_config(&config)?;
//!     let envelope = pipeline.get_sold_listings("nintendo switch").await;
//!     println!("{} listings, average {}", envelope.total, envelope.average_price);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod server;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{DocumentSource, HttpFetcher, SoldListingsPipeline};
    pub use crate::error::{Error, Result};
    pub use crate::models::{ListingRecord, Price, ResultEnvelope};
    pub use crate::parser::ListingExtractor;
    pub use crate::utils::retry::RetryPolicy;
}

// Direct re-exports for convenience
pub use models::{ListingRecord, ResultEnvelope};
