//! Search-page fetching and the retry pipeline
//!
//! This module builds marketplace search URLs, fetches result pages, and
//! orchestrates fetch + extraction with retry and backoff.

pub mod debug;
pub mod fetcher;
pub mod headers;
pub mod pipeline;
pub mod url;

pub use debug::{DebugSink, FileDebugSink, NoopDebugSink};
pub use fetcher::{DocumentSource, HttpFetcher};
pub use pipeline::SoldListingsPipeline;
pub use self::url::{Query, SearchFilters, SearchRequest};
