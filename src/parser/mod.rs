//! HTML parsing and data extraction
//!
//! This module handles parsing marketplace search-result pages and extracting
//! structured sold-listing records.

pub mod listing;
pub mod price;
pub mod selectors;

// Re-export main extractor and public types
pub use listing::{ExtractionReport, ListingExtractor, DEFAULT_CANDIDATE_CAP};
pub use price::normalize_price;
pub use selectors::{SelectorCascade, SelectorTier};
