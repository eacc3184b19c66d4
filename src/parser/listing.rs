//! Listing record extraction
//!
//! Locates listing blocks through the selector cascade, skips the leading
//! sponsored slot, and turns each remaining block into a [`ListingRecord`].
//! A block that fails validation is simply dropped; extraction never fails.

use scraper::{ElementRef, Html};

use crate::models::{ListingRecord, Price};
use crate::parser::price::normalize_price;
use crate::parser::selectors::{BlockSelectors, SelectorCascade};
use crate::utils::strip_query_string;

/// Default number of accepted records after which extraction stops
pub const DEFAULT_CANDIDATE_CAP: usize = 15;

/// Titles that mark a non-product placeholder block
const PLACEHOLDER_TITLES: &[&str] = &["shop on ebay"];

/// Summary of one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Name of the cascade tier that matched, if any
    pub tier: Option<&'static str>,

    /// Number of blocks the tier returned, sponsored slot included
    pub candidates: usize,

    /// Number of records that passed validation
    pub accepted: usize,
}

/// Extracts sold-listing records from a search-results document
pub struct ListingExtractor {
    cascade: SelectorCascade,
    selectors: BlockSelectors,
    candidate_cap: usize,
}

impl ListingExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self::with_cascade(SelectorCascade::listing_default())
    }

    /// Create an extractor using a custom selector cascade
    #[must_use]
    pub fn with_cascade(cascade: SelectorCascade) -> Self {
        Self {
            cascade,
            selectors: BlockSelectors::new(),
            candidate_cap: DEFAULT_CANDIDATE_CAP,
        }
    }

    /// Override the cap on accepted records
    #[must_use]
    pub fn candidate_cap(mut self, cap: usize) -> Self {
        self.candidate_cap = cap;
        self
    }

    /// Extract records in document order
    pub fn extract(&self, html: &str) -> Vec<ListingRecord> {
        self.extract_with_report(html).0
    }

    /// Extract records and report which cascade tier produced them
    pub fn extract_with_report(&self, html: &str) -> (Vec<ListingRecord>, ExtractionReport) {
        let document = Html::parse_document(html);

        let Some(found) = self.cascade.locate(&document) else {
            tracing::debug!("No listing blocks matched any selector tier");
            return (Vec::new(), ExtractionReport::default());
        };

        tracing::debug!(
            tier = found.tier_name,
            candidates = found.blocks.len(),
            "Located listing blocks"
        );

        let records: Vec<ListingRecord> = found
            .blocks
            .iter()
            .skip(1)
            .filter_map(|block| self.parse_block(*block))
            .take(self.candidate_cap)
            .collect();

        let report = ExtractionReport {
            tier: Some(found.tier_name),
            candidates: found.blocks.len(),
            accepted: records.len(),
        };

        (records, report)
    }

    /// Parse one candidate block, returning `None` if it fails validation
    pub fn parse_block(&self, block: ElementRef<'_>) -> Option<ListingRecord> {
        let title = self.extract_title(block)?;

        let price_text = block
            .select(self.selectors.price)
            .next()
            .map(|el| el.text().collect::<String>())?;
        let Some(price) = normalize_price(&price_text).and_then(Price::usd) else {
            tracing::trace!(title = %title, price = %price_text.trim(), "Rejected block: price");
            return None;
        };

        let url = self.extract_url(block)?;

        Some(ListingRecord::new(title, price, url))
    }

    fn extract_title(&self, block: ElementRef<'_>) -> Option<String> {
        let title_el = block.select(self.selectors.title).next()?;

        let raw = title_el
            .select(self.selectors.title_label)
            .next()
            .map_or_else(
                || title_el.text().collect::<String>(),
                |label| label.text().collect::<String>(),
            );
        let title = raw.trim().to_string();

        if title.is_empty() || is_placeholder_title(&title) {
            tracing::trace!(title = %title, "Rejected block: title");
            return None;
        }

        Some(title)
    }

    /// First anchor's target with any query string removed
    ///
    /// A block without any anchor keeps an empty URL; an anchor without an
    /// `href` rejects the block.
    fn extract_url(&self, block: ElementRef<'_>) -> Option<String> {
        match block.select(self.selectors.anchor).next() {
            Some(anchor) => anchor
                .value()
                .attr("href")
                .map(|href| strip_query_string(href.trim()).to_string()),
            None => Some(String::new()),
        }
    }
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_placeholder_title(title: &str) -> bool {
    PLACEHOLDER_TITLES
        .iter()
        .any(|placeholder| title.eq_ignore_ascii_case(placeholder))
}
