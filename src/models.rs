// Core data structures for the sold-listing scraper

use serde::{Deserialize, Serialize};

/// Currency attached to every extracted price
pub const CURRENCY_USD: &str = "USD";

/// Placeholder used until item condition is extracted
pub const CONDITION_NOT_SPECIFIED: &str = "Not specified";

/// Note attached to every successful envelope
pub const SUCCESS_NOTE: &str = "Based on actual sold listings from eBay";

/// Message surfaced when the marketplace could not be reached
pub const UNAVAILABLE_MESSAGE: &str =
    "eBay sold listings are temporarily unavailable. Please try again later.";

/// Upper bound (exclusive) accepted for a listing price
pub const MAX_PRICE: f64 = 1_000_000.0;

/// A positive amount in a fixed currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub value: f64,
    pub currency: String,
}

impl Price {
    /// Build a USD price, rejecting values outside `(0, MAX_PRICE)`
    pub fn usd(value: f64) -> Option<Self> {
        (value > 0.0 && value < MAX_PRICE).then(|| Self {
            value,
            currency: CURRENCY_USD.to_string(),
        })
    }
}

/// One sold listing extracted from a search-results page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub title: String,
    pub price: Price,
    pub condition: String,
    #[serde(rename = "itemWebUrl")]
    pub url: String,
    pub sold_date: String,
}

impl ListingRecord {
    /// Create a record with the fixed condition and sold-date placeholders
    pub fn new(title: impl Into<String>, price: Price, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price,
            condition: CONDITION_NOT_SPECIFIED.to_string(),
            url: url.into(),
            sold_date: String::new(),
        }
    }
}

/// Uniform result returned to the caller of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    pub items: Vec<ListingRecord>,
    pub total: usize,
    /// Left at zero; averaging is the caller's job after its own filtering
    pub average_price: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ResultEnvelope {
    /// Successful envelope; `total` always mirrors `items.len()`
    pub fn success(items: Vec<ListingRecord>) -> Self {
        Self {
            success: true,
            total: items.len(),
            items,
            average_price: 0.0,
            note: Some(SUCCESS_NOTE.to_string()),
            error: None,
        }
    }

    /// Failure envelope with zeroed numeric fields
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            items: Vec::new(),
            total: 0,
            average_price: 0.0,
            note: None,
            error: Some(message.into()),
        }
    }

    /// Failure envelope for a query that yielded no listings
    pub fn no_listings(query: &str) -> Self {
        Self::failure(format!("No sold listings found for \"{query}\""))
    }

    /// Failure envelope for an unreachable source
    pub fn unavailable() -> Self {
        Self::failure(UNAVAILABLE_MESSAGE)
    }
}
