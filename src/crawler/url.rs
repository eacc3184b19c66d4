//! Search URL construction
//!
//! A [`SearchRequest`] is built once per attempt from a validated [`Query`]
//! and a set of marketplace filters, and produces exactly one URL.

use std::fmt;
use url::form_urlencoded;

use crate::utils::error::QueryError;

/// A non-empty, trimmed search query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Trim and validate a caller-supplied query
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Empty` if nothing remains after trimming
    pub fn new(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encode the query, with spaces as `+`
    pub fn encoded(&self) -> String {
        form_urlencoded::byte_serialize(self.0.as_bytes()).collect()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Regional marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marketplace {
    #[default]
    Us,
    Au,
    Ca,
    Uk,
    De,
    Fr,
}

impl Marketplace {
    /// Origin of the regional site
    pub fn origin(&self) -> &'static str {
        match self {
            Self::Us => "https://www.ebay.com",
            Self::Au => "https://www.ebay.com.au",
            Self::Ca => "https://www.ebay.ca",
            Self::Uk => "https://www.ebay.co.uk",
            Self::De => "https://www.ebay.de",
            Self::Fr => "https://www.ebay.fr",
        }
    }
}

/// Item condition filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemCondition {
    #[default]
    Any,
    New,
    Opened,
    Refurbished,
    Used,
}

impl ItemCondition {
    fn query_fragment(&self) -> &'static str {
        match self {
            Self::Any => "",
            Self::New => "&LH_ItemCondition=1000",
            Self::Opened => "&LH_ItemCondition=1500",
            Self::Refurbished => "&LH_ItemCondition=2500",
            Self::Used => "&LH_ItemCondition=3000",
        }
    }
}

/// Listing type filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingType {
    #[default]
    Any,
    Auction,
    BuyItNow,
    BestOffer,
}

impl ListingType {
    fn query_fragment(&self) -> &'static str {
        match self {
            Self::Any => "&LH_All=1",
            Self::Auction => "&LH_Auction=1",
            Self::BuyItNow => "&LH_BIN=1",
            Self::BestOffer => "&LH_BO=1",
        }
    }
}

/// Fixed marketplace filters applied to every search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFilters {
    pub marketplace: Marketplace,
    pub condition: ItemCondition,
    pub listing_type: ListingType,
    pub sold_only: bool,
}

impl Default for SearchFilters {
    /// US marketplace, any condition, any listing type, completed + sold only
    fn default() -> Self {
        Self {
            marketplace: Marketplace::Us,
            condition: ItemCondition::Any,
            listing_type: ListingType::Any,
            sold_only: true,
        }
    }
}

/// One search against the marketplace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: Query,
    filters: SearchFilters,
    origin: String,
}

impl SearchRequest {
    /// Build a request for the default sold-listing filters
    pub fn new(query: Query) -> Self {
        Self::with_filters(query, SearchFilters::default())
    }

    pub fn with_filters(query: Query, filters: SearchFilters) -> Self {
        Self {
            origin: filters.marketplace.origin().to_string(),
            query,
            filters,
        }
    }

    /// Replace the marketplace origin, e.g. with a mock server
    #[must_use]
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = origin.trim_end_matches('/').to_string();
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The full search URL
    pub fn url(&self) -> String {
        let sold = if self.filters.sold_only {
            "&LH_Complete=1&LH_Sold=1"
        } else {
            ""
        };

        format!(
            "{}/sch/i.html?_from=R40&_nkw={}{}{}{}",
            self.origin,
            self.query.encoded(),
            sold,
            self.filters.condition.query_fragment(),
            self.filters.listing_type.query_fragment(),
        )
    }
}
