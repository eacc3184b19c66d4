//! Sold-listing pipeline
//!
//! Wraps fetch + extraction in a retry loop and maps the final outcome to a
//! [`ResultEnvelope`].
//!
//! ```text
//! ATTEMPT(a) ── sleep(backoff(a)) ──▶ fetch ──▶ extract ──▶ TERMINAL_SUCCESS
//!     ▲                                 │          │
//!     └──── a < max_retries ◀── fail ───┴── empty ─┘
//!                   │
//!                   └── a == max_retries ──▶ TERMINAL_FAILURE
//! ```
//!
//! # Example
//!
//! ```no_run
//! use flipfinder::config::Config;
//! use flipfinder::crawler::pipeline::SoldListingsPipeline;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pipeline = SoldListingsPipeline::from_config(&Config::default())?;
//! let envelope = pipeline.get_sold_listings("iPhone 12").await;
//! println!("{} listings", envelope.total);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::Config;
use crate::crawler::debug::FileDebugSink;
use crate::crawler::fetcher::{DocumentSource, HttpFetcher};
use crate::crawler::url::{Query, SearchRequest};
use crate::models::{ListingRecord, ResultEnvelope};
use crate::parser::ListingExtractor;
use crate::utils::error::AttemptError;
use crate::utils::retry::{with_retry, RetryPolicy};

/// Default number of records returned to the caller
pub const DEFAULT_RESULT_CAP: usize = 10;

/// Fetch → extract → retry orchestration
///
/// Holds no per-call state; every call is retried and timed independently.
pub struct SoldListingsPipeline {
    source: Arc<dyn DocumentSource>,
    extractor: Arc<ListingExtractor>,
    policy: RetryPolicy,
    result_cap: usize,
}

impl SoldListingsPipeline {
    /// Create a pipeline over an arbitrary document source
    pub fn new(source: Arc<dyn DocumentSource>, policy: RetryPolicy) -> Self {
        Self {
            source,
            extractor: Arc::new(ListingExtractor::new()),
            policy,
            result_cap: DEFAULT_RESULT_CAP,
        }
    }

    /// Build the production pipeline (HTTP fetcher + optional debug dump)
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut fetcher =
            HttpFetcher::new(&config.fetcher).context("Failed to create HTTP fetcher")?;

        if let Some(dir) = &config.debug.dump_dir {
            tracing::info!(dir = %dir.display(), "Debug document dump enabled");
            fetcher = fetcher.with_debug_sink(Arc::new(FileDebugSink::new(dir.clone())));
        }

        let extractor = ListingExtractor::new().candidate_cap(config.extractor.candidate_cap);

        Ok(Self::new(Arc::new(fetcher), config.retry.clone())
            .with_extractor(extractor)
            .with_result_cap(config.extractor.result_cap))
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: ListingExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    #[must_use]
    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = cap;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch sold listings using the configured retry policy
    pub async fn get_sold_listings(&self, query: &str) -> ResultEnvelope {
        self.get_sold_listings_with(query, self.policy.max_retries).await
    }

    /// Fetch sold listings with an explicit retry budget
    ///
    /// Never fails: every outcome, including a blank query, is an envelope.
    pub async fn get_sold_listings_with(&self, query: &str, max_retries: u32) -> ResultEnvelope {
        let query = match Query::new(query) {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected search query");
                return ResultEnvelope::failure(e.to_string());
            }
        };

        let policy = RetryPolicy {
            max_retries,
            ..self.policy.clone()
        };

        tracing::info!(query = %query, max_retries = max_retries, "Searching sold listings");

        let outcome = with_retry(&policy, |attempt| self.attempt(&query, attempt)).await;

        match outcome {
            Ok(mut records) => {
                records.truncate(self.result_cap);
                tracing::info!(query = %query, total = records.len(), "Found sold listings");
                ResultEnvelope::success(records)
            }
            Err(e) if e.is_empty_result() => {
                tracing::info!(query = %query, "No sold listings found");
                ResultEnvelope::no_listings(query.as_str())
            }
            Err(e) => {
                tracing::error!(query = %query, error = %e, "Sold listings unavailable");
                ResultEnvelope::unavailable()
            }
        }
    }

    /// One fetch + extract attempt
    async fn attempt(
        &self,
        query: &Query,
        attempt: u32,
    ) -> std::result::Result<Vec<ListingRecord>, AttemptError> {
        let request = SearchRequest::new(query.clone());
        tracing::debug!(attempt = attempt, "Starting attempt");

        // Both stages run on their own task; a panic in either surfaces as a
        // JoinError and is treated like any other failed attempt
        let source = Arc::clone(&self.source);
        let body = tokio::spawn(async move { source.fetch(&request).await })
            .await
            .map_err(|e| AttemptError::Internal(e.to_string()))??;

        // Parsing is CPU-bound and the document type is !Send
        let extractor = Arc::clone(&self.extractor);
        let (records, report) =
            tokio::task::spawn_blocking(move || extractor.extract_with_report(&body))
                .await
                .map_err(|e| AttemptError::Internal(e.to_string()))?;

        tracing::debug!(
            attempt = attempt,
            tier = report.tier.unwrap_or("none"),
            candidates = report.candidates,
            accepted = report.accepted,
            "Extraction finished"
        );

        if records.is_empty() {
            return Err(AttemptError::NoListings);
        }

        Ok(records)
    }
}
