//! HTTP fetcher for marketplace search-result pages
//!
//! Issues exactly one GET per call with browser identity headers and a fixed
//! timeout, then decodes the body as UTF-8 (lossily if needed). Retry,
//! backoff and pacing belong to the pipeline, not here.

use async_trait::async_trait;
use encoding_rs::UTF_8;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::FetcherConfig;
use crate::crawler::debug::{DebugSink, NoopDebugSink};
use crate::crawler::headers::build_browser_headers;
use crate::crawler::url::SearchRequest;
use crate::utils::error::FetchError;

/// Source of raw search-result documents
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the decoded document for one search request
    async fn fetch(&self, request: &SearchRequest) -> Result<String, FetchError>;
}

/// Fetches search pages over HTTP
pub struct HttpFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// User agent sent with every request
    user_agent: String,

    /// Optional origin override for testing with mock servers
    base_url: Option<String>,

    /// Where raw documents go after a successful fetch
    debug_sink: Arc<dyn DebugSink>,
}

impl HttpFetcher {
    /// Create a fetcher from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::ClientBuild` if the HTTP client cannot be created
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        if config.accept_invalid_certs {
            tracing::warn!(
                "TLS certificate verification is disabled for marketplace requests \
                 (fetcher.accept_invalid_certs = true)"
            );
        }

        // No idle connections are kept, so concurrent calls never share one
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            base_url: config.base_url.clone(),
            debug_sink: Arc::new(NoopDebugSink),
        })
    }

    /// Attach a sink receiving every fetched document
    #[must_use]
    pub fn with_debug_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        self.debug_sink = sink;
        self
    }

    /// The URL this fetcher would request for `request`
    pub fn url_for(&self, request: &SearchRequest) -> String {
        match &self.base_url {
            Some(base) => request.clone().with_origin(base).url(),
            None => request.url(),
        }
    }
}

#[async_trait]
impl DocumentSource for HttpFetcher {
    async fn fetch(&self, request: &SearchRequest) -> Result<String, FetchError> {
        let url = self.url_for(request);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        tracing::debug!(url = %parsed, "Fetching search page");

        let response = self
            .client
            .get(parsed)
            .headers(build_browser_headers(&self.user_agent))
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(FetchError::from_transport)?;
        let body = decode_body(&bytes);

        tracing::debug!(chars = body.len(), "Fetched search page");

        self.debug_sink.record(request, &body).await;

        Ok(body)
    }
}

/// Decode a response body as UTF-8, replacing undecodable bytes
pub fn decode_body(bytes: &[u8]) -> String {
    let (cow, _encoding, had_errors) = UTF_8.decode(bytes);

    if had_errors {
        tracing::debug!("Response body contained invalid UTF-8; decoded lossily");
    }

    cow.into_owned()
}
