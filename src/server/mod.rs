//! HTTP service exposing the sold-listing pipeline
//!
//! This module wires the pipeline into an axum router with optional CORS and
//! request tracing.

pub mod api;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::crawler::SoldListingsPipeline;

pub use api::create_router;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Pipeline shared by all handlers; it holds no per-call state
    pub pipeline: Arc<SoldListingsPipeline>,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(pipeline: SoldListingsPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            start_time: Instant::now(),
        }
    }
}

/// HTTP server for the sold-listing API
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ServerConfig, pipeline: SoldListingsPipeline) -> Self {
        Self {
            config,
            state: AppState::new(pipeline),
        }
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes and layers
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Serve until `shutdown_signal` resolves
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        tracing::info!(address = %addr, "Sold listings API listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Sold listings API stopped");
        Ok(())
    }
}

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind: {0}")]
    Bind(String),

    #[error("Server error: {0}")]
    Serve(String),
}
