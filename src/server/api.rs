//! REST API handlers
//!
//! Thin routing layer over [`SoldListingsPipeline`](crate::crawler::SoldListingsPipeline):
//! validates input, maps envelopes to status codes, and serializes responses.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::models::{ListingRecord, ResultEnvelope};

use super::AppState;

/// Query used by the self-test endpoint
pub const SELF_TEST_QUERY: &str = "iPhone";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Body of `POST /api/sold-listings`
#[derive(Debug, Deserialize)]
pub struct SoldListingsRequest {
    pub query: Option<String>,
}

/// Service status document
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub route: String,
    pub description: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Self-test response
#[derive(Debug, Serialize)]
pub struct SelfTestResponse {
    pub test_query: String,
    pub success: bool,
    pub total_found: usize,
    pub average_price: f64,
    pub sample_item: Option<ListingRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_status))
        .route("/api/health", get(health_check))
        .route("/api/sold-listings", post(sold_listings))
        .route("/api/test", get(self_test))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn service_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "FlipFinder sold listings API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: vec![
            EndpointInfo {
                route: "POST /api/sold-listings".to_string(),
                description: "Get sold listings for price analysis".to_string(),
            },
            EndpointInfo {
                route: "GET /api/test".to_string(),
                description: format!("Run a live search for \"{SELF_TEST_QUERY}\""),
            },
            EndpointInfo {
                route: "GET /api/health".to_string(),
                description: "Readiness check".to_string(),
            },
        ],
    })
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn sold_listings(
    State(state): State<AppState>,
    body: Result<Json<SoldListingsRequest>, JsonRejection>,
) -> Response {
    let Some(raw) = body.ok().and_then(|Json(req)| req.query) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ResultEnvelope::failure("Missing query parameter")),
        )
            .into_response();
    };

    let query = raw.trim().to_string();
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ResultEnvelope::failure("Empty query provided")),
        )
            .into_response();
    }

    tracing::info!(query = %query, "Sold listings requested");

    match run_pipeline(&state, query).await {
        Ok(envelope) if envelope.success => (StatusCode::OK, Json(envelope)).into_response(),
        Ok(envelope) => (StatusCode::NOT_FOUND, Json(envelope)).into_response(),
        Err(status) => (status, Json(ResultEnvelope::failure("Server error"))).into_response(),
    }
}

async fn self_test(State(state): State<AppState>) -> Response {
    match run_pipeline(&state, SELF_TEST_QUERY.to_string()).await {
        Ok(envelope) => Json(SelfTestResponse {
            test_query: SELF_TEST_QUERY.to_string(),
            success: envelope.success,
            total_found: envelope.total,
            average_price: envelope.average_price,
            sample_item: envelope.items.into_iter().next(),
            error: envelope.error,
        })
        .into_response(),
        Err(status) => (
            status,
            Json(SelfTestResponse {
                test_query: SELF_TEST_QUERY.to_string(),
                success: false,
                total_found: 0,
                average_price: 0.0,
                sample_item: None,
                error: Some("Server error".to_string()),
            }),
        )
            .into_response(),
    }
}

/// Run the pipeline on its own task so a fault maps to 500 instead of a dropped connection
async fn run_pipeline(state: &AppState, query: String) -> Result<ResultEnvelope, StatusCode> {
    let pipeline = state.pipeline.clone();

    tokio::spawn(async move { pipeline.get_sold_listings(&query).await })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Sold listings task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
