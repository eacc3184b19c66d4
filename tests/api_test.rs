//! Integration tests for the HTTP routing layer
//!
//! Drives the axum router directly with `tower::ServiceExt::oneshot`.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use flipfinder::crawler::fetcher::DocumentSource;
use flipfinder::crawler::{SearchRequest, SoldListingsPipeline};
use flipfinder::models::UNAVAILABLE_MESSAGE;
use flipfinder::server::{create_router, AppState};
use flipfinder::utils::error::FetchError;
use flipfinder::utils::retry::RetryPolicy;
use serde_json::Value;
use tower::ServiceExt;

enum Behavior {
    Page(String),
    Fail,
    Panic,
}

struct FixtureSource(Behavior);

#[async_trait]
impl DocumentSource for FixtureSource {
    async fn fetch(&self, request: &SearchRequest) -> Result<String, FetchError> {
        match &self.0 {
            Behavior::Page(body) => Ok(body.replace("{query}", request.query().as_str())),
            Behavior::Fail => Err(FetchError::Timeout),
            Behavior::Panic => panic!("fixture source exploded"),
        }
    }
}

fn router(behavior: Behavior) -> Router {
    let pipeline =
        SoldListingsPipeline::new(Arc::new(FixtureSource(behavior)), RetryPolicy::new(0));
    create_router(AppState::new(pipeline))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/sold-listings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_status_document() {
    let (status, json) = send(router(Behavior::Fail), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["status"].as_str().unwrap().contains("running"));
    assert_eq!(json["endpoints"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_health() {
    let (status, json) = send(router(Behavior::Fail), get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_success_returns_200_with_items() {
    let app = router(Behavior::Page(common::numbered_page(3)));
    let (status, json) = send(app, post_json(r#"{"query": "widget"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["total"], 3);
    assert_eq!(json["average_price"], 0.0);
    assert!(json["note"].is_string());
    assert!(json.get("error").is_none());

    let first = &json["items"][0];
    assert_eq!(first["title"], "Widget 1");
    assert_eq!(first["price"]["value"], 1.0);
    assert_eq!(first["price"]["currency"], "USD");
    assert_eq!(first["condition"], "Not specified");
    assert_eq!(first["itemWebUrl"], "https://ebay.com/itm/1");
    assert_eq!(first["soldDate"], "");
}

#[tokio::test]
async fn test_missing_query_is_400() {
    let (status, json) = send(router(Behavior::Fail), post_json(r#"{"q": "widget"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Missing query parameter");
    assert_eq!(json["items"], Value::Array(vec![]));
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn test_non_json_body_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/sold-listings")
        .body(Body::from("query=widget"))
        .unwrap();

    let (status, json) = send(router(Behavior::Fail), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing query parameter");
}

#[tokio::test]
async fn test_blank_query_is_400() {
    let (status, json) = send(router(Behavior::Fail), post_json(r#"{"query": "   "}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Empty query provided");
}

#[tokio::test]
async fn test_unavailable_is_404() {
    let (status, json) = send(router(Behavior::Fail), post_json(r#"{"query": "widget"}"#)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], UNAVAILABLE_MESSAGE);
    assert_eq!(json["total"], 0);
    assert_eq!(json["average_price"], 0.0);
}

#[tokio::test]
async fn test_no_listings_is_404() {
    let app = router(Behavior::Page(common::results_page(&[])));
    let (status, json) = send(app, post_json(r#"{"query": "unobtainium"}"#)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No sold listings found for \"unobtainium\"");
}

#[tokio::test]
async fn test_source_panic_contained_as_unavailable() {
    let (status, json) = send(router(Behavior::Panic), post_json(r#"{"query": "widget"}"#)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], UNAVAILABLE_MESSAGE);
}

#[tokio::test]
async fn test_self_test_uses_fixed_query() {
    let page = common::results_page(&[
        common::info_block("{query} 64GB", "$120.00", "https://ebay.com/itm/1"),
        common::info_block("{query} 128GB", "$150.00", "https://ebay.com/itm/2"),
    ]);
    let (status, json) = send(router(Behavior::Page(page)), get("/api/test")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["test_query"], "iPhone");
    assert_eq!(json["success"], true);
    assert_eq!(json["total_found"], 2);
    assert_eq!(json["sample_item"]["title"], "iPhone 64GB");
}
