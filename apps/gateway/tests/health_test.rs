//! Integration tests for the health endpoint shape.
//!
//! These verify the /api/health contract without a live commerce backend.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

/// Create a test router without an upstream (for basic contract testing).
fn test_app_without_upstream() -> Router {
    use axum::routing::get;

    Router::new().route(
        "/api/health",
        get(|| async {
            let response = serde_json::json!({
                "status": "healthy",
                "version": "0.1.0",
                "uptime_secs": 0,
                "upstream": {
                    "status": "healthy",
                    "latency_ms": 3
                }
            });
            axum::Json(response)
        }),
    )
}

#[tokio::test]
async fn test_health_endpoint_returns_200() {
    let app = test_app_without_upstream();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint_returns_json() {
    let app = test_app_without_upstream();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("application/json"));
}

#[tokio::test]
async fn test_health_response_structure() {
    let app = test_app_without_upstream();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("uptime_secs").is_some());
    assert!(json.get("upstream").is_some());
}
