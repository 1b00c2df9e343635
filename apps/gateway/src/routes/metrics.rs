//! Prometheus metrics endpoint.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;

/// State for metrics routes.
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

impl MetricsState {
    /// Create a new metrics state with Prometheus exporter.
    pub fn new() -> anyhow::Result<Self> {
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {e}"))?;

        Ok(Self { handle })
    }
}

/// Create metrics routes.
pub fn metrics_routes(state: Arc<MetricsState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Metrics handler - returns Prometheus format.
async fn metrics_handler(State(state): State<Arc<MetricsState>>) -> impl IntoResponse {
    let output = state.handle.render();

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )
        .body(Body::from(output))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Record a storefront request, labeled by route, status and tenant.
pub fn record_request(route: &str, status: u16, tenant: Option<&str>, duration: Duration) {
    use metrics::{describe_counter, describe_histogram, histogram, increment_counter};

    let tenant_str = tenant.unwrap_or("none");
    let labels = [
        ("route", route.to_string()),
        ("status", status.to_string()),
        ("tenant", tenant_str.to_string()),
    ];

    describe_counter!(
        "gateway_requests_total",
        "Total number of storefront requests processed"
    );
    increment_counter!("gateway_requests_total", &labels);

    describe_histogram!(
        "gateway_request_duration_seconds",
        "Request duration in seconds"
    );
    histogram!(
        "gateway_request_duration_seconds",
        duration.as_secs_f64(),
        &[("route", route.to_string())]
    );
}

/// Record a cache hit for a storefront GET.
pub fn record_cache_hit(route: &str) {
    use metrics::{describe_counter, increment_counter};

    let labels = [("route", route.to_string())];

    describe_counter!(
        "gateway_cache_hits_total",
        "Total number of storefront cache hits"
    );
    increment_counter!("gateway_cache_hits_total", &labels);
}

/// Record a commerce backend error.
pub fn record_upstream_error(error_type: &str) {
    use metrics::{describe_counter, increment_counter};

    let labels = [("error_type", error_type.to_string())];

    describe_counter!(
        "gateway_upstream_errors_total",
        "Total number of commerce backend errors"
    );
    increment_counter!("gateway_upstream_errors_total", &labels);
}

/// Record commerce backend latency.
pub fn record_upstream_latency(duration: Duration) {
    use metrics::{describe_histogram, histogram};

    describe_histogram!(
        "gateway_upstream_latency_seconds",
        "Commerce backend request latency in seconds"
    );
    histogram!(
        "gateway_upstream_latency_seconds",
        duration.as_secs_f64()
    );
}
