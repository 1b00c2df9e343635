//! Health check endpoint.
//!
//! Reports the gateway's own liveness plus the reachability of the commerce
//! backend. Lives under `/api/health`, which the tenant resolver treats as
//! a system route, so it is identical for every host.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::UpstreamConfig;
use crate::proxy::ProxyClient;

/// Application state for health checks.
#[derive(Clone)]
pub struct HealthState {
    pub client: ProxyClient,
    pub upstream: UpstreamConfig,
    pub start_time: Instant,
    pub version: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_secs: u64,
    pub upstream: UpstreamHealth,
}

/// Overall health status.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Commerce backend health.
#[derive(Debug, Serialize)]
pub struct UpstreamHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health check routes.
pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .with_state(state)
}

/// Health check handler.
async fn health_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();
    let health_timeout = Duration::from_secs(5);

    let upstream = match timeout(health_timeout, state.client.health_check(&state.upstream)).await
    {
        Ok(Ok(latency)) => {
            info!(latency_ms = %latency.as_millis(), "Commerce backend healthy");
            UpstreamHealth {
                status: HealthStatus::Healthy,
                latency_ms: Some(latency.as_millis() as u64),
                error: None,
            }
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Commerce backend unhealthy");
            UpstreamHealth {
                status: HealthStatus::Unhealthy,
                latency_ms: None,
                error: Some(e),
            }
        }
        Err(_) => {
            warn!("Commerce backend health check timed out");
            UpstreamHealth {
                status: HealthStatus::Unhealthy,
                latency_ms: None,
                error: Some("Health check timed out".to_string()),
            }
        }
    };

    let overall_status = upstream.status;

    let response = HealthResponse {
        status: overall_status,
        version: state.version.clone(),
        uptime_secs: uptime,
        upstream,
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}
