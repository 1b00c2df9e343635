//! khatawat Storefront Gateway
//!
//! One deployment serves many shops. The gateway resolves the tenant for
//! every inbound request (custom domain, subdomain or subpath), rewrites the
//! request internally, and forwards storefront traffic to the commerce
//! backend scoped by the resolved identity.

mod config;
mod error;
mod logging;
mod middleware;
mod proxy;
mod routes;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use config::{CorsConfig, GatewayConfig};
use khatawat_tenant::ResolverConfig;
use proxy::{ProxyClient, ResponseCache};
use routes::health::{health_routes, HealthState};
use routes::metrics::{metrics_routes, MetricsState};
use routes::storefront::{storefront_routes, StorefrontState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

#[tokio::main]
async fn main() {
    // Load configuration (fail-fast on malformed files)
    let config = match GatewayConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        main_domain = %config.routing.main_domain,
        upstream = %config.upstream.url,
        "Starting storefront gateway"
    );

    let resolver_config = match ResolverConfig::new(&config.routing.main_domain) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid main domain '{}': {e}", config.routing.main_domain);
            std::process::exit(1);
        }
    };

    let client = match ProxyClient::with_timeout(Duration::from_secs(config.upstream.timeout_secs))
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to create proxy client: {e}");
            std::process::exit(1);
        }
    };
    let cache = ResponseCache::new(&config.cache);

    let metrics_state = match MetricsState::new() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to install metrics recorder: {e}");
            std::process::exit(1);
        }
    };

    let health_state = Arc::new(HealthState {
        client: client.clone(),
        upstream: config.upstream.clone(),
        start_time: Instant::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    let storefront_state = Arc::new(StorefrontState {
        client,
        cache,
        upstream: config.upstream.clone(),
    });

    // The tenant routing layer wraps the whole router so rewrites happen
    // before route matching; request-id layers sit outside it so resolver
    // logs already carry the id.
    let app = Router::new()
        .merge(health_routes(health_state))
        .merge(metrics_routes(Arc::new(metrics_state)))
        .merge(storefront_routes(storefront_state))
        .layer(tower_http::limit::RequestBodyLimitLayer::new(
            config.server.max_body_size_bytes,
        ))
        .layer(build_cors_layer(&config.cors))
        .layer(middleware::TenantRoutingLayer::with_config(resolver_config))
        .layer(middleware::propagate_request_id_layer())
        .layer(middleware::set_request_id_layer());

    let addr: SocketAddr = match config.bind_addr().parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!("Invalid bind address '{}': {e}", config.bind_addr());
            std::process::exit(1);
        }
    };

    info!(%addr, "Server listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Build CORS layer from configured origins.
///
/// When explicit origins are configured (non-wildcard), only the headers and
/// methods the storefront actually uses are allowed.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let is_wildcard = config.allowed_origins.len() == 1 && config.allowed_origins[0] == "*";

    let allow_origin = if is_wildcard {
        AllowOrigin::any()
    } else {
        let allowed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(allowed)
    };

    let mut layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .max_age(Duration::from_secs(config.max_age_secs));

    if is_wildcard {
        layer = layer.allow_methods(Any).allow_headers(Any);
    } else {
        layer = layer
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                axum::http::HeaderName::from_static("x-request-id"),
            ]);
    }

    layer
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                // Fall through - we still want to wait for terminate signal
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
