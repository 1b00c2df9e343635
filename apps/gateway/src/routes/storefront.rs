//! Storefront passthrough routes.
//!
//! Everything that is not a gateway-owned route is storefront traffic: the
//! tenant resolver has already run, so the request path is the shop-local
//! path and the tenant identity (when present) is readable from the request.
//! The handler forwards the call to the commerce backend with the
//! `X-Store-Domain` scope header and relays the backend's response.
//!
//! The internal `domain` query parameter is a routing marker, not part of
//! the backend contract, and is stripped from the upstream URL.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use khatawat_tenant::{extract_store_domain, DOMAIN_PARAM};
use std::sync::Arc;
use std::time::Instant;

use crate::config::UpstreamConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::proxy::{CachedResponse, ProxyClient, ResponseCache};
use crate::routes::metrics;

/// Shared state for storefront forwarding.
#[derive(Clone)]
pub struct StorefrontState {
    pub client: ProxyClient,
    pub cache: ResponseCache,
    pub upstream: UpstreamConfig,
}

/// Create the storefront passthrough router (a fallback, so it catches
/// every path the gateway does not own).
pub fn storefront_routes(state: Arc<StorefrontState>) -> Router {
    Router::new().fallback(forward_to_backend).with_state(state)
}

/// Forward one storefront request to the commerce backend.
async fn forward_to_backend(
    State(state): State<Arc<StorefrontState>>,
    req: Request,
) -> Result<Response, GatewayError> {
    let start = Instant::now();
    let domain = extract_store_domain(&req);
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = upstream_query(req.uri().query());
    let url = build_upstream_url(&state.upstream.url, &path, query.as_deref());
    let headers =
        ProxyClient::storefront_headers(domain.as_ref(), state.upstream.api_key.as_deref());

    let cached = if method == Method::GET {
        if let Some(hit) = state.cache.get(&path, domain.as_ref()).await {
            metrics::record_cache_hit(&path);
            metrics::record_request(&path, hit.status, domain_label(&domain), start.elapsed());
            return Ok(into_http_response(hit));
        }

        let upstream_start = Instant::now();
        let response = state.client.get(&url, headers).await.map_err(|e| {
            metrics::record_upstream_error(e.error_code());
            e
        })?;
        metrics::record_upstream_latency(upstream_start.elapsed());

        let cached = read_response(response).await?;
        if StatusCode::from_u16(cached.status)
            .map(|s| s.is_success())
            .unwrap_or(false)
        {
            state
                .cache
                .insert(&path, domain.as_ref(), cached.clone())
                .await;
        }
        cached
    } else if method == Method::POST {
        let body = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .map_err(|e| GatewayError::BadRequest {
                message: format!("Failed to read request body: {e}"),
            })?;

        let upstream_start = Instant::now();
        let response = state.client.post(&url, body, headers).await.map_err(|e| {
            metrics::record_upstream_error(e.error_code());
            e
        })?;
        metrics::record_upstream_latency(upstream_start.elapsed());

        read_response(response).await?
    } else {
        return Err(GatewayError::UnsupportedMethod {
            method: method.to_string(),
        });
    };

    metrics::record_request(&path, cached.status, domain_label(&domain), start.elapsed());
    Ok(into_http_response(cached))
}

fn domain_label(domain: &Option<khatawat_core::StoreDomain>) -> Option<&str> {
    domain.as_ref().map(khatawat_core::StoreDomain::as_str)
}

/// Drain an upstream response into a relayable form.
async fn read_response(response: reqwest::Response) -> GatewayResult<CachedResponse> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = response
        .bytes()
        .await
        .map_err(|e| GatewayError::Internal(e.into()))?;

    Ok(CachedResponse {
        status,
        content_type,
        body,
    })
}

/// Build the client-facing response from a (possibly cached) upstream one.
fn into_http_response(cached: CachedResponse) -> Response {
    let status = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);
    if let Some(content_type) = &cached.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type.as_str());
    }
    builder
        .body(Body::from(cached.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// The query string forwarded upstream: everything except the internal
/// `domain` marker. `None` when nothing remains.
fn upstream_query(query: Option<&str>) -> Option<String> {
    let query = query?;
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key != DOMAIN_PARAM {
            serializer.append_pair(&key, &value);
            any = true;
        }
    }
    if any {
        Some(serializer.finish())
    } else {
        None
    }
}

/// Join the upstream base URL with the shop-local path and query.
fn build_upstream_url(base: &str, path: &str, query: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match query {
        Some(query) => format!("{base}{path}?{query}"),
        None => format!("{base}{path}"),
    }
}
