//! HTTP client for the commerce backend with connection pooling.
//!
//! Every storefront call carries the tenant scope: the `X-Store-Domain`
//! header names the shop the request belongs to (empty when the request has
//! no tenant context — the backend then serves its default configuration),
//! and `X-Store-API-Key` authenticates the storefront deployment.

use bytes::Bytes;
use khatawat_core::StoreDomain;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::error::{GatewayError, GatewayResult};

/// Header naming the tenant on every upstream storefront call.
pub const X_STORE_DOMAIN: &str = "X-Store-Domain";

/// Header carrying the storefront API key.
pub const X_STORE_API_KEY: &str = "X-Store-API-Key";

/// HTTP client for proxying storefront requests to the commerce backend.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
}

impl ProxyClient {
    /// Create a new proxy client with default settings.
    pub fn new() -> GatewayResult<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new proxy client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| GatewayError::Internal(e.into()))?;

        Ok(Self { client })
    }

    /// Build the header set for a storefront call.
    ///
    /// `X-Store-Domain` is always present so the backend can resolve the
    /// tenant; an absent tenant is sent as an empty value, which the backend
    /// treats as "default store", not as an error.
    pub fn storefront_headers(domain: Option<&StoreDomain>, api_key: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let domain_value = domain
            .and_then(|d| HeaderValue::from_str(d.as_str()).ok())
            .unwrap_or_else(|| HeaderValue::from_static(""));
        headers.insert(X_STORE_DOMAIN, domain_value);

        if let Some(key) = api_key {
            if let Ok(value) = HeaderValue::from_str(key) {
                headers.insert(X_STORE_API_KEY, value);
            }
        }

        headers
    }

    /// Send a GET request to the commerce backend.
    pub async fn get(&self, url: &str, headers: HeaderMap) -> GatewayResult<Response> {
        self.client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(map_reqwest_error)
    }

    /// Send a POST request with body to the commerce backend.
    pub async fn post(&self, url: &str, body: Bytes, headers: HeaderMap) -> GatewayResult<Response> {
        self.client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)
    }

    /// Perform a health check on the commerce backend.
    pub async fn health_check(&self, upstream: &UpstreamConfig) -> Result<Duration, String> {
        let url = format!(
            "{}{}",
            upstream.url.trim_end_matches('/'),
            upstream.health_path
        );
        let start = std::time::Instant::now();

        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => Ok(start.elapsed()),
            Ok(response) => Err(format!(
                "Health check returned status {}",
                response.status()
            )),
            Err(e) => Err(format!("Health check failed: {e}")),
        }
    }
}

/// Map reqwest errors to gateway errors.
fn map_reqwest_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::GatewayTimeout
    } else if error.is_connect() {
        GatewayError::ServiceUnavailable
    } else {
        GatewayError::Internal(error.into())
    }
}
