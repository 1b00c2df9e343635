//! Tower Service implementation for tenant routing.
//!
//! Wraps an inner service and applies the resolver's decision before the
//! request reaches it. The decision is synchronous, so the wrapper forwards
//! the inner service's future unchanged — no boxing, no extra allocation on
//! the pass-through path.

use crate::config::ResolverConfig;
use crate::extract::StoreContext;
use crate::resolve::{resolve, Resolution, DOMAIN_PARAM};
use http::uri::{PathAndQuery, Uri};
use http::Request;
use khatawat_core::StoreDomain;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower_service::Service;

/// Tower Service that resolves the tenant and rewrites the request.
///
/// For each request this service:
/// 1. Runs the resolver on the `Host` header and URI path
/// 2. On a rewrite decision, truncates the path (subpath scenario), sets the
///    `domain` query parameter and inserts a [`StoreContext`] extension
/// 3. Forwards to the inner service
///
/// Pass-through requests are forwarded untouched. The rewrite is internal:
/// the client-visible URL never changes and no redirect is issued.
#[derive(Debug, Clone)]
pub struct TenantRoutingService<S> {
    inner: S,
    config: Arc<ResolverConfig>,
}

impl<S> TenantRoutingService<S> {
    /// Create a new service wrapping `inner`.
    pub fn new(inner: S, config: Arc<ResolverConfig>) -> Self {
        Self { inner, config }
    }
}

impl<S, B> Service<Request<B>> for TenantRoutingService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let resolution = {
            let host = req
                .headers()
                .get(http::header::HOST)
                .and_then(|value| value.to_str().ok())
                .or_else(|| req.uri().host());
            resolve(host, req.uri().path(), &self.config)
        };

        if let Resolution::Rewrite { domain, path } = resolution {
            tracing::debug!(
                store = %domain,
                rewritten_path = path.as_deref().unwrap_or(req.uri().path()),
                "Tenant resolved"
            );
            apply_rewrite(&mut req, &domain, path.as_deref());
            req.extensions_mut().insert(StoreContext::new(domain));
        }

        self.inner.call(req)
    }
}

/// Rewrite the request URI in place: optionally replace the path, and set
/// the `domain` query parameter (replacing any stale value while keeping
/// every other parameter).
fn apply_rewrite<B>(req: &mut Request<B>, domain: &StoreDomain, new_path: Option<&str>) {
    let uri = req.uri();
    let path = new_path.unwrap_or_else(|| uri.path());
    let query = rewrite_query(uri.query(), domain);
    let path_and_query = format!("{path}?{query}");

    let mut parts = uri.clone().into_parts();
    match path_and_query.parse::<PathAndQuery>() {
        Ok(pq) => {
            parts.path_and_query = Some(pq);
            match Uri::from_parts(parts) {
                Ok(rewritten) => *req.uri_mut() = rewritten,
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to rebuild rewritten URI");
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "Rewritten path and query are not a valid URI");
        }
    }
}

/// Re-encode the query string with `domain` set to the resolved tenant.
fn rewrite_query(existing: Option<&str>, domain: &StoreDomain) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if let Some(query) = existing {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key != DOMAIN_PARAM {
                serializer.append_pair(&key, &value);
            }
        }
    }
    serializer.append_pair(DOMAIN_PARAM, domain.as_str());
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::Response;
    use std::convert::Infallible;
    use tower::ServiceExt;

    // Mock service echoing the routed URI and any store extension in the
    // response body as "<uri>|<store-or-none>".
    #[derive(Clone)]
    struct EchoService;

    impl Service<Request<Body>> for EchoService {
        type Response = Response<Body>;
        type Error = Infallible;
        type Future = std::future::Ready<Result<Response<Body>, Infallible>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Body>) -> Self::Future {
            let store = req
                .extensions()
                .get::<StoreContext>()
                .map_or_else(|| "none".to_string(), |ctx| ctx.domain().to_string());
            let body = format!("{}|{}", req.uri(), store);
            std::future::ready(Ok(Response::new(Body::from(body))))
        }
    }

    fn service() -> TenantRoutingService<EchoService> {
        TenantRoutingService::new(EchoService, Arc::new(ResolverConfig::default()))
    }

    async fn routed(host: &str, uri: &str) -> String {
        let req = Request::builder()
            .uri(uri)
            .header(http::header::HOST, host)
            .body(Body::empty())
            .unwrap();
        let response = service().oneshot(req).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_subpath_request_is_rewritten() {
        let echoed = routed("khatawat.com", "/acme/cart").await;
        assert_eq!(echoed, "/cart?domain=acme|acme");
    }

    #[tokio::test]
    async fn test_subdomain_keeps_path() {
        let echoed = routed("store1.khatawat.com", "/products/42").await;
        assert_eq!(echoed, "/products/42?domain=store1|store1");
    }

    #[tokio::test]
    async fn test_custom_domain_keeps_path() {
        let echoed = routed("myshop.com", "/").await;
        assert_eq!(echoed, "/?domain=myshop.com|myshop.com");
    }

    #[tokio::test]
    async fn test_system_route_passes_through_unchanged() {
        let echoed = routed("khatawat.com", "/api/orders").await;
        assert_eq!(echoed, "/api/orders|none");
    }

    #[tokio::test]
    async fn test_reserved_segment_passes_through_unchanged() {
        let echoed = routed("khatawat.com", "/admin/products").await;
        assert_eq!(echoed, "/admin/products|none");
    }

    #[tokio::test]
    async fn test_existing_query_parameters_preserved() {
        let echoed = routed("khatawat.com", "/acme/cart?page=2&sort=price").await;
        assert_eq!(echoed, "/cart?page=2&sort=price&domain=acme|acme");
    }

    #[tokio::test]
    async fn test_stale_domain_parameter_replaced() {
        let echoed = routed("store1.khatawat.com", "/cart?domain=stale").await;
        assert_eq!(echoed, "/cart?domain=store1|store1");
    }

    #[tokio::test]
    async fn test_rewritten_request_on_system_route_still_short_circuits() {
        // Re-resolution of an already-rewritten request: the system-route
        // check fires before any tenant logic, so the request is untouched.
        let echoed = routed("khatawat.com", "/api/orders?domain=acme").await;
        assert_eq!(echoed, "/api/orders?domain=acme|none");
    }

    #[tokio::test]
    async fn test_missing_host_passes_through() {
        let req = Request::builder()
            .uri("/acme/cart")
            .body(Body::empty())
            .unwrap();
        let response = service().oneshot(req).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"/acme/cart|none");
    }

    #[test]
    fn test_rewrite_query_round_trip() {
        let domain = StoreDomain::new("acme").unwrap();
        assert_eq!(rewrite_query(None, &domain), "domain=acme");
        assert_eq!(
            rewrite_query(Some("a=1&domain=old&b=2"), &domain),
            "a=1&b=2&domain=acme"
        );
    }
}
