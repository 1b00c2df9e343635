//! Reading the tenant identity back out of a request.
//!
//! Handlers running behind [`crate::TenantRoutingLayer`] read the
//! [`StoreContext`] request extension. Consumers that only see the rewritten
//! URI (separate processes, client-side code) read the `domain` query
//! parameter instead; both views carry the same value.

use crate::resolve::DOMAIN_PARAM;
use http::Request;
use khatawat_core::StoreDomain;

/// Request extension carrying the resolved tenant identity.
///
/// Inserted by the routing service whenever a tenant is derived. Absent on
/// pass-through requests — "no tenant" is a valid state, not an error, and
/// downstream code must fall back to its default configuration.
///
/// # Example
///
/// ```rust,ignore
/// use axum::Extension;
/// use khatawat_tenant::StoreContext;
///
/// async fn handler(ctx: Option<Extension<StoreContext>>) -> String {
///     match ctx {
///         Some(Extension(ctx)) => format!("store: {}", ctx.domain()),
///         None => "default storefront".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreContext {
    domain: StoreDomain,
}

impl StoreContext {
    /// Create a new context for the given tenant.
    #[must_use]
    pub fn new(domain: StoreDomain) -> Self {
        Self { domain }
    }

    /// The resolved tenant identifier.
    #[must_use]
    pub fn domain(&self) -> &StoreDomain {
        &self.domain
    }
}

impl From<StoreDomain> for StoreContext {
    fn from(domain: StoreDomain) -> Self {
        Self::new(domain)
    }
}

impl From<StoreContext> for StoreDomain {
    fn from(ctx: StoreContext) -> Self {
        ctx.domain
    }
}

/// Extract the tenant identity from a request.
///
/// Checks the [`StoreContext`] extension first, then falls back to the
/// `domain` query parameter. Returns `None` when the request carries no
/// tenant context.
#[must_use]
pub fn extract_store_domain<B>(req: &Request<B>) -> Option<StoreDomain> {
    if let Some(ctx) = req.extensions().get::<StoreContext>() {
        return Some(ctx.domain().clone());
    }
    domain_from_query(req.uri().query())
}

/// Read the `domain` parameter out of a raw query string.
///
/// The first occurrence wins; an empty value counts as absent.
#[must_use]
pub fn domain_from_query(query: Option<&str>) -> Option<StoreDomain> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == DOMAIN_PARAM)
        .and_then(|(_, value)| StoreDomain::new(value.into_owned()).ok())
}
