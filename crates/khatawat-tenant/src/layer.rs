//! Tower Layer implementation for tenant routing.
//!
//! Provides [`TenantRoutingLayer`] for adding tenant resolution to a
//! service stack. Apply it outermost, before routing, so rewrites happen
//! ahead of route matching.

use crate::config::ResolverConfig;
use crate::service::TenantRoutingService;
use std::sync::Arc;
use tower_layer::Layer;

/// Tower Layer that resolves the tenant for every request.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{routing::get, Router};
/// use khatawat_tenant::TenantRoutingLayer;
///
/// let app = Router::new()
///     .route("/", get(storefront_home))
///     .layer(TenantRoutingLayer::new());
/// ```
#[derive(Debug, Clone)]
pub struct TenantRoutingLayer {
    config: Arc<ResolverConfig>,
}

impl TenantRoutingLayer {
    /// Create a layer with the default configuration (main domain
    /// `khatawat.com`).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a layer with a custom configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use khatawat_tenant::{ResolverConfig, TenantRoutingLayer};
    ///
    /// let config = ResolverConfig::builder()
    ///     .main_domain("example-shops.com")
    ///     .build()
    ///     .unwrap();
    ///
    /// let layer = TenantRoutingLayer::with_config(config);
    /// assert_eq!(layer.config().main_domain(), "example-shops.com");
    /// ```
    #[must_use]
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl Default for TenantRoutingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for TenantRoutingLayer {
    type Service = TenantRoutingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TenantRoutingService::new(inner, Arc::clone(&self.config))
    }
}
