//! # khatawat-tenant
//!
//! Tower/Axum middleware for multi-tenant storefront request routing.
//!
//! One deployment serves many independent shops. This library decides, per
//! request, which shop a request belongs to and applies the decision as an
//! internal rewrite before any route logic runs:
//!
//! - **Custom domain**: `myshop.com` is a tenant in its own right
//! - **Subdomain**: `store1.khatawat.com` maps to tenant `store1`
//! - **Subpath**: `khatawat.com/store-name/cart` maps to tenant
//!   `store-name` with the path truncated to `/cart`
//! - **System routes** (`/_next`, `/api`, static assets, ...) are never
//!   tenant-scoped and pass through untouched
//!
//! When a tenant is derived, the request URI is rewritten in place: the
//! `domain` query parameter carries the identifier and the path is truncated
//! for subpath-routed requests. The client-visible URL never changes; this
//! is a rewrite, not a redirect. A [`StoreContext`] extension is inserted so
//! in-process handlers can read the identity without reparsing the query.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use khatawat_tenant::{extract_store_domain, TenantRoutingLayer};
//!
//! let app = Router::new()
//!     .route("/", get(|| async { "storefront" }))
//!     .layer(TenantRoutingLayer::new());
//! ```
//!
//! ## Custom main domain
//!
//! ```rust,ignore
//! use khatawat_tenant::{ResolverConfig, TenantRoutingLayer};
//!
//! let config = ResolverConfig::builder()
//!     .main_domain("example-shops.com")
//!     .build()?;
//!
//! let layer = TenantRoutingLayer::with_config(config);
//! ```

mod config;
mod error;
mod extract;
mod layer;
mod resolve;
mod service;

pub use config::{ResolverConfig, ResolverConfigBuilder, DEFAULT_MAIN_DOMAIN, MAIN_DOMAIN_ENV};
pub use error::ConfigError;
pub use extract::{domain_from_query, extract_store_domain, StoreContext};
pub use layer::TenantRoutingLayer;
pub use resolve::{resolve, Resolution, DOMAIN_PARAM, RESERVED_SEGMENTS};
pub use service::TenantRoutingService;
