//! Short-TTL cache for storefront GET responses.
//!
//! Store details, products and banners change rarely compared to how often
//! they are read, so successful GET responses are kept for a short window
//! (60 s by default) keyed by path and tenant. Entries expire on TTL; there
//! is no background revalidation.

use bytes::Bytes;
use khatawat_core::StoreDomain;
use moka::future::Cache;
use std::time::Duration;

use crate::config::CacheConfig;

/// A cached upstream response.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Concurrent response cache keyed by `(path+query, tenant)`.
///
/// A disabled cache is a no-op: lookups miss and inserts are dropped.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Option<Cache<String, CachedResponse>>,
}

impl ResponseCache {
    /// Build a cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let inner = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();
        Self { inner: Some(inner) }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Look up a response for the given path and tenant.
    pub async fn get(&self, path: &str, domain: Option<&StoreDomain>) -> Option<CachedResponse> {
        let inner = self.inner.as_ref()?;
        inner.get(&Self::key(path, domain)).await
    }

    /// Store a response for the given path and tenant.
    pub async fn insert(&self, path: &str, domain: Option<&StoreDomain>, response: CachedResponse) {
        if let Some(inner) = &self.inner {
            inner.insert(Self::key(path, domain), response).await;
        }
    }

    // Same key shape for present and absent tenants; absent maps to the
    // empty tenant slot.
    fn key(path: &str, domain: Option<&StoreDomain>) -> String {
        format!("{}|{}", path, domain.map_or("", StoreDomain::as_str))
    }
}
