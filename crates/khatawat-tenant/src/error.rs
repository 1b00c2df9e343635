//! Error types for the tenant routing middleware.
//!
//! Resolution itself has no failure states: every request either matches a
//! scenario or passes through. The only errors this crate can produce are
//! configuration errors, raised once at startup.

use thiserror::Error;

/// Errors raised while building a [`crate::ResolverConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The main domain was empty or whitespace-only.
    #[error("main domain must not be empty")]
    EmptyMainDomain,

    /// The main domain carried a leading or trailing dot, which would break
    /// suffix-based subdomain classification.
    #[error("main domain must not start or end with a dot: {0:?}")]
    DottedMainDomain(String),
}
