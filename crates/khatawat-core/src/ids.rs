//! Strongly Typed Identifiers
//!
//! The tenant identifier for the storefront platform. Using the newtype
//! pattern prevents a raw hostname or path segment from being passed where a
//! resolved tenant identity is expected.
//!
//! # Example
//!
//! ```
//! use khatawat_core::StoreDomain;
//!
//! let custom: StoreDomain = "myshop.com".parse().unwrap();
//! let slug: StoreDomain = "store1".parse().unwrap();
//!
//! fn requires_store(domain: &StoreDomain) -> &str {
//!     domain.as_str()
//! }
//!
//! assert_eq!(requires_store(&custom), "myshop.com");
//! assert_eq!(requires_store(&slug), "store1");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Error type for identifier parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDomainError {
    /// The identifier was empty or whitespace-only. An absent tenant is
    /// modeled as `Option::None`, never as an empty identifier.
    #[error("store domain must not be empty")]
    Empty,
}

/// Strongly typed tenant identifier.
///
/// A `StoreDomain` uniquely names one shop instance. It is derived fresh per
/// request from one of three sources: a full custom hostname
/// (`myshop.com`), a subdomain label under the main domain (`store1`), or
/// the first path segment on the main domain (`store-name`).
///
/// The value is guaranteed non-empty; surrounding whitespace is trimmed at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreDomain(String);

impl StoreDomain {
    /// Creates a `StoreDomain` from a raw string value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseDomainError::Empty`] if the value is empty after
    /// trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ParseDomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ParseDomainError::Empty);
        }
        if trimmed.len() == value.len() {
            Ok(Self(value))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for StoreDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StoreDomain {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for StoreDomain {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let domain = StoreDomain::new("store1").unwrap();
        assert_eq!(domain.as_str(), "store1");
    }

    #[test]
    fn test_new_trims_whitespace() {
        let domain = StoreDomain::new("  myshop.com  ").unwrap();
        assert_eq!(domain.as_str(), "myshop.com");
    }

    #[test]
    fn test_new_empty_rejected() {
        assert_eq!(StoreDomain::new(""), Err(ParseDomainError::Empty));
        assert_eq!(StoreDomain::new("   "), Err(ParseDomainError::Empty));
    }

    #[test]
    fn test_from_str() {
        let domain: StoreDomain = "store1.example".parse().unwrap();
        assert_eq!(domain.to_string(), "store1.example");
    }

    #[test]
    fn test_serde_transparent() {
        let domain = StoreDomain::new("acme").unwrap();
        let json = serde_json::to_string(&domain).unwrap();
        assert_eq!(json, "\"acme\"");

        let back: StoreDomain = serde_json::from_str(&json).unwrap();
        assert_eq!(back, domain);
    }

    #[test]
    fn test_into_inner() {
        let domain = StoreDomain::new("acme").unwrap();
        assert_eq!(domain.into_inner(), "acme");
    }
}
