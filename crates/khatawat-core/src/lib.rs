//! khatawat Core Library
//!
//! Shared types for the khatawat multi-tenant storefront platform.
//!
//! # Modules
//!
//! - [`ids`] - The strongly typed tenant identifier ([`StoreDomain`])
//!
//! # Example
//!
//! ```
//! use khatawat_core::StoreDomain;
//!
//! let domain: StoreDomain = "store1".parse().unwrap();
//! assert_eq!(domain.as_str(), "store1");
//! ```

pub mod ids;

// Re-export main types for convenient access
pub use ids::{ParseDomainError, StoreDomain};
