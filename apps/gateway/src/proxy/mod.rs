//! Proxy components for commerce backend communication.

pub mod cache;
pub mod client;

pub use cache::{CachedResponse, ResponseCache};
pub use client::ProxyClient;
