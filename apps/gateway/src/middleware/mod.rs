//! Gateway middleware components.
//!
//! Tenant routing itself lives in the `khatawat-tenant` crate and is
//! re-exported here for wiring convenience.

pub mod request_id;

pub use khatawat_tenant::TenantRoutingLayer;
pub use request_id::{propagate_request_id_layer, set_request_id_layer};
