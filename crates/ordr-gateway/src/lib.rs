//! ordr-gateway library target.
//!
//! Exposes the router, layers and state for integration tests.
//! The binary `main.rs` depends on this library target.

pub mod api_types;
pub mod layers;
pub mod routes;
pub mod state;
