//! Shared runtime state for ordr-gateway.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The gateway keeps no
//! mutable state of its own; the record store arbitrates concurrent writes.

use std::sync::Arc;

use ordr_store::RecordStore;

/// Static build metadata, logged at startup.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// External record store holding the `orders` collection.
    pub store: Arc<dyn RecordStore>,
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            build: BuildInfo {
                service: "ordr-gateway",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}
