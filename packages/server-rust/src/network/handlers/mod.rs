//! HTTP handler definitions for the connector server.
//!
//! Defines `AppState` (the shared state carried through axum extractors) and
//! re-exports all handler functions for building the router.

pub mod health;
pub mod resources;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use resources::{get_resource_handler, import_resource_handler};

use std::sync::Arc;
use std::time::Instant;

use super::{NetworkConfig, ShutdownController};
use crate::service::DescriptionMessageService;
use crate::traits::{EndpointDirectory, ResourceStorage};

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub shutdown: Arc<ShutdownController>,
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
    pub descriptions: Arc<DescriptionMessageService>,
    pub storage: Arc<dyn ResourceStorage>,
    pub directory: Arc<dyn EndpointDirectory>,
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use crate::network::ConnectorServices;
    use crate::service::test_support::header_builder;
    use crate::service::MessageService;
    use crate::storage::MemoryResourceStore;

    let services = ConnectorServices::in_memory(
        MessageService::new(header_builder("token")),
        Arc::new(MemoryResourceStore::new()),
    );
    AppState {
        shutdown: Arc::new(ShutdownController::new()),
        config: Arc::new(NetworkConfig::default()),
        start_time: Instant::now(),
        descriptions: services.descriptions,
        storage: services.storage,
        directory: services.directory,
    }
}
