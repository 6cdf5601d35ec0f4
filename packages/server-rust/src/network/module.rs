//! Network module with deferred startup lifecycle.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{
    get_resource_handler, health_handler, import_resource_handler, liveness_handler,
    readiness_handler, AppState,
};
use super::middleware::{buffer_body, build_http_layers, track_in_flight};
use super::shutdown::ShutdownController;
use crate::service::{DescriptionMessageService, MessageService};
use crate::storage::MemoryResourceStore;
use crate::traits::{EndpointDirectory, ResourceStorage};

const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Services the HTTP handlers dispatch to.
#[derive(Clone)]
pub struct ConnectorServices {
    pub descriptions: Arc<DescriptionMessageService>,
    pub storage: Arc<dyn ResourceStorage>,
    pub directory: Arc<dyn EndpointDirectory>,
}

impl ConnectorServices {
    /// Services backed by a single in-memory store acting as both resource
    /// storage and endpoint directory.
    #[must_use]
    pub fn in_memory(messages: MessageService, store: Arc<MemoryResourceStore>) -> Self {
        let storage: Arc<dyn ResourceStorage> = store.clone();
        Self {
            descriptions: Arc::new(DescriptionMessageService::new(messages, Arc::clone(&storage))),
            storage,
            directory: store,
        }
    }
}

/// Owns the HTTP server lifecycle.
pub struct NetworkModule {
    config: NetworkConfig,
    services: ConnectorServices,
    listener: Option<TcpListener>,
    shutdown: Arc<ShutdownController>,
    start_time: Instant,
}

impl NetworkModule {
    /// Creates the module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, services: ConnectorServices) -> Self {
        Self {
            config,
            services,
            listener: None,
            shutdown: Arc::new(ShutdownController::new()),
            start_time: Instant::now(),
        }
    }

    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the router.
    ///
    /// Routes:
    /// - `GET /health`, `/health/live`, `/health/ready`
    /// - `GET /api/resources/{id}` -- stored metadata or redirect
    /// - `POST /api/resources/import/{resourceId}` -- import a peer description
    pub fn build_router(&self) -> Router {
        let state = AppState {
            shutdown: Arc::clone(&self.shutdown),
            config: Arc::new(self.config.clone()),
            start_time: self.start_time,
            descriptions: Arc::clone(&self.services.descriptions),
            storage: Arc::clone(&self.services.storage),
            directory: Arc::clone(&self.services.directory),
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .route("/api/resources/{id}", get(get_resource_handler))
            .route(
                "/api/resources/import/{resource_id}",
                post(import_resource_handler),
            )
            .layer(axum::middleware::from_fn(buffer_body))
            .layer(axum::middleware::from_fn_with_state(
                Arc::clone(&self.shutdown),
                track_in_flight,
            ))
            .layer(build_http_layers(&self.config))
            .with_state(state)
    }

    /// Binds the listener and returns the bound port (OS-assigned when the
    /// configured port is 0).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let port = listener.local_addr()?.port();

        info!(host = %self.config.host, port, "TCP listener bound");

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight
    /// requests for up to 30 seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called or the server fails.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .context("start() must be called before serve()")?;
        let router = self.build_router();
        let controller = self.shutdown;

        controller.set_ready();
        info!("serving HTTP connections");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        controller.trigger_shutdown();
        if controller.wait_for_drain(DRAIN_TIMEOUT).await {
            info!("all requests drained");
        } else {
            warn!(
                in_flight = controller.in_flight_count(),
                "drain timeout expired"
            );
        }
        Ok(())
    }
}
