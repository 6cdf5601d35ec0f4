//! Connector server entry point.

use std::sync::Arc;

use clap::Parser;
use connector_core::HeaderBuilder;
use connector_server::{
    Cli, ConnectorServices, MemoryResourceStore, MessageService, NetworkModule, StaticIdentity,
    StaticTokenProvider,
};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let (network, connector) = cli.into_configs();
    info!(
        connector = %connector.id,
        model_version = %connector.model_version,
        version = env!("CARGO_PKG_VERSION"),
        "starting connector"
    );
    if connector.security_token.is_empty() {
        warn!("no security token configured, outbound messages cannot be built");
    }

    let headers = HeaderBuilder::new(
        Arc::new(StaticIdentity::from(&connector)),
        Arc::new(StaticTokenProvider::new(connector.security_token.clone())),
    );
    let services = ConnectorServices::in_memory(
        MessageService::new(headers),
        Arc::new(MemoryResourceStore::new()),
    );

    let mut module = NetworkModule::new(network, services);
    let port = module.start().await?;
    info!(port, "connector listening");

    module.serve(shutdown_signal()).await
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("connector_server=info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
