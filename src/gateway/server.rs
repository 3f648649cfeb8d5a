//! Server initialization and lifecycle

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::gateway::routes::router;
use crate::resolve::cache::CacheLookup;
use crate::resolve::client::UpstreamClient;
use crate::resolve::dispatch::{Mode, Resolver, create_default_providers};

/// Build the resolver for the configured mode
pub fn build_resolver(config: &ServerConfig) -> anyhow::Result<Resolver> {
    match config.mode {
        Mode::Live => {
            let client = UpstreamClient::new(config.fetch_timeout())
                .context("Failed to create HTTP client")?;
            Ok(Resolver::live(create_default_providers(&client)))
        }
        Mode::Cached => {
            let store = config.store_path();
            if !store.exists() {
                // Lookups will answer 500 until the store is populated
                warn!("Download store {:?} does not exist yet", store);
            }
            Ok(Resolver::cached(CacheLookup::new(store)))
        }
    }
}

/// Bind and serve until Ctrl-C
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let resolver = Arc::new(build_resolver(&config)?);
    let addr = config.bind_addr();

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        "Server online at http://{} ({} mode)",
        listener.local_addr()?,
        config.mode.as_str()
    );

    axum::serve(listener, router(resolver))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
