// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use std::net::SocketAddr;
use std::sync::Arc;

use merlin_tracker::{
    AppState, Config, LastSeenStore, MetricsRegistry, Result, create_router, start_collection_loop,
};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env early so RUST_LOG from it applies
    dotenvy::dotenv().ok();

    setup_tracing();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;

    tracing::info!(
        "Tracking devices on {} as '{}' (consider_home {}s, poll every {}s)",
        config.router.address(),
        config.router.username,
        config.consider_home_secs,
        config.poll_interval_secs
    );
    if !config.enabled_devices.is_empty() {
        tracing::info!(
            "Pre-enabled devices: {}",
            config.enabled_devices.join(", ")
        );
    }

    let store = config.state_file.clone().map(LastSeenStore::new);

    let state = Arc::new(AppState::new(config.clone(), MetricsRegistry::new()));
    if let Some(store) = &store {
        let stored = store.load().await;
        tracing::info!(
            "Loaded last-seen data for {} devices from {}",
            stored.len(),
            store.path().display()
        );
        state.tracker.write().await.restore(stored);
    }

    // Graceful shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let poll_handle = start_collection_loop(shutdown_rx.clone(), state.clone(), store);

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr.parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address: {}", e);
        e
    })?;

    tracing::info!("Merlin tracker starting on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET  /health                - Health check");
    tracing::info!("  - GET  /metrics               - Prometheus metrics");
    tracing::info!("  - GET  /devices               - Device tracker entities");
    tracing::info!("  - POST /devices/{{mac}}/enable  - Enable an entity");
    tracing::info!("  - POST /devices/{{mac}}/disable - Disable an entity");
    tracing::info!("  - GET  /router                - Router summary");

    let mut server_shutdown = shutdown_rx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.changed().await;
            tracing::info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    // Let the poll loop close the SSH session
    let _ = shutdown_tx.send(true);
    let _ = poll_handle.await;

    Ok(())
}

fn setup_tracing() {
    // RUST_LOG wins; "info" otherwise
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
