// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Poll loop for the router
//!
//! Runs one sequential poll per tick over a single reused SSH session and
//! feeds the tracker, the metrics registry and the last-seen store.

mod poll;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::api::AppState;
use crate::router::{Connector, RouterClient};
use crate::tracker::LastSeenStore;

/// Minimum time between keep-alive ping batches
pub const PING_INTERVAL: Duration = Duration::from_secs(300);

/// Starts the background poll loop
///
/// Polls never overlap: a slow poll delays the next tick instead of
/// queueing another one. The SSH session is closed when `shutdown_rx`
/// flips to `true`.
pub fn start_collection_loop(
    mut shutdown_rx: watch::Receiver<bool>,
    state: Arc<AppState>,
    store: Option<LastSeenStore>,
) -> JoinHandle<()> {
    let interval = state.config.poll_interval_secs;
    tracing::info!(
        "Starting poll loop for {} every {}s",
        state.config.router.address(),
        interval
    );

    let labels = state.router_labels();
    state.metrics.initialize_router_metrics(&labels);

    tokio::spawn(async move {
        let mut client = RouterClient::new(Connector::new(state.config.router.clone()));
        let mut ticker = tokio::time::interval(Duration::from_secs(interval));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_ping: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {},
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Stopping poll loop");
                        break;
                    }
                }
            }

            let now = chrono::Utc::now();
            let ok = poll::poll_once(&mut client, &state, store.as_ref(), now).await;

            if ok
                && last_ping.is_none_or(|at| at.elapsed() >= PING_INTERVAL)
                && poll::ping_enabled_devices(&mut client, &state).await
            {
                last_ping = Some(Instant::now());
            }

            let health = client.runner().health();
            state
                .metrics
                .update_connection_errors(&labels, health.consecutive_errors);
            *state.health.write().await = health;
        }

        client.runner_mut().close().await;
    })
}
