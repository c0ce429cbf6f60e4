// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Application state shared across HTTP handlers and the poll loop

use tokio::sync::RwLock;

use crate::config::Config;
use crate::metrics::{MetricsRegistry, RouterLabels};
use crate::router::ConnectionHealth;
use crate::tracker::Tracker;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub metrics: MetricsRegistry,
    pub tracker: RwLock<Tracker>,
    /// Connector health as of the last poll
    pub health: RwLock<ConnectionHealth>,
}

impl AppState {
    /// Builds the state with an empty tracker configured from `config`
    #[must_use]
    pub fn new(config: Config, metrics: MetricsRegistry) -> Self {
        let tracker = Tracker::new(config.consider_home_secs, &config.enabled_devices);
        Self {
            config,
            metrics,
            tracker: RwLock::new(tracker),
            health: RwLock::new(ConnectionHealth::default()),
        }
    }

    /// Labels identifying the polled router in metrics
    #[must_use]
    pub fn router_labels(&self) -> RouterLabels {
        RouterLabels {
            router: self.config.router.host.clone(),
        }
    }
}
