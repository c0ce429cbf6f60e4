// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! # Merlin Tracker
//!
//! Device presence tracker for AsusWrt-Merlin routers.
//!
//! Polls the router over SSH for DHCP leases, the ARP table and WAN
//! counters, derives `home`/`away` per device and exposes the resulting
//! `device_tracker` entities over HTTP together with Prometheus metrics.
//!
//! ## Main modules
//! - `api`: HTTP API handlers
//! - `collector`: poll loop
//! - `config`: configuration management
//! - `error`: error types
//! - `metrics`: Prometheus registry
//! - `router`: SSH connector, commands and output parsers
//! - `tracker`: presence state and entity registry
//! - `prelude`: commonly used types and traits

mod api;
mod collector;
mod config;
mod error;
mod metrics;
mod router;
mod tracker;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::{AuthMethod, Config, RouterConfig};

/// Application error and result type
pub use error::{AppError, Result, RouterError};

/// HTTP API router and state
pub use api::{AppState, create_router};

/// Poll loop
pub use collector::{PING_INTERVAL, start_collection_loop};

/// Metrics registry and labels
pub use metrics::{DeviceLabels, MetricsRegistry, RouterLabels};

/// Router access and parsed data
pub use router::{
    ArpEntry, CommandRunner, ConnectionHealth, Connector, Device, DhcpLease, PollResult,
    RouterClient, WanCounters, parse,
};

/// Presence tracking
pub use tracker::{
    EntityAttributes, EntityState, LastSeenStore, PollChanges, RouterStatus, RouterSummary,
    StoredDevice, StoredDevices, Tracker, TrackerEntity, WanStats,
};
