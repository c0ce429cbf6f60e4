// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Router-level summary sensor

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::wan::WanStats;

/// Reachability of the router as seen by the last poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterStatus {
    Connected,
    Disconnected,
}

/// Aggregate view published alongside the per-device entities
#[derive(Debug, Clone, Serialize)]
pub struct RouterSummary {
    pub router_status: RouterStatus,
    pub host: String,
    pub update_interval_seconds: u64,
    pub last_update: Option<DateTime<Utc>>,
    /// Devices currently in the ARP table
    pub active_devices: usize,
    /// Active plus those seen within the consider-home window
    pub recently_seen_devices: usize,
    pub offline_devices: usize,
    pub total_devices: usize,
    pub wan: WanStats,
}

impl RouterSummary {
    /// Main sensor value: devices considered connected
    #[must_use]
    pub fn connected_devices(&self) -> usize {
        self.recently_seen_devices
    }
}
