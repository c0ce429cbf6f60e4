// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Cleanup of per-device label sets

use crate::metrics::labels::DeviceLabels;
use std::collections::HashSet;

use super::MetricsRegistry;

impl MetricsRegistry {
    /// Remove device labels that are no longer exported
    ///
    /// Keeps the registry from growing without bound as entities are
    /// disabled, renamed or purged.
    pub(crate) async fn cleanup_stale_devices(&self, current: HashSet<DeviceLabels>) {
        let mut prev = self.prev_devices.lock().await;
        let mut removed = 0;
        for stale in prev.difference(&current) {
            self.device_home.remove(stale);
            self.device_last_seen_timestamp_seconds.remove(stale);
            removed += 1;
        }
        if removed > 0 {
            tracing::debug!("Cleaned up {} stale device label sets", removed);
        }
        *prev = current;
    }
}
