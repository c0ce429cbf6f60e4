// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metric update logic for poll results

use crate::metrics::labels::{DeviceLabels, RouterLabels};
use crate::tracker::{EntityState, RouterStatus, Tracker, WanStats};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

use super::MetricsRegistry;

impl MetricsRegistry {
    /// Update WAN metrics after a poll that returned counters
    ///
    /// Byte counters advance by the deltas the tracker derived, so a router
    /// reboot never makes them go backwards.
    pub fn update_wan(&self, labels: &RouterLabels, stats: &WanStats) {
        self.wan_rx_bytes
            .get_or_create(labels)
            .inc_by(stats.last_rx_delta_bytes);
        self.wan_tx_bytes
            .get_or_create(labels)
            .inc_by(stats.last_tx_delta_bytes);
        if let Some(mbps) = stats.download_mbps {
            self.wan_download_mbps.get_or_create(labels).set(mbps);
        }
        if let Some(mbps) = stats.upload_mbps {
            self.wan_upload_mbps.get_or_create(labels).set(mbps);
        }
    }

    /// Update summary and per-entity metrics from the tracker state
    ///
    /// Only enabled entities with a known state are exported; labels of
    /// entities that were disabled or purged are removed.
    #[allow(clippy::cast_possible_wrap)]
    pub async fn update_presence(
        &self,
        labels: &RouterLabels,
        tracker: &Tracker,
        now: DateTime<Utc>,
    ) {
        let summary = tracker.summary(&labels.router, 0, now);
        self.router_connected
            .get_or_create(labels)
            .set(i64::from(summary.router_status == RouterStatus::Connected));
        self.devices_total
            .get_or_create(labels)
            .set(summary.total_devices as i64);
        self.devices_active
            .get_or_create(labels)
            .set(summary.active_devices as i64);
        self.devices_recently_seen
            .get_or_create(labels)
            .set(summary.recently_seen_devices as i64);
        self.devices_offline
            .get_or_create(labels)
            .set(summary.offline_devices as i64);

        let mut registered = 0_i64;
        let mut enabled = 0_i64;
        let mut current = HashSet::new();
        for entity in tracker.entities() {
            registered += 1;
            if !entity.enabled {
                continue;
            }
            enabled += 1;
            let Some(state) = entity.state else {
                continue;
            };
            let device_labels = DeviceLabels {
                router: labels.router.clone(),
                mac: entity.mac().to_string(),
                entity_id: entity.entity_id.clone(),
            };
            self.device_home
                .get_or_create(&device_labels)
                .set(i64::from(state == EntityState::Home));
            if let Some(seen) = entity.last_seen {
                self.device_last_seen_timestamp_seconds
                    .get_or_create(&device_labels)
                    .set(seen.timestamp());
            }
            current.insert(device_labels);
        }
        self.entities_registered.get_or_create(labels).set(registered);
        self.entities_enabled.get_or_create(labels).set(enabled);

        self.cleanup_stale_devices(current).await;
    }
}
