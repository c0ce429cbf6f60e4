// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Presence and entity management
//!
//! Reconciles each poll's device list with the known devices, keeps
//! `last_seen` per MAC, derives `home`/`away` from the consider-home window
//! and maintains the `device_tracker.*` entity registry.
//!
//! Entities are created disabled (unless pre-enabled in configuration) and
//! only enabled entities have their published state refreshed.

mod entity;
mod store;
mod summary;
mod wan;

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};

use crate::router::{Device, PollResult};

pub use entity::{
    DEVICE_TRACKER_DOMAIN, EntityAttributes, EntityState, TrackerEntity, slugify,
};
pub use store::{LastSeenStore, StoredDevice, StoredDevices};
pub use summary::{RouterStatus, RouterSummary};
pub use wan::{WanStats, WanTracker};

/// Entities unseen for this long are removed from the registry
pub const PRUNE_AFTER_DAYS: i64 = 30;

/// Registry changes caused by one poll
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PollChanges {
    /// Entity ids registered during this poll
    pub added: Vec<String>,
    /// Entity ids purged during this poll
    pub removed: Vec<String>,
}

/// In-memory presence state and entity registry
#[derive(Debug)]
pub struct Tracker {
    consider_home: TimeDelta,
    prune_after: TimeDelta,
    preset_enabled: HashSet<String>,
    /// Registry keyed by MAC
    entities: BTreeMap<String, TrackerEntity>,
    last_seen: HashMap<String, DateTime<Utc>>,
    hostnames: HashMap<String, String>,
    devices: Vec<Device>,
    wan: WanTracker,
    last_update: Option<DateTime<Utc>>,
    last_poll_ok: bool,
}

impl Tracker {
    /// Creates a tracker; MACs in `enabled` start with enabled entities
    #[must_use]
    pub fn new(consider_home_secs: u64, enabled: &[String]) -> Self {
        Self {
            consider_home: i64::try_from(consider_home_secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .unwrap_or(TimeDelta::MAX),
            prune_after: TimeDelta::days(PRUNE_AFTER_DAYS),
            preset_enabled: enabled.iter().map(|m| m.to_uppercase()).collect(),
            entities: BTreeMap::new(),
            last_seen: HashMap::new(),
            hostnames: HashMap::new(),
            devices: Vec::new(),
            wan: WanTracker::default(),
            last_update: None,
            last_poll_ok: false,
        }
    }

    /// Seeds last-seen timestamps and hostnames from a previous run
    pub fn restore(&mut self, stored: StoredDevices) {
        let count = stored.len();
        for (mac, record) in stored {
            let mac = mac.to_uppercase();
            if let Some(host) = record.hostname.filter(|h| !h.trim().is_empty()) {
                self.hostnames.insert(mac.clone(), host);
            }
            self.last_seen.insert(mac, record.last_seen);
        }
        tracing::debug!("Restored last-seen data for {} devices", count);
    }

    /// Snapshot of last-seen data for persistence
    #[must_use]
    pub fn export(&self) -> StoredDevices {
        self.last_seen
            .iter()
            .map(|(mac, seen)| {
                (
                    mac.clone(),
                    StoredDevice {
                        last_seen: *seen,
                        hostname: self.hostnames.get(mac).cloned(),
                    },
                )
            })
            .collect()
    }

    /// Applies a successful poll taken at `now`
    pub fn apply_poll(&mut self, result: &PollResult, now: DateTime<Utc>) -> PollChanges {
        let mut changes = PollChanges::default();

        for device in &result.devices {
            if device.is_connected {
                self.last_seen.insert(device.mac.clone(), now);
            }
        }

        // Stale records go before registration so they are never re-added
        changes.removed = self.prune(now);

        // Only devices actually on the network (or remembered from before) become entities
        for device in &result.devices {
            if !self.last_seen.contains_key(&device.mac) {
                continue;
            }
            if !device.hostname.trim().is_empty() {
                self.hostnames
                    .insert(device.mac.clone(), device.hostname.clone());
            }
            if self.entities.contains_key(&device.mac) {
                continue;
            }
            let entity_id = self.register(&device.mac, &device.hostname);
            changes.added.push(entity_id);
        }
        if !changes.added.is_empty() {
            tracing::info!("Adding {} new device entities", changes.added.len());
        }

        if let Some(counters) = result.wan {
            self.wan.update(counters, now);
        }

        self.devices.clone_from(&result.devices);
        self.last_update = Some(now);
        self.last_poll_ok = true;

        self.refresh(now);
        changes
    }

    /// Records a failed poll; states keep ageing out
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.last_poll_ok = false;
        self.refresh(now);
    }

    /// Recomputes published state of enabled entities at `now`
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        let ips: HashMap<&str, Option<&String>> = self
            .devices
            .iter()
            .map(|d| (d.mac.as_str(), d.ip.as_ref()))
            .collect();

        for (mac, entity) in &mut self.entities {
            if !entity.enabled {
                continue;
            }
            let last_seen = self.last_seen.get(mac).copied();
            let state = EntityState::evaluate(last_seen, now, self.consider_home);
            if entity.state != Some(state) {
                tracing::debug!(
                    "{} {} -> {}",
                    entity.entity_id,
                    entity.state.map_or("unknown", EntityState::as_str),
                    state.as_str()
                );
            }
            entity.state = Some(state);
            entity.last_seen = last_seen;
            if let Some(host) = self.hostnames.get(mac) {
                entity.attributes.hostname.clone_from(host);
            }
            if let Some(ip) = ips.get(mac.as_str()) {
                entity.attributes.ip = ip.cloned();
            }
        }
    }

    /// Enables an entity; its state is refreshed on the next poll
    pub fn enable(&mut self, mac: &str) -> Option<&TrackerEntity> {
        let entity = self.entities.get_mut(&mac.to_uppercase())?;
        if !entity.enabled {
            tracing::info!("Enabled {}", entity.entity_id);
        }
        entity.enabled = true;
        Some(entity)
    }

    /// Disables an entity; it stays registered but is no longer refreshed
    pub fn disable(&mut self, mac: &str) -> Option<&TrackerEntity> {
        let entity = self.entities.get_mut(&mac.to_uppercase())?;
        if entity.enabled {
            tracing::info!("Disabled {}", entity.entity_id);
        }
        entity.enabled = false;
        Some(entity)
    }

    pub fn entity(&self, mac: &str) -> Option<&TrackerEntity> {
        self.entities.get(&mac.to_uppercase())
    }

    pub fn entities(&self) -> impl Iterator<Item = &TrackerEntity> {
        self.entities.values()
    }

    /// IPs of connected devices whose entities are enabled
    #[must_use]
    pub fn ping_targets(&self) -> Vec<String> {
        self.devices
            .iter()
            .filter(|d| d.is_connected)
            .filter(|d| self.entities.get(&d.mac).is_some_and(|e| e.enabled))
            .filter_map(|d| d.ip.clone())
            .collect()
    }

    #[must_use]
    pub fn wan_stats(&self) -> &WanStats {
        self.wan.stats()
    }

    #[must_use]
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Builds the router summary sensor at `now`
    #[must_use]
    pub fn summary(
        &self,
        host: &str,
        update_interval_secs: u64,
        now: DateTime<Utc>,
    ) -> RouterSummary {
        let active = self.devices.iter().filter(|d| d.is_connected).count();
        let recent = self
            .devices
            .iter()
            .filter(|d| {
                d.is_connected
                    || EntityState::evaluate(
                        self.last_seen.get(&d.mac).copied(),
                        now,
                        self.consider_home,
                    ) == EntityState::Home
            })
            .count();

        RouterSummary {
            router_status: if self.last_poll_ok {
                RouterStatus::Connected
            } else {
                RouterStatus::Disconnected
            },
            host: host.to_string(),
            update_interval_seconds: update_interval_secs,
            last_update: self.last_update,
            active_devices: active,
            recently_seen_devices: recent,
            offline_devices: self.devices.len() - recent,
            total_devices: self.devices.len(),
            wan: self.wan.stats().clone(),
        }
    }

    fn register(&mut self, mac: &str, hostname: &str) -> String {
        let entity_id = self.unique_entity_id(mac, hostname);
        let enabled = self.preset_enabled.contains(mac);
        tracing::debug!(
            "Registering {} for {} (enabled: {})",
            entity_id,
            mac,
            enabled
        );
        self.entities.insert(
            mac.to_string(),
            TrackerEntity::new(entity_id.clone(), mac, hostname, enabled),
        );
        entity_id
    }

    fn unique_entity_id(&self, mac: &str, hostname: &str) -> String {
        let mut object_id = slugify(hostname);
        if object_id.is_empty() {
            object_id = slugify(&crate::router::parse::fallback_hostname(mac));
        }
        let taken: HashSet<&str> = self
            .entities
            .values()
            .map(|e| e.entity_id.as_str())
            .collect();

        let base = format!("{DEVICE_TRACKER_DOMAIN}.{object_id}");
        if !taken.contains(base.as_str()) {
            return base;
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !taken.contains(candidate.as_str()))
            .unwrap_or(base)
    }

    /// Drops entities and last-seen entries older than the prune threshold
    fn prune(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let cutoff = now - self.prune_after;
        let stale: Vec<String> = self
            .entities
            .keys()
            .filter(|mac| self.last_seen.get(*mac).is_none_or(|seen| *seen < cutoff))
            .cloned()
            .collect();

        let mut removed = Vec::with_capacity(stale.len());
        for mac in &stale {
            if let Some(entity) = self.entities.remove(mac) {
                tracing::info!(
                    "Pruning stale device_tracker entity {} (MAC {}, last seen {:?})",
                    entity.entity_id,
                    mac,
                    self.last_seen.get(mac)
                );
                removed.push(entity.entity_id);
            }
            self.hostnames.remove(mac);
        }

        self.last_seen.retain(|_, seen| *seen >= cutoff);
        self.hostnames
            .retain(|mac, _| self.last_seen.contains_key(mac) || self.entities.contains_key(mac));
        removed
    }
}
