// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Registry initialization and metric registration

use crate::metrics::labels::{DeviceLabels, RouterLabels};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{FloatGauge, MetricsRegistry};

impl MetricsRegistry {
    #[allow(clippy::similar_names)] // rx/tx naming pattern is intentional
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let wan_rx_bytes = Family::<RouterLabels, Counter>::default();
        registry.register(
            "merlin_wan_rx_bytes",
            "Bytes received on the WAN interface",
            wan_rx_bytes.clone(),
        );
        let wan_tx_bytes = Family::<RouterLabels, Counter>::default();
        registry.register(
            "merlin_wan_tx_bytes",
            "Bytes transmitted on the WAN interface",
            wan_tx_bytes.clone(),
        );
        let wan_download_mbps = Family::<RouterLabels, FloatGauge>::default();
        registry.register(
            "merlin_wan_download_mbps",
            "WAN download speed over the last poll interval",
            wan_download_mbps.clone(),
        );
        let wan_upload_mbps = Family::<RouterLabels, FloatGauge>::default();
        registry.register(
            "merlin_wan_upload_mbps",
            "WAN upload speed over the last poll interval",
            wan_upload_mbps.clone(),
        );

        let router_connected = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "merlin_router_connected",
            "Whether the last poll reached the router (1=connected,0=disconnected)",
            router_connected.clone(),
        );
        let devices_total = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "merlin_devices_total",
            "Devices reported by the last successful poll",
            devices_total.clone(),
        );
        let devices_active = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "merlin_devices_active",
            "Devices currently present in the ARP table",
            devices_active.clone(),
        );
        let devices_recently_seen = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "merlin_devices_recently_seen",
            "Devices seen within the consider-home window",
            devices_recently_seen.clone(),
        );
        let devices_offline = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "merlin_devices_offline",
            "Known devices not seen within the consider-home window",
            devices_offline.clone(),
        );
        let entities_registered = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "merlin_entities_registered",
            "Registered device_tracker entities",
            entities_registered.clone(),
        );
        let entities_enabled = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "merlin_entities_enabled",
            "Enabled device_tracker entities",
            entities_enabled.clone(),
        );
        let device_home = Family::<DeviceLabels, Gauge>::default();
        registry.register(
            "merlin_device_home",
            "Presence of an enabled entity (1=home,0=away)",
            device_home.clone(),
        );
        let device_last_seen_timestamp_seconds = Family::<DeviceLabels, Gauge>::default();
        registry.register(
            "merlin_device_last_seen_timestamp_seconds",
            "Unix timestamp when an enabled entity was last seen",
            device_last_seen_timestamp_seconds.clone(),
        );

        let poll_success = Family::<RouterLabels, Counter>::default();
        registry.register(
            "merlin_poll_success",
            "Successful poll cycles",
            poll_success.clone(),
        );
        let poll_errors = Family::<RouterLabels, Counter>::default();
        registry.register(
            "merlin_poll_errors",
            "Failed poll cycles",
            poll_errors.clone(),
        );
        let poll_duration_milliseconds = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "merlin_poll_duration_milliseconds",
            "Duration of last poll in milliseconds",
            poll_duration_milliseconds.clone(),
        );
        let poll_last_success_timestamp_seconds = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "merlin_poll_last_success_timestamp_seconds",
            "Unix timestamp of last successful poll",
            poll_last_success_timestamp_seconds.clone(),
        );
        let connection_consecutive_errors = Family::<RouterLabels, Gauge>::default();
        registry.register(
            "merlin_connection_consecutive_errors",
            "Number of consecutive connection errors",
            connection_consecutive_errors.clone(),
        );

        Self {
            registry: Arc::new(Mutex::new(registry)),
            wan_rx_bytes,
            wan_tx_bytes,
            wan_download_mbps,
            wan_upload_mbps,
            router_connected,
            devices_total,
            devices_active,
            devices_recently_seen,
            devices_offline,
            entities_registered,
            entities_enabled,
            device_home,
            device_last_seen_timestamp_seconds,
            poll_success,
            poll_errors,
            poll_duration_milliseconds,
            poll_last_success_timestamp_seconds,
            connection_consecutive_errors,
            prev_devices: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}
