// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry and update logic

mod cleanup;
mod init;
mod scrape;
mod update;

use crate::metrics::labels::{DeviceLabels, RouterLabels};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::Mutex;

type FloatGauge = Gauge<f64, AtomicU64>;

#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Arc<Mutex<Registry>>,
    // counters (delta-applied)
    wan_rx_bytes: Family<RouterLabels, Counter>,
    wan_tx_bytes: Family<RouterLabels, Counter>,
    // gauges
    wan_download_mbps: Family<RouterLabels, FloatGauge>,
    wan_upload_mbps: Family<RouterLabels, FloatGauge>,
    router_connected: Family<RouterLabels, Gauge>,
    devices_total: Family<RouterLabels, Gauge>,
    devices_active: Family<RouterLabels, Gauge>,
    devices_recently_seen: Family<RouterLabels, Gauge>,
    devices_offline: Family<RouterLabels, Gauge>,
    entities_registered: Family<RouterLabels, Gauge>,
    entities_enabled: Family<RouterLabels, Gauge>,
    device_home: Family<DeviceLabels, Gauge>,
    device_last_seen_timestamp_seconds: Family<DeviceLabels, Gauge>,
    // poll bookkeeping
    poll_success: Family<RouterLabels, Counter>,
    poll_errors: Family<RouterLabels, Counter>,
    poll_duration_milliseconds: Family<RouterLabels, Gauge>,
    poll_last_success_timestamp_seconds: Family<RouterLabels, Gauge>,
    connection_consecutive_errors: Family<RouterLabels, Gauge>,
    prev_devices: Arc<Mutex<HashSet<DeviceLabels>>>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
