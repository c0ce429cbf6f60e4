// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Poll and registry-level bookkeeping helpers

use crate::error::{AppError, Result};
use crate::metrics::labels::RouterLabels;
use prometheus_client::encoding::text::encode;

use super::MetricsRegistry;

impl MetricsRegistry {
    pub async fn encode_metrics(&self) -> Result<String> {
        let registry = self.registry.lock().await;
        let mut buffer = String::new();
        encode(&mut buffer, &registry).map_err(|e| AppError::Metrics(e.to_string()))?;
        Ok(buffer)
    }

    pub fn record_poll_success(&self, labels: &RouterLabels) {
        self.poll_success.get_or_create(labels).inc();
        self.poll_last_success_timestamp_seconds
            .get_or_create(labels)
            .set(chrono::Utc::now().timestamp());
    }

    pub fn record_poll_error(&self, labels: &RouterLabels) {
        self.poll_errors.get_or_create(labels).inc();
    }

    /// Initialize metrics for the router to zero
    ///
    /// Counters exist from the start so Prometheus can calculate rates
    /// before the first success or error occurs.
    pub fn initialize_router_metrics(&self, labels: &RouterLabels) {
        let _ = self.poll_success.get_or_create(labels);
        let _ = self.poll_errors.get_or_create(labels);
        let _ = self.poll_duration_milliseconds.get_or_create(labels);
        let _ = self.connection_consecutive_errors.get_or_create(labels);
        let _ = self.router_connected.get_or_create(labels);
    }

    pub fn record_poll_duration(&self, labels: &RouterLabels, duration_secs: f64) {
        #[allow(clippy::cast_possible_truncation)]
        let millis = (duration_secs * 1000.0).round() as i64;
        self.poll_duration_milliseconds
            .get_or_create(labels)
            .set(millis);
    }

    pub fn update_connection_errors(&self, labels: &RouterLabels, consecutive_errors: u32) {
        self.connection_consecutive_errors
            .get_or_create(labels)
            .set(i64::from(consecutive_errors));
    }

    pub fn get_poll_success_count(&self, labels: &RouterLabels) -> u64 {
        self.poll_success.get_or_create(labels).get()
    }

    pub fn get_poll_error_count(&self, labels: &RouterLabels) -> u64 {
        self.poll_errors.get_or_create(labels).get()
    }
}
