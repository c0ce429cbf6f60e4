// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! WAN bandwidth totals and rates derived from cumulative counters

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::router::WanCounters;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Published WAN statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WanStats {
    pub rx_bytes: Option<u64>,
    pub tx_bytes: Option<u64>,
    pub total_download_gb: Option<f64>,
    pub total_upload_gb: Option<f64>,
    pub download_mbps: Option<f64>,
    pub upload_mbps: Option<f64>,
    /// Bytes received since the previous sample (0 on the first one)
    pub last_rx_delta_bytes: u64,
    pub last_tx_delta_bytes: u64,
}

/// Keeps the previous sample so each update can compute deltas and speeds
#[derive(Debug, Default)]
pub struct WanTracker {
    previous: Option<(WanCounters, DateTime<Utc>)>,
    stats: WanStats,
}

impl WanTracker {
    #[must_use]
    pub fn stats(&self) -> &WanStats {
        &self.stats
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn update(&mut self, counters: WanCounters, now: DateTime<Utc>) {
        self.stats.rx_bytes = Some(counters.rx_bytes);
        self.stats.tx_bytes = Some(counters.tx_bytes);
        self.stats.total_download_gb = Some(counters.rx_bytes as f64 / BYTES_PER_GIB);
        self.stats.total_upload_gb = Some(counters.tx_bytes as f64 / BYTES_PER_GIB);

        let mut rx_delta = 0;
        let mut tx_delta = 0;
        if let Some((prev, at)) = self.previous {
            let elapsed = now.signed_duration_since(at).num_milliseconds() as f64 / 1000.0;
            if elapsed > 0.0 {
                // Counters shrink on router reboot or 32-bit wrap; treat as no traffic
                rx_delta = counters.rx_bytes.saturating_sub(prev.rx_bytes);
                tx_delta = counters.tx_bytes.saturating_sub(prev.tx_bytes);
                self.stats.download_mbps = Some(rx_delta as f64 * 8.0 / 1_000_000.0 / elapsed);
                self.stats.upload_mbps = Some(tx_delta as f64 * 8.0 / 1_000_000.0 / elapsed);
            }
        }
        self.stats.last_rx_delta_bytes = rx_delta;
        self.stats.last_tx_delta_bytes = tx_delta;
        self.previous = Some((counters, now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_first_sample_has_no_speed() {
        let mut wan = WanTracker::default();
        wan.update(
            WanCounters {
                rx_bytes: 2 * 1024 * 1024 * 1024,
                tx_bytes: 512 * 1024 * 1024,
            },
            t(0),
        );

        let stats = wan.stats();
        assert_eq!(stats.total_download_gb, Some(2.0));
        assert_eq!(stats.total_upload_gb, Some(0.5));
        assert!(stats.download_mbps.is_none());
        assert_eq!(stats.last_rx_delta_bytes, 0);
    }

    #[test]
    fn test_speed_from_two_samples() {
        let mut wan = WanTracker::default();
        wan.update(
            WanCounters {
                rx_bytes: 0,
                tx_bytes: 0,
            },
            t(0),
        );
        wan.update(
            WanCounters {
                rx_bytes: 12_500_000,
                tx_bytes: 1_250_000,
            },
            t(0) + TimeDelta::seconds(10),
        );

        let stats = wan.stats();
        assert_eq!(stats.download_mbps, Some(10.0));
        assert_eq!(stats.upload_mbps, Some(1.0));
        assert_eq!(stats.last_rx_delta_bytes, 12_500_000);
        assert_eq!(stats.last_tx_delta_bytes, 1_250_000);
    }

    #[test]
    fn test_counter_reset_clamps_to_zero() {
        let mut wan = WanTracker::default();
        wan.update(
            WanCounters {
                rx_bytes: 5000,
                tx_bytes: 6000,
            },
            t(0),
        );
        wan.update(
            WanCounters {
                rx_bytes: 100,
                tx_bytes: 200,
            },
            t(30),
        );

        let stats = wan.stats();
        assert_eq!(stats.last_rx_delta_bytes, 0);
        assert_eq!(stats.last_tx_delta_bytes, 0);
        assert_eq!(stats.download_mbps, Some(0.0));
    }
}
