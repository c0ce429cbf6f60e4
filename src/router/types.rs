// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Type definitions for data read from the router

use serde::Serialize;

/// One row of the dnsmasq lease file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpLease {
    pub mac: String,
    pub ip: String,
    pub hostname: String,
}

/// A reachable row of `/proc/net/arp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpEntry {
    pub ip: String,
    pub mac: String,
    /// Interface the neighbour was seen on (`br0`, `eth0`, ...)
    pub device: String,
}

/// Cumulative WAN interface byte counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WanCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// A device as seen in a single poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    /// Upper-case MAC address, the stable identity
    pub mac: String,
    pub hostname: String,
    pub ip: Option<String>,
    /// Present in the ARP table with the reachable flag
    pub is_connected: bool,
}

/// Everything gathered from the router in one poll cycle
#[derive(Debug, Clone, Default)]
pub struct PollResult {
    pub devices: Vec<Device>,
    pub wan: Option<WanCounters>,
}

impl PollResult {
    /// Number of devices currently in the ARP table
    #[must_use]
    pub fn connected_count(&self) -> usize {
        self.devices.iter().filter(|d| d.is_connected).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(mac: &str, connected: bool) -> Device {
        Device {
            mac: mac.to_string(),
            hostname: "host".to_string(),
            ip: None,
            is_connected: connected,
        }
    }

    #[test]
    fn test_connected_count() {
        let result = PollResult {
            devices: vec![
                device("AA:AA:AA:AA:AA:01", true),
                device("AA:AA:AA:AA:AA:02", false),
                device("AA:AA:AA:AA:AA:03", true),
            ],
            wan: None,
        };
        assert_eq!(result.connected_count(), 2);
    }

    #[test]
    fn test_poll_result_default_is_empty() {
        let result = PollResult::default();
        assert!(result.devices.is_empty());
        assert!(result.wan.is_none());
        assert_eq!(result.connected_count(), 0);
    }
}
