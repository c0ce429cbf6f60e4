// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Parsers for router command output
//!
//! Every parser is line oriented and skips lines it cannot understand, so a
//! single garbled row never costs the whole poll.

use std::collections::{HashMap, HashSet};

use super::types::{ArpEntry, Device, DhcpLease, WanCounters};

/// ARP flag value for a complete (reachable) entry
const ARP_FLAG_REACHABLE: &str = "0x2";

/// LAN bridges on Merlin are `br0`, plus `br1`.. for guest networks
const LAN_BRIDGE_PREFIX: &str = "br";

/// Hostname placeholder dnsmasq writes for clients that sent none
const UNKNOWN_HOSTNAME: &str = "*";

/// Field index of transmitted bytes after the interface name in `/proc/net/dev`
const NET_DEV_TX_BYTES_FIELD: usize = 8;

/// Upper-cases a MAC address, returning `None` unless it is six hex octets
#[must_use]
pub fn normalize_mac(raw: &str) -> Option<String> {
    let octets: Vec<&str> = raw.split(':').collect();
    if octets.len() != 6
        || octets
            .iter()
            .any(|o| o.len() != 2 || !o.chars().all(|c| c.is_ascii_hexdigit()))
    {
        return None;
    }
    Some(raw.to_ascii_uppercase())
}

/// Name used when a device never announced a hostname
#[must_use]
pub fn fallback_hostname(mac: &str) -> String {
    format!("device_{}", mac.to_ascii_lowercase().replace(':', "_"))
}

/// Parses `/var/lib/misc/dnsmasq.leases`
///
/// Line format: `expiry mac ip hostname client_id`.
pub fn parse_dhcp_leases(output: &str) -> Vec<DhcpLease> {
    let mut out = Vec::new();
    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        if parts.len() < 4 {
            tracing::debug!("Skipping short lease line: {:?}", line);
            continue;
        }
        let Some(mac) = normalize_mac(parts[1]) else {
            tracing::debug!("Skipping lease line with invalid MAC: {:?}", line);
            continue;
        };
        let hostname = if parts[3] == UNKNOWN_HOSTNAME {
            fallback_hostname(&mac)
        } else {
            parts[3].to_string()
        };
        out.push(DhcpLease {
            mac,
            ip: parts[2].to_string(),
            hostname,
        });
    }
    out
}

/// Parses `/proc/net/arp`, keeping only reachable entries
pub fn parse_arp_table(output: &str) -> Vec<ArpEntry> {
    let mut out = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() || line.starts_with("IP address") {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            tracing::debug!("Skipping short ARP line: {:?}", line);
            continue;
        }
        if parts[2] != ARP_FLAG_REACHABLE {
            continue;
        }
        let Some(mac) = normalize_mac(parts[3]) else {
            tracing::debug!("Skipping ARP line with invalid MAC: {:?}", line);
            continue;
        };
        out.push(ArpEntry {
            ip: parts[0].to_string(),
            mac,
            device: parts[5].to_string(),
        });
    }
    out
}

/// Parses the output of `nvram get wan_ifname`
pub fn parse_wan_ifname(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Reads the rx/tx byte counters of `ifname` from `/proc/net/dev`
pub fn parse_net_dev(output: &str, ifname: &str) -> Option<WanCounters> {
    for line in output.lines() {
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        if name.trim() != ifname {
            continue;
        }
        let fields: Vec<&str> = rest.split_whitespace().collect();
        let rx_bytes = fields.first()?.parse().ok()?;
        let tx_bytes = fields.get(NET_DEV_TX_BYTES_FIELD)?.parse().ok()?;
        return Some(WanCounters { rx_bytes, tx_bytes });
    }
    tracing::debug!("Interface {} not found in /proc/net/dev", ifname);
    None
}

/// Joins DHCP leases with the reachable ARP set into one device list
///
/// Lease order is preserved and a repeated MAC keeps its last lease. Reachable
/// MACs without a lease (static addressing) are appended in ARP order, but
/// only when seen on a LAN bridge; WAN-side neighbours such as the ISP
/// gateway are not clients.
pub fn merge_devices(leases: &[DhcpLease], arp: &[ArpEntry]) -> Vec<Device> {
    let arp_ip: HashMap<&str, &str> = arp
        .iter()
        .map(|e| (e.mac.as_str(), e.ip.as_str()))
        .collect();

    let mut devices: Vec<Device> = Vec::with_capacity(leases.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for lease in leases {
        let live_ip = arp_ip.get(lease.mac.as_str());
        let device = Device {
            mac: lease.mac.clone(),
            hostname: lease.hostname.clone(),
            ip: Some(live_ip.map_or_else(|| lease.ip.clone(), |ip| (*ip).to_string())),
            is_connected: live_ip.is_some(),
        };
        match index.get(&lease.mac) {
            Some(&pos) => devices[pos] = device,
            None => {
                index.insert(lease.mac.clone(), devices.len());
                devices.push(device);
            }
        }
    }

    let mut appended: HashSet<&str> = HashSet::new();
    for entry in arp {
        if index.contains_key(&entry.mac) || !is_lan_interface(&entry.device) {
            continue;
        }
        if !appended.insert(entry.mac.as_str()) {
            continue;
        }
        devices.push(Device {
            mac: entry.mac.clone(),
            hostname: fallback_hostname(&entry.mac),
            ip: Some(entry.ip.clone()),
            is_connected: true,
        });
    }

    devices
}

fn is_lan_interface(device: &str) -> bool {
    device.starts_with(LAN_BRIDGE_PREFIX)
}
