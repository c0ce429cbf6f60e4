// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Read-only shell commands issued on AsusWrt-Merlin firmware

use std::net::IpAddr;

pub const DHCP_LEASES: &str = "cat /var/lib/misc/dnsmasq.leases";
pub const ARP_TABLE: &str = "cat /proc/net/arp";
pub const WAN_IFNAME: &str = "nvram get wan_ifname";
pub const NET_DEV: &str = "cat /proc/net/dev";

/// Builds one command that pings every address in parallel and waits for all
///
/// Only literal IP addresses make it into the command line; anything else read
/// from the lease file is dropped.
pub fn ping_batch(ips: &[String]) -> Option<String> {
    let valid: Vec<String> = ips
        .iter()
        .filter_map(|ip| ip.parse::<IpAddr>().ok())
        .map(|ip| ip.to_string())
        .collect();
    if valid.is_empty() {
        return None;
    }
    Some(format!(
        "for ip in {}; do ping -c 1 -W 1 \"$ip\" >/dev/null 2>&1 & done; wait",
        valid.join(" ")
    ))
}
