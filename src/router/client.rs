// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! High-level router client

use super::commands;
use super::connector::CommandRunner;
use super::parse::{
    merge_devices, parse_arp_table, parse_dhcp_leases, parse_net_dev, parse_wan_ifname,
};
use super::types::{PollResult, WanCounters};
use crate::error::RouterError;

/// AsusWrt-Merlin router client
///
/// Runs the command batch of one poll cycle over a [`CommandRunner`] and turns
/// the output into a [`PollResult`].
pub struct RouterClient<R> {
    runner: R,
    wan_ifname: Option<String>,
}

impl<R: CommandRunner> RouterClient<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            wan_ifname: None,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    /// Collects devices and WAN counters from the router
    ///
    /// # Errors
    ///
    /// Returns an error if the lease file or ARP table cannot be read. WAN
    /// counter failures only leave `wan` empty.
    pub async fn poll(&mut self) -> Result<PollResult, RouterError> {
        let leases_out = self.runner.run(commands::DHCP_LEASES).await?;
        let arp_out = self.runner.run(commands::ARP_TABLE).await?;

        let leases = parse_dhcp_leases(&leases_out);
        let arp = parse_arp_table(&arp_out);
        let devices = merge_devices(&leases, &arp);

        let wan = match self.wan_counters().await {
            Ok(wan) => wan,
            Err(e) => {
                tracing::warn!("Failed to read WAN counters: {}", e);
                None
            }
        };

        let result = PollResult { devices, wan };
        tracing::debug!(
            "Found {} devices ({} connected)",
            result.devices.len(),
            result.connected_count()
        );
        Ok(result)
    }

    /// Pings the given addresses from the router to refresh their ARP entries
    pub async fn ping(&mut self, ips: &[String]) -> Result<(), RouterError> {
        let Some(command) = commands::ping_batch(ips) else {
            return Ok(());
        };
        tracing::debug!("Pinging {} connected device IPs: {}", ips.len(), ips.join(", "));
        self.runner.run(&command).await.map(|_| ())
    }

    async fn wan_counters(&mut self) -> Result<Option<WanCounters>, RouterError> {
        let ifname = match self.wan_ifname.clone() {
            Some(name) => name,
            None => {
                let out = self.runner.run(commands::WAN_IFNAME).await?;
                let Some(name) = parse_wan_ifname(&out) else {
                    tracing::debug!("Router reported no WAN interface name");
                    return Ok(None);
                };
                tracing::debug!("WAN interface is {}", name);
                self.wan_ifname = Some(name.clone());
                name
            }
        };

        let out = self.runner.run(commands::NET_DEV).await?;
        let counters = parse_net_dev(&out, &ifname);
        if counters.is_none() {
            // Interface may have been renamed (e.g. PPPoE reconnect), ask again next time
            self.wan_ifname = None;
        }
        Ok(counters)
    }
}
