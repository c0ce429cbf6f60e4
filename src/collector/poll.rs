// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! One poll cycle

use chrono::{DateTime, Utc};

use crate::api::AppState;
use crate::router::{CommandRunner, RouterClient};
use crate::tracker::LastSeenStore;

/// Polls the router once and applies the result at `now`
///
/// Returns `true` when the poll succeeded. On failure the tracker still
/// re-evaluates enabled entities so they age out to `away`.
pub(super) async fn poll_once<R: CommandRunner>(
    client: &mut RouterClient<R>,
    state: &AppState,
    store: Option<&LastSeenStore>,
    now: DateTime<Utc>,
) -> bool {
    let labels = state.router_labels();
    let start = std::time::Instant::now();

    match client.poll().await {
        Ok(result) => {
            let duration = start.elapsed().as_secs_f64();
            let snapshot = {
                let mut tracker = state.tracker.write().await;
                let changes = tracker.apply_poll(&result, now);
                for entity_id in &changes.removed {
                    tracing::debug!("Removed {}", entity_id);
                }
                if result.wan.is_some() {
                    state.metrics.update_wan(&labels, tracker.wan_stats());
                }
                state.metrics.update_presence(&labels, &tracker, now).await;
                tracker.export()
            };
            state.metrics.record_poll_success(&labels);
            state.metrics.record_poll_duration(&labels, duration);

            if let Some(store) = store {
                if let Err(e) = store.save(&snapshot).await {
                    tracing::debug!(
                        "Failed to save last-seen data to {}: {}",
                        store.path().display(),
                        e
                    );
                }
            }

            tracing::debug!(
                "Polled {} in {:.3}s: {} devices, {} connected",
                labels.router,
                duration,
                result.devices.len(),
                result.connected_count()
            );
            true
        }
        Err(e) => {
            let duration = start.elapsed().as_secs_f64();
            {
                let mut tracker = state.tracker.write().await;
                tracker.record_failure(now);
                state.metrics.update_presence(&labels, &tracker, now).await;
            }
            state.metrics.record_poll_error(&labels);
            state.metrics.record_poll_duration(&labels, duration);

            tracing::warn!(
                "Failed to poll {} in {:.3}s: {}",
                labels.router,
                duration,
                e
            );
            tracing::trace!("Error details for {}: {:?}", labels.router, e);
            false
        }
    }
}

/// Pings connected devices with enabled entities; failures are ignored
///
/// Returns `false` when there was nothing to ping.
pub(super) async fn ping_enabled_devices<R: CommandRunner>(
    client: &mut RouterClient<R>,
    state: &AppState,
) -> bool {
    let targets = state.tracker.read().await.ping_targets();
    if targets.is_empty() {
        return false;
    }
    if let Err(e) = client.ping(&targets).await {
        tracing::debug!("Keep-alive ping failed: {}", e);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthMethod, Config, RouterConfig};
    use crate::metrics::MetricsRegistry;
    use crate::router::{FakeRunner, commands};
    use crate::tracker::EntityState;
    use chrono::TimeDelta;

    const LEASES: &str = "1700000000 aa:bb:cc:dd:ee:ff 192.168.1.20 laptop 01:aa:bb:cc:dd:ee:ff\n";
    const ARP: &str = "IP address       HW type     Flags       HW address            Mask     Device\n\
                       192.168.1.20     0x1         0x2         aa:bb:cc:dd:ee:ff     *        br0\n";
    const ARP_EMPTY: &str = "IP address       HW type     Flags       HW address            Mask     Device\n";

    fn state(enabled: &[&str]) -> AppState {
        let mut config = Config::with_router(RouterConfig {
            host: "192.168.1.1".to_string(),
            port: 22,
            username: "admin".to_string(),
            auth: AuthMethod::Password("secret".to_string().into()),
        });
        config.enabled_devices = enabled.iter().map(|s| (*s).to_string()).collect();
        AppState::new(config, MetricsRegistry::new())
    }

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn runner(arp: &str) -> FakeRunner {
        FakeRunner::default()
            .with(commands::DHCP_LEASES, LEASES)
            .with(commands::ARP_TABLE, arp)
            .with(commands::WAN_IFNAME, "eth0\n")
            .with(
                commands::NET_DEV,
                "  eth0: 1000 10 0 0 0 0 0 0 2000 20 0 0 0 0 0 0\n",
            )
    }

    #[tokio::test]
    async fn test_poll_once_updates_tracker_and_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = LastSeenStore::new(dir.path().join("devices.json"));
        let state = state(&["AA:BB:CC:DD:EE:FF"]);
        let mut client = RouterClient::new(runner(ARP));

        assert!(poll_once(&mut client, &state, Some(&store), t(0)).await);

        {
            let tracker = state.tracker.read().await;
            let entity = tracker.entity("AA:BB:CC:DD:EE:FF").unwrap();
            assert_eq!(entity.entity_id, "device_tracker.laptop");
            assert_eq!(entity.state, Some(EntityState::Home));
        }
        let stored = store.load().await;
        assert_eq!(stored.get("AA:BB:CC:DD:EE:FF").unwrap().last_seen, t(0));
        assert_eq!(state.metrics.get_poll_success_count(&state.router_labels()), 1);
    }

    #[tokio::test]
    async fn test_failed_poll_ages_entities_out() {
        let state = state(&["AA:BB:CC:DD:EE:FF"]);
        let mut client = RouterClient::new(runner(ARP));
        assert!(poll_once(&mut client, &state, None, t(0)).await);

        let mut failing = RouterClient::new(FakeRunner::default().failing(commands::DHCP_LEASES));
        let later = t(0) + TimeDelta::seconds(181);
        assert!(!poll_once(&mut failing, &state, None, later).await);

        let tracker = state.tracker.read().await;
        let entity = tracker.entity("AA:BB:CC:DD:EE:FF").unwrap();
        assert_eq!(entity.state, Some(EntityState::Away));
        assert_eq!(state.metrics.get_poll_error_count(&state.router_labels()), 1);
    }

    #[tokio::test]
    async fn test_device_leaving_arp_goes_away_after_window() {
        let state = state(&["AA:BB:CC:DD:EE:FF"]);
        let mut client = RouterClient::new(runner(ARP));
        poll_once(&mut client, &state, None, t(0)).await;

        let mut client = RouterClient::new(runner(ARP_EMPTY));
        poll_once(&mut client, &state, None, t(120)).await;
        assert_eq!(
            state.tracker.read().await.entity("AA:BB:CC:DD:EE:FF").unwrap().state,
            Some(EntityState::Home)
        );

        poll_once(&mut client, &state, None, t(181)).await;
        assert_eq!(
            state.tracker.read().await.entity("AA:BB:CC:DD:EE:FF").unwrap().state,
            Some(EntityState::Away)
        );
    }

    #[tokio::test]
    async fn test_ping_only_enabled_connected_devices() {
        let state = state(&[]);
        let mut client = RouterClient::new(runner(ARP));
        poll_once(&mut client, &state, None, t(0)).await;

        assert!(!ping_enabled_devices(&mut client, &state).await);
        assert!(!client.runner().calls.iter().any(|c| c.contains("ping")));

        state.tracker.write().await.enable("AA:BB:CC:DD:EE:FF");
        assert!(ping_enabled_devices(&mut client, &state).await);
        assert!(
            client
                .runner()
                .calls
                .iter()
                .any(|c| c.contains("ping -c 1 -W 1") && c.contains("192.168.1.20"))
        );
    }
}
