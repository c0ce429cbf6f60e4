//! AsusWrt-Merlin router access over SSH
//!
//! This module owns the SSH session to the router, runs the read-only command
//! batch of a poll cycle and parses its output into devices and WAN counters.

mod client;
pub(crate) mod commands;
mod connector;
pub mod parse;
mod session;
mod types;

// Re-export public types and functions
pub use client::RouterClient;
pub use connector::{CommandRunner, ConnectionHealth, Connector};
pub use types::{ArpEntry, Device, DhcpLease, PollResult, WanCounters};

#[cfg(test)]
pub(crate) use client::tests::FakeRunner;
