// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prometheus metrics for the router presence tracker
//!
//! Contains label types and the metrics registry fed after every poll.

mod labels;
mod registry;

/// Labels for routers and tracked devices
pub use labels::{DeviceLabels, RouterLabels};

/// Prometheus metrics registry
pub use registry::MetricsRegistry;
