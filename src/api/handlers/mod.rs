// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod devices;
mod health;
mod metrics;
mod router;

pub use devices::{disable_device, enable_device, get_device, list_devices};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use router::router_summary;
