// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for convenient use.
//! Users of the library can import everything they need with:
//!
//! ```rust
//! use merlin_tracker::prelude::*;
//! ```

// Core types
pub use crate::config::{AuthMethod, Config, RouterConfig};
pub use crate::error::{AppError, Result, RouterError};

// Metrics types
pub use crate::metrics::{DeviceLabels, MetricsRegistry, RouterLabels};

// Router access
pub use crate::router::{CommandRunner, Connector, Device, PollResult, RouterClient};

// Presence tracking
pub use crate::tracker::{EntityState, LastSeenStore, Tracker, TrackerEntity};
