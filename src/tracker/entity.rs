// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Device tracker entities

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Entity domain prefix for device trackers
pub const DEVICE_TRACKER_DOMAIN: &str = "device_tracker";

/// Presence state of a tracked device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    Home,
    Away,
}

impl EntityState {
    /// `home` iff less than `consider_home` has elapsed since `last_seen`
    #[must_use]
    pub fn evaluate(
        last_seen: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        consider_home: TimeDelta,
    ) -> Self {
        match last_seen {
            Some(seen) if now.signed_duration_since(seen) < consider_home => Self::Home,
            _ => Self::Away,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }
}

/// Attributes published with the entity state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityAttributes {
    pub mac: String,
    pub hostname: String,
    pub ip: Option<String>,
}

/// One `device_tracker.*` entity
///
/// `state`, `attributes` and `last_seen` are the published values; they only
/// change while the entity is enabled. `None` state means it was never
/// refreshed (unknown).
#[derive(Debug, Clone, Serialize)]
pub struct TrackerEntity {
    pub entity_id: String,
    pub enabled: bool,
    pub state: Option<EntityState>,
    pub attributes: EntityAttributes,
    pub last_seen: Option<DateTime<Utc>>,
}

impl TrackerEntity {
    pub(crate) fn new(entity_id: String, mac: &str, hostname: &str, enabled: bool) -> Self {
        Self {
            entity_id,
            enabled,
            state: None,
            attributes: EntityAttributes {
                mac: mac.to_string(),
                hostname: hostname.to_string(),
                ip: None,
            },
            last_seen: None,
        }
    }

    #[must_use]
    pub fn mac(&self) -> &str {
        &self.attributes.mac
    }
}

/// Turns a hostname into an entity object id (`My-Laptop.lan` -> `my_laptop_lan`)
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("laptop"), "laptop");
        assert_eq!(slugify("My-Laptop.lan"), "my_laptop_lan");
        assert_eq!(slugify("  Galaxy  S21 "), "galaxy_s21");
        assert_eq!(slugify("device_aa_bb"), "device_aa_bb");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_evaluate_state() {
        let t0 = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let window = TimeDelta::seconds(180);

        assert_eq!(EntityState::evaluate(Some(t0), t0, window), EntityState::Home);
        assert_eq!(
            EntityState::evaluate(Some(t0), t0 + TimeDelta::seconds(179), window),
            EntityState::Home
        );
        assert_eq!(
            EntityState::evaluate(Some(t0), t0 + TimeDelta::seconds(180), window),
            EntityState::Away
        );
        assert_eq!(
            EntityState::evaluate(Some(t0), t0 + TimeDelta::seconds(181), window),
            EntityState::Away
        );
        assert_eq!(EntityState::evaluate(None, t0, window), EntityState::Away);
    }

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EntityState::Home).unwrap(),
            "\"home\""
        );
        assert_eq!(EntityState::Away.as_str(), "away");
    }
}
