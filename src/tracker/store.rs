// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! JSON persistence of last-seen timestamps across restarts

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What is remembered about a device between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDevice {
    pub last_seen: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// MAC address -> stored record
pub type StoredDevices = BTreeMap<String, StoredDevice>;

/// File-backed last-seen store
#[derive(Debug, Clone)]
pub struct LastSeenStore {
    path: PathBuf,
}

impl LastSeenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the store; a missing or unreadable file yields an empty map
    pub async fn load(&self) -> StoredDevices {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return StoredDevices::new(),
            Err(e) => {
                tracing::debug!("Failed to read {}: {}", self.path.display(), e);
                return StoredDevices::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(devices) => devices,
            Err(e) => {
                tracing::debug!("Failed to parse {}: {}", self.path.display(), e);
                StoredDevices::new()
            }
        }
    }

    /// Writes the store atomically (temp file + rename)
    pub async fn save(&self, devices: &StoredDevices) -> std::io::Result<()> {
        let json = serde_json::to_vec_pretty(devices).map_err(std::io::Error::other)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LastSeenStore::new(dir.path().join("missing.json"));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastSeenStore::new(path).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = LastSeenStore::new(dir.path().join("state.json"));

        let mut devices = StoredDevices::new();
        devices.insert(
            "AA:BB:CC:DD:EE:FF".to_string(),
            StoredDevice {
                last_seen: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
                hostname: Some("laptop".to_string()),
            },
        );
        store.save(&devices).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("2023-11-14T22:13:20Z"));
        assert_eq!(store.load().await, devices);
    }
}
