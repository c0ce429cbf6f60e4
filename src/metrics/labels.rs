// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Label types for Prometheus metrics

use prometheus_client::encoding::EncodeLabelSet;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RouterLabels {
    pub router: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct DeviceLabels {
    pub router: String,
    pub mac: String,
    pub entity_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_labels_equality() {
        let labels1 = DeviceLabels {
            router: "rt-ax86u".to_string(),
            mac: "AA:BB:CC:DD:EE:FF".to_string(),
            entity_id: "device_tracker.laptop".to_string(),
        };
        let labels2 = labels1.clone();
        assert_eq!(labels1, labels2);

        let labels3 = DeviceLabels {
            entity_id: "device_tracker.laptop_2".to_string(),
            ..labels1.clone()
        };
        assert_ne!(labels1, labels3);
    }

    #[test]
    fn test_device_labels_set_difference() {
        use std::collections::HashSet;

        let laptop = DeviceLabels {
            router: "rt-ax86u".to_string(),
            mac: "AA:BB:CC:DD:EE:FF".to_string(),
            entity_id: "device_tracker.laptop".to_string(),
        };
        let phone = DeviceLabels {
            mac: "11:22:33:44:55:66".to_string(),
            entity_id: "device_tracker.phone".to_string(),
            ..laptop.clone()
        };

        let previous: HashSet<_> = [laptop.clone(), phone.clone()].into_iter().collect();
        let current: HashSet<_> = [laptop].into_iter().collect();

        let stale: Vec<_> = previous.difference(&current).collect();
        assert_eq!(stale, vec![&phone]);
    }
}
