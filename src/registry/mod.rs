// registry/mod.rs
//
// Cache of observed truth per device address. Entries are created only by a
// successful response and are never evicted.

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use crate::models::{DeviceAddress, DeviceRecord, DeviceStatus};

#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: DashMap<DeviceAddress, DeviceRecord>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self {
            devices: DashMap::new(),
        }
    }

    /// Insert or refresh a record. `None` status (an Ack or Ping refresh)
    /// keeps the previously observed status, only bumping `last_seen`.
    pub fn upsert(&self, address: DeviceAddress, status: Option<DeviceStatus>) {
        let now = Utc::now();
        self.devices
            .entry(address.clone())
            .and_modify(|record| {
                if let Some(status) = status.clone() {
                    record.last_status = Some(status);
                }
                record.last_seen = now;
            })
            .or_insert_with(|| {
                debug!(%address, "registering newly observed device");
                DeviceRecord {
                    address,
                    last_status: status,
                    last_seen: now,
                }
            });
    }

    pub fn lookup(&self, address: &DeviceAddress) -> Option<DeviceRecord> {
        self.devices.get(address).map(|entry| entry.value().clone())
    }

    /// Snapshot of all records at call time, not a live view.
    pub fn all(&self) -> Vec<DeviceRecord> {
        self.devices
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> DeviceAddress {
        DeviceAddress::new("192.168.1.45", port).unwrap()
    }

    fn status(brightness: u8) -> DeviceStatus {
        DeviceStatus {
            power: true,
            brightness,
            color: [255, 255, 255],
        }
    }

    #[test]
    fn lookup_reflects_latest_status() {
        let registry = DeviceRegistry::new();
        registry.upsert(addr(4000), Some(status(10)));
        registry.upsert(addr(4000), Some(status(80)));

        let record = registry.lookup(&addr(4000)).unwrap();
        assert_eq!(record.last_status, Some(status(80)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ack_refresh_keeps_known_status() {
        let registry = DeviceRegistry::new();
        registry.upsert(addr(4000), Some(status(42)));
        let seen_before = registry.lookup(&addr(4000)).unwrap().last_seen;

        registry.upsert(addr(4000), None);
        let record = registry.lookup(&addr(4000)).unwrap();
        assert_eq!(record.last_status, Some(status(42)));
        assert!(record.last_seen >= seen_before);
    }

    #[test]
    fn unknown_address_has_no_record() {
        let registry = DeviceRegistry::new();
        assert!(registry.lookup(&addr(4001)).is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_corrupt_entries() {
        use std::sync::Arc;

        let registry = Arc::new(DeviceRegistry::new());
        let addresses = 50u16;

        let mut tasks = Vec::new();
        for port in 4000..4000 + addresses {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                // Many interleaved writes per address; the final write wins.
                for step in 0..=100u8 {
                    registry.upsert(addr(port), Some(status(step)));
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(registry.len(), usize::from(addresses));
        for port in 4000..4000 + addresses {
            let record = registry.lookup(&addr(port)).unwrap();
            assert_eq!(record.last_status, Some(status(100)));
        }
    }
}
