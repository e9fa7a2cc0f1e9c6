//! Device Registry
//!
//! Tracks registered devices and the area each one is placed in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A registered device entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// Internal id
    pub id: String,

    /// Device name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// User-set name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_by_user: Option<String>,

    /// Assigned area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,

    /// Insertion order (for stable iteration)
    #[serde(skip)]
    pub insertion_order: u64,
}

impl DeviceEntry {
    /// Create a new device entry
    pub fn new(id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.map(|s| s.to_string()),
            name_by_user: None,
            area_id: None,
            insertion_order: 0,
        }
    }

    /// Set the user-chosen name
    pub fn with_name_by_user(mut self, name: impl Into<String>) -> Self {
        self.name_by_user = Some(name.into());
        self
    }

    /// Place the device in an area
    pub fn with_area(mut self, area_id: impl Into<String>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    /// Get display name (user name or device name)
    pub fn display_name(&self) -> Option<&str> {
        self.name_by_user.as_deref().or(self.name.as_deref())
    }
}

/// Device Registry
///
/// Entries are stored as `Arc<DeviceEntry>` to avoid cloning on reads.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    /// Primary index: device_id -> DeviceEntry
    by_id: DashMap<String, Arc<DeviceEntry>>,

    /// Counter for insertion ordering
    insertion_counter: AtomicU64,
}

impl DeviceRegistry {
    /// Create a new device registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a device, keyed by its id
    pub fn insert(&self, mut entry: DeviceEntry) -> Arc<DeviceEntry> {
        entry.insertion_order = match self.by_id.get(&entry.id) {
            Some(existing) => existing.insertion_order,
            None => self.insertion_counter.fetch_add(1, Ordering::Relaxed),
        };

        debug!(device_id = %entry.id, "Registering device");
        let entry = Arc::new(entry);
        self.by_id.insert(entry.id.clone(), Arc::clone(&entry));
        entry
    }

    /// Get device by ID
    pub fn get(&self, device_id: &str) -> Option<Arc<DeviceEntry>> {
        self.by_id.get(device_id).map(|r| Arc::clone(r.value()))
    }

    /// Remove a device
    pub fn remove(&self, device_id: &str) -> Option<Arc<DeviceEntry>> {
        self.by_id.remove(device_id).map(|(_, e)| e)
    }

    /// Get count of devices
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All devices in insertion order
    pub fn iter(&self) -> Vec<Arc<DeviceEntry>> {
        let mut entries: Vec<_> = self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        entries.sort_by_key(|e| e.insertion_order);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_user_name() {
        let device = DeviceEntry::new("d1", Some("Hue Go"));
        assert_eq!(device.display_name(), Some("Hue Go"));

        let renamed = device.with_name_by_user("Reading Lamp");
        assert_eq!(renamed.display_name(), Some("Reading Lamp"));

        assert_eq!(DeviceEntry::new("d2", None).display_name(), None);
    }

    #[test]
    fn test_insert_get_remove() {
        let registry = DeviceRegistry::new();
        registry.insert(DeviceEntry::new("d1", Some("Plug")).with_area("kitchen"));
        registry.insert(DeviceEntry::new("d2", Some("Sensor")));

        assert_eq!(
            registry.get("d1").unwrap().area_id.as_deref(),
            Some("kitchen")
        );
        let ids: Vec<_> = registry.iter().iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);

        registry.remove("d1");
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }
}
