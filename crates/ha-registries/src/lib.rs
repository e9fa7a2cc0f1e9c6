//! Home Assistant Registries
//!
//! This crate provides in-memory registries for tracking:
//! - Entities (EntityRegistry)
//! - Devices (DeviceRegistry)
//! - Areas (AreaRegistry)
//!
//! Registries are filled from a snapshot in the shape the websocket
//! `config/*_registry/list` commands return, and hand out ordered
//! `Arc` snapshots for lookups.

pub mod area_registry;
pub mod device_registry;
pub mod entity_registry;

pub use area_registry::{AreaEntry, AreaRegistry};
pub use device_registry::{DeviceEntry, DeviceRegistry};
pub use entity_registry::{EntityEntry, EntityRegistry};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors from loading registry snapshots
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to parse registry snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Serialized form of all three registries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub entities: Vec<EntityEntry>,
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
    #[serde(default)]
    pub areas: Vec<AreaEntry>,
}

/// All registries bundled together
#[derive(Debug, Default)]
pub struct Registries {
    pub entities: EntityRegistry,
    pub devices: DeviceRegistry,
    pub areas: AreaRegistry,
}

impl Registries {
    /// Create empty registries
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registries populated from a snapshot
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        let registries = Self::new();
        registries.load(snapshot);
        registries
    }

    /// Parse a JSON snapshot and populate registries from it
    pub fn from_json_str(json: &str) -> RegistryResult<Self> {
        let snapshot: RegistrySnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Add every entry of the snapshot, replacing entries with the same id
    pub fn load(&self, snapshot: RegistrySnapshot) {
        info!(
            entities = snapshot.entities.len(),
            devices = snapshot.devices.len(),
            areas = snapshot.areas.len(),
            "Loading registry snapshot"
        );

        for entry in snapshot.entities {
            self.entities.insert(entry);
        }
        for entry in snapshot.devices {
            self.devices.insert(entry);
        }
        for entry in snapshot.areas {
            self.areas.insert(entry);
        }
    }

    /// Dump current contents in registry order
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            entities: self.entities.iter().iter().map(|e| (**e).clone()).collect(),
            devices: self.devices.iter().iter().map(|e| (**e).clone()).collect(),
            areas: self.areas.iter().iter().map(|e| (**e).clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registries_from_json() {
        let registries = Registries::from_json_str(
            &json!({
                "entities": [
                    {"entity_id": "light.desk", "device_id": "dev1", "platform": "hue"},
                    {"entity_id": "sun.sun", "platform": "sun"}
                ],
                "devices": [
                    {"id": "dev1", "name": "Hue Go", "name_by_user": "Desk", "area_id": "office"}
                ],
                "areas": [
                    {"area_id": "office", "name": "Office"}
                ]
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(registries.entities.len(), 2);
        assert_eq!(registries.devices.len(), 1);
        assert_eq!(registries.areas.len(), 1);

        let entity = registries.entities.get("light.desk").unwrap();
        assert_eq!(entity.device_id.as_deref(), Some("dev1"));
        assert!(registries.entities.get("sun.sun").unwrap().device_id.is_none());
        assert_eq!(registries.areas.get("office").unwrap().name, "Office");
    }

    #[test]
    fn test_snapshot_keeps_order() {
        let registries = Registries::new();
        registries.areas.create("Kitchen");
        registries.areas.create("Attic");
        registries.areas.create("Bedroom");

        let names: Vec<_> = registries
            .snapshot()
            .areas
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Kitchen", "Attic", "Bedroom"]);
    }

    #[test]
    fn test_invalid_snapshot() {
        let err = Registries::from_json_str("{\"entities\": 5}").unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }
}
