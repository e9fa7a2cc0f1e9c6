//! Read-only lookups the sorter performs against the rest of the system
//!
//! Sorting never writes through these traits. Each call reads the current
//! contents, so a sort always reflects live data.

use std::collections::HashMap;
use std::sync::Arc;

use ha_core::State;
use ha_registries::{AreaEntry, DeviceEntry, EntityEntry, Registries};
use ha_state_store::StateStore;

/// Resolves an entity_id to its current state
pub trait StateSource {
    fn state(&self, entity_id: &str) -> Option<State>;
}

/// Ordered registry snapshots used by the device and area joins
pub trait RegistrySource {
    fn list_entities(&self) -> Vec<Arc<EntityEntry>>;
    fn list_devices(&self) -> Vec<Arc<DeviceEntry>>;
    fn list_areas(&self) -> Vec<Arc<AreaEntry>>;
}

impl StateSource for StateStore {
    fn state(&self, entity_id: &str) -> Option<State> {
        self.get(entity_id)
    }
}

impl StateSource for HashMap<String, State> {
    fn state(&self, entity_id: &str) -> Option<State> {
        self.get(entity_id).cloned()
    }
}

impl<T: StateSource + ?Sized> StateSource for Arc<T> {
    fn state(&self, entity_id: &str) -> Option<State> {
        (**self).state(entity_id)
    }
}

impl RegistrySource for Registries {
    fn list_entities(&self) -> Vec<Arc<EntityEntry>> {
        self.entities.iter()
    }

    fn list_devices(&self) -> Vec<Arc<DeviceEntry>> {
        self.devices.iter()
    }

    fn list_areas(&self) -> Vec<Arc<AreaEntry>> {
        self.areas.iter()
    }
}

impl<T: RegistrySource + ?Sized> RegistrySource for Arc<T> {
    fn list_entities(&self) -> Vec<Arc<EntityEntry>> {
        (**self).list_entities()
    }

    fn list_devices(&self) -> Vec<Arc<DeviceEntry>> {
        (**self).list_devices()
    }

    fn list_areas(&self) -> Vec<Arc<AreaEntry>> {
        (**self).list_areas()
    }
}
