//! Entity Registry
//!
//! Tracks registered entities and the device each one belongs to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A registered entity entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEntry {
    /// Full entity ID (domain.object_id)
    pub entity_id: String,

    /// Parent device ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Component/platform that provides this entity
    #[serde(default)]
    pub platform: String,

    /// User-set name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Insertion order (for stable iteration)
    #[serde(skip)]
    pub insertion_order: u64,
}

impl EntityEntry {
    /// Create a new entity entry with minimal required fields
    pub fn new(entity_id: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            device_id: None,
            platform: platform.into(),
            name: None,
            insertion_order: 0,
        }
    }

    /// Attach the entry to a device
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }
}

/// Entity Registry
///
/// Entries are stored as `Arc<EntityEntry>` to avoid cloning on reads.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    /// Primary index: entity_id -> EntityEntry
    by_entity_id: DashMap<String, Arc<EntityEntry>>,

    /// Counter for insertion ordering
    insertion_counter: AtomicU64,
}

impl EntityRegistry {
    /// Create a new entity registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, keyed by its entity_id
    ///
    /// A replaced entry keeps its original position in iteration order.
    pub fn insert(&self, mut entry: EntityEntry) -> Arc<EntityEntry> {
        entry.insertion_order = match self.by_entity_id.get(&entry.entity_id) {
            Some(existing) => existing.insertion_order,
            None => self.insertion_counter.fetch_add(1, Ordering::Relaxed),
        };

        debug!(entity_id = %entry.entity_id, "Registering entity");
        let entry = Arc::new(entry);
        self.by_entity_id
            .insert(entry.entity_id.clone(), Arc::clone(&entry));
        entry
    }

    /// Get entity by entity_id
    pub fn get(&self, entity_id: &str) -> Option<Arc<EntityEntry>> {
        self.by_entity_id.get(entity_id).map(|r| Arc::clone(r.value()))
    }

    /// Remove an entity
    pub fn remove(&self, entity_id: &str) -> Option<Arc<EntityEntry>> {
        self.by_entity_id.remove(entity_id).map(|(_, e)| e)
    }

    /// Get count of registered entities
    pub fn len(&self) -> usize {
        self.by_entity_id.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.by_entity_id.is_empty()
    }

    /// All entries in insertion order
    pub fn iter(&self) -> Vec<Arc<EntityEntry>> {
        let mut entries: Vec<_> = self
            .by_entity_id
            .iter()
            .map(|r| Arc::clone(r.value()))
            .collect();
        entries.sort_by_key(|e| e.insertion_order);
        entries
    }
}
