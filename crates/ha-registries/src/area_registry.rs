//! Area Registry
//!
//! Tracks all registered areas (rooms, zones) in the home.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A registered area entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaEntry {
    /// Area id (`area_id` in websocket payloads)
    #[serde(alias = "area_id")]
    pub id: String,

    /// Area name (e.g., "Living Room")
    pub name: String,

    /// Insertion order (for stable iteration)
    #[serde(skip)]
    pub insertion_order: u64,
}

impl AreaEntry {
    /// Create an area with an explicit id
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            insertion_order: 0,
        }
    }
}

/// Area Registry
///
/// Entries are stored as `Arc<AreaEntry>` to avoid cloning on reads.
#[derive(Debug, Default)]
pub struct AreaRegistry {
    /// Primary index: area_id -> AreaEntry
    by_id: DashMap<String, Arc<AreaEntry>>,

    /// Counter for insertion ordering
    insertion_counter: AtomicU64,
}

impl AreaRegistry {
    /// Create a new area registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an area, keyed by its id
    pub fn insert(&self, mut entry: AreaEntry) -> Arc<AreaEntry> {
        entry.insertion_order = match self.by_id.get(&entry.id) {
            Some(existing) => existing.insertion_order,
            None => self.insertion_counter.fetch_add(1, Ordering::Relaxed),
        };

        debug!(area_id = %entry.id, "Registering area");
        let entry = Arc::new(entry);
        self.by_id.insert(entry.id.clone(), Arc::clone(&entry));
        entry
    }

    /// Create a new area with a generated id
    pub fn create(&self, name: &str) -> Arc<AreaEntry> {
        let id = ulid::Ulid::new().to_string().to_lowercase();
        let entry = self.insert(AreaEntry::new(id, name));
        info!("Created area: {} ({})", name, entry.id);
        entry
    }

    /// Get area by ID
    pub fn get(&self, area_id: &str) -> Option<Arc<AreaEntry>> {
        self.by_id.get(area_id).map(|r| Arc::clone(r.value()))
    }

    /// Remove an area
    pub fn remove(&self, area_id: &str) -> Option<Arc<AreaEntry>> {
        let removed = self.by_id.remove(area_id).map(|(_, e)| e);
        if removed.is_some() {
            info!("Removed area: {}", area_id);
        }
        removed
    }

    /// Get count of areas
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All areas in insertion order
    pub fn iter(&self) -> Vec<Arc<AreaEntry>> {
        let mut entries: Vec<_> = self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        entries.sort_by_key(|e| e.insertion_order);
        entries
    }
}
