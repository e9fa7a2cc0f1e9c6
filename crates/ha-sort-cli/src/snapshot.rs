//! Snapshot file: states plus registries, as dumped from a running instance

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ha_core::State;
use ha_entity_sort::RowReference;
use ha_registries::{Registries, RegistrySnapshot};
use ha_state_store::StateStore;
use serde::Deserialize;
use tracing::info;

/// Contents of a snapshot file
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub states: Vec<State>,
    #[serde(flatten)]
    pub registries: RegistrySnapshot,
    /// Rows to sort; every state in file order when absent
    #[serde(default)]
    pub rows: Option<Vec<RowReference>>,
}

/// Loaded snapshot, split into the collaborators the sorter reads
pub struct LoadedSnapshot {
    pub store: StateStore,
    pub registries: Registries,
    pub rows: Vec<RowReference>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<LoadedSnapshot> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
        Ok(snapshot.into_loaded())
    }

    fn into_loaded(self) -> LoadedSnapshot {
        let rows = self.rows.unwrap_or_else(|| {
            self.states
                .iter()
                .map(|s| RowReference::new(s.entity_id.as_str()))
                .collect()
        });
        info!(states = self.states.len(), rows = rows.len(), "Loaded snapshot");

        LoadedSnapshot {
            store: StateStore::from_states(self.states),
            registries: Registries::from_snapshot(self.registries),
            rows,
        }
    }
}
