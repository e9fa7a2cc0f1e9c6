//! Entity state storage for Home Assistant
//!
//! This crate provides the StateStore, which tracks the current state of
//! all entities. It is the lookup the sorter resolves row references
//! through: every read returns a snapshot copy, nothing borrowed from the
//! store outlives the call.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use ha_core::{EntityId, State};
use tracing::{debug, instrument, trace};

/// The state store tracks all entity states
///
/// States are keyed by the full entity_id string. Insertion order is not
/// kept; callers that need a stable order carry their own row list.
#[derive(Debug, Default)]
pub struct StateStore {
    states: DashMap<String, State>,
}

impl StateStore {
    /// Create an empty state store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already materialized states (e.g. a snapshot)
    pub fn from_states(states: impl IntoIterator<Item = State>) -> Self {
        let store = Self::new();
        for state in states {
            store.insert(state);
        }
        store
    }

    /// Set the state of an entity
    ///
    /// If the entity already has a state, the `last_changed` timestamp will
    /// only be updated if the state value actually changed.
    #[instrument(skip(self, state, attributes), fields(entity_id = %entity_id))]
    pub fn set(
        &self,
        entity_id: EntityId,
        state: impl Into<String>,
        attributes: HashMap<String, serde_json::Value>,
    ) -> State {
        let now = Utc::now();
        let key = entity_id.to_string();

        let new_state = match self.states.get(&key) {
            Some(existing) => existing.with_update(state, attributes, now),
            None => State::new_at(entity_id, state, attributes, now),
        };

        debug!(state = %new_state.state, "Setting entity state");
        self.states.insert(key, new_state.clone());
        new_state
    }

    /// Insert a fully formed state, replacing any previous one
    pub fn insert(&self, state: State) -> Option<State> {
        trace!(entity_id = %state.entity_id, "Inserting entity state");
        self.states.insert(state.entity_id.to_string(), state)
    }

    /// Get the current state of an entity
    pub fn get(&self, entity_id: &str) -> Option<State> {
        self.states.get(entity_id).map(|s| s.clone())
    }

    /// Get the state value as a string, or None if entity doesn't exist
    pub fn get_state(&self, entity_id: &str) -> Option<String> {
        self.states.get(entity_id).map(|s| s.state.clone())
    }

    /// Get all states
    pub fn all(&self) -> Vec<State> {
        self.states.iter().map(|r| r.value().clone()).collect()
    }

    /// Remove an entity's state
    #[instrument(skip(self))]
    pub fn remove(&self, entity_id: &str) -> Option<State> {
        let removed = self.states.remove(entity_id).map(|(_, s)| s);
        if removed.is_some() {
            trace!("Removed entity state");
        }
        removed
    }

    /// Get the total number of entities
    pub fn entity_count(&self) -> usize {
        self.states.len()
    }
}

/// Thread-safe wrapper for StateStore
pub type SharedStateStore = Arc<StateStore>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> EntityId {
        s.parse().unwrap()
    }

    #[test]
    fn test_set_and_get() {
        let store = StateStore::new();
        store.set(
            id("light.porch"),
            "on",
            HashMap::from([("brightness".to_string(), json!(90))]),
        );

        let state = store.get("light.porch").unwrap();
        assert_eq!(state.state, "on");
        assert_eq!(store.get_state("light.porch").as_deref(), Some("on"));
        assert!(store.get("light.garage").is_none());
        assert_eq!(store.entity_count(), 1);
    }

    #[test]
    fn test_set_same_value_keeps_last_changed() {
        let store = StateStore::new();
        let first = store.set(id("switch.fan"), "off", HashMap::new());
        let second = store.set(id("switch.fan"), "off", HashMap::new());
        assert_eq!(first.last_changed, second.last_changed);
        assert!(second.last_updated >= first.last_updated);
    }

    #[test]
    fn test_from_states_and_remove() {
        let store = StateStore::from_states([
            State::new(id("sensor.a"), "1", HashMap::new()),
            State::new(id("sensor.b"), "2", HashMap::new()),
        ]);
        assert_eq!(store.all().len(), 2);

        assert!(store.remove("sensor.a").is_some());
        assert!(store.remove("sensor.a").is_none());
        assert_eq!(store.entity_count(), 1);
    }
}
