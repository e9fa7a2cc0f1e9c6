//! State type representing an entity's current state

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::EntityId;

/// Represents the state of an entity at a point in time
///
/// State includes the entity's current value (as a string), any associated
/// attributes, and timestamps for when the state was last changed and updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// The entity this state belongs to
    pub entity_id: EntityId,

    /// The state value (e.g., "on", "off", "23.5", "unavailable")
    pub state: String,

    /// Additional attributes associated with the state
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,

    /// When the state was last changed (different from previous state)
    pub last_changed: DateTime<Utc>,

    /// When the state was last updated (even if value didn't change)
    pub last_updated: DateTime<Utc>,
}

impl State {
    /// Create a new state stamped with the current time
    pub fn new(
        entity_id: EntityId,
        state: impl Into<String>,
        attributes: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::new_at(entity_id, state, attributes, Utc::now())
    }

    /// Create a new state with both timestamps set to `at`
    pub fn new_at(
        entity_id: EntityId,
        state: impl Into<String>,
        attributes: HashMap<String, serde_json::Value>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            entity_id,
            state: state.into(),
            attributes,
            last_changed: at,
            last_updated: at,
        }
    }

    /// Create an updated state, preserving last_changed if state value is the same
    pub fn with_update(
        &self,
        new_state: impl Into<String>,
        new_attributes: HashMap<String, serde_json::Value>,
        at: DateTime<Utc>,
    ) -> Self {
        let new_state = new_state.into();
        let state_changed = self.state != new_state;

        Self {
            entity_id: self.entity_id.clone(),
            state: new_state,
            attributes: new_attributes,
            last_changed: if state_changed {
                at
            } else {
                self.last_changed
            },
            last_updated: at,
        }
    }

    /// Get an attribute value by key
    pub fn attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn light() -> State {
        State::new_at(
            "light.desk".parse().unwrap(),
            "on",
            HashMap::from([
                ("friendly_name".to_string(), json!("Desk Lamp")),
                ("brightness".to_string(), json!(180)),
            ]),
            DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn test_update_keeps_last_changed_for_same_value() {
        let state = light();
        let later = state.last_updated + Duration::minutes(5);

        let same = state.with_update("on", HashMap::new(), later);
        assert_eq!(same.last_changed, state.last_changed);
        assert_eq!(same.last_updated, later);

        let changed = state.with_update("off", HashMap::new(), later);
        assert_eq!(changed.last_changed, later);
    }

    #[test]
    fn test_typed_attribute() {
        let state = light();
        assert_eq!(state.attribute::<u8>("brightness"), Some(180));
        assert_eq!(state.attribute::<String>("brightness"), None);
        assert_eq!(state.attribute::<u8>("missing"), None);
    }

    #[test]
    fn test_deserialize_ha_state_json() {
        let state: State = serde_json::from_value(json!({
            "entity_id": "sensor.power",
            "state": "12.5",
            "attributes": {"unit_of_measurement": "W"},
            "last_changed": "2024-05-01T10:00:00+00:00",
            "last_updated": "2024-05-01T10:01:00+00:00",
        }))
        .unwrap();
        assert_eq!(state.entity_id.domain(), "sensor");
        assert!(state.last_updated > state.last_changed);
    }
}
