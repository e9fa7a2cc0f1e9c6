//! Core types for Home Assistant
//!
//! This crate provides the record types the sorting engine reads:
//! EntityId and State.

mod entity_id;
mod state;

pub use entity_id::{EntityId, EntityIdError};
pub use state::State;

/// Attribute holding the human readable name of an entity
pub const ATTR_FRIENDLY_NAME: &str = "friendly_name";

/// Attribute holding the last trigger time of automations and scripts
pub const ATTR_LAST_TRIGGERED: &str = "last_triggered";
