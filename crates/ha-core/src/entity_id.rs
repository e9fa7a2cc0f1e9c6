//! Entity ID type representing a domain.object_id pair

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for invalid entity IDs
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityIdError {
    #[error("entity_id must contain exactly one '.' separator")]
    InvalidFormat,

    #[error("domain cannot be empty")]
    EmptyDomain,

    #[error("object_id cannot be empty")]
    EmptyObjectId,

    #[error(
        "domain contains invalid characters (must be lowercase alphanumeric with underscores, cannot start/end with underscore or contain double underscores)"
    )]
    InvalidDomainChars,

    #[error(
        "object_id contains invalid characters (must be lowercase alphanumeric with underscores, cannot start/end with underscore)"
    )]
    InvalidObjectIdChars,
}

/// Represents a Home Assistant entity ID (e.g., "light.living_room")
///
/// The full identifier is kept as one string with the separator position
/// remembered, so `as_str`, `domain` and `object_id` all borrow without
/// allocating. Sorting reads these on every comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    raw: String,
    dot: usize,
}

impl EntityId {
    /// Create a new EntityId from domain and object_id parts
    pub fn new(domain: &str, object_id: &str) -> Result<Self, EntityIdError> {
        if domain.is_empty() {
            return Err(EntityIdError::EmptyDomain);
        }
        if object_id.is_empty() {
            return Err(EntityIdError::EmptyObjectId);
        }
        if !is_valid_domain(domain) {
            return Err(EntityIdError::InvalidDomainChars);
        }
        if !is_valid_object_id(object_id) {
            return Err(EntityIdError::InvalidObjectIdChars);
        }

        Ok(Self {
            raw: format!("{domain}.{object_id}"),
            dot: domain.len(),
        })
    }

    /// The full `domain.object_id` string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Get the domain part of the entity ID
    pub fn domain(&self) -> &str {
        &self.raw[..self.dot]
    }

    /// Get the object_id part of the entity ID
    pub fn object_id(&self) -> &str {
        &self.raw[self.dot + 1..]
    }
}

/// Lowercase alphanumeric + underscore, cannot start/end with `_`
///
/// Matches Python HA regex: `(?!_)[\da-z_]+(?<!_)`
fn is_valid_object_id(s: &str) -> bool {
    if s.starts_with('_') || s.ends_with('_') {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Same as object_id, plus cannot contain `__`
fn is_valid_domain(s: &str) -> bool {
    !s.contains("__") && is_valid_object_id(s)
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((domain, object_id)) if !object_id.contains('.') => Self::new(domain, object_id),
            _ => Err(EntityIdError::InvalidFormat),
        }
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> String {
        id.raw
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
