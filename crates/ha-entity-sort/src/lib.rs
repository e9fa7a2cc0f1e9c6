//! Entity row sorting for Home Assistant
//!
//! Given a [`SortSpec`] and two rows, produce a total order usable by any
//! stable sort. The crate has two layers:
//!
//! - the value comparator ([`compare`]): case folding, numeric coercion,
//!   IP-quad ordering, collation, null-ordering and reverse
//! - the strategy registry ([`SortMethod`]): extracts the compared value from
//!   each state record, joining through the entity/device/area registries
//!   for the `device` and `area` methods
//!
//! [`Sorter`] and [`make_comparator`] tie both to a state lookup.
//!
//! Nothing in the comparison path fails: lookup misses, join misses and
//! unparsable values all degrade to "equal" or to the null-ordering rule.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use ha_entity_sort::{make_comparator, RowReference, SortSpec};
//! use ha_registries::Registries;
//! use ha_state_store::StateStore;
//!
//! let states = StateStore::new();
//! states.set("light.a".parse()?, "on", HashMap::new());
//! states.set("light.b".parse()?, "off", HashMap::new());
//! let registries = Registries::new();
//!
//! let spec = SortSpec::from_yaml_str("method: entity_id\nreverse: true")?;
//! let mut rows: Vec<RowReference> = vec!["light.a".into(), "light.b".into()];
//! rows.sort_by(make_comparator(spec, &states, &registries));
//! assert_eq!(rows[0].entity, "light.b");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod collaborators;
mod collate;
mod compare;
mod config;
mod sorter;
mod strategy;
mod value;

pub use collaborators::{RegistrySource, StateSource};
pub use collate::collate;
pub use compare::{compare, CompareOptions};
pub use config::{ConfigError, ConfigResult, SortSpec};
pub use sorter::{make_comparator, RowReference, Sorter};
pub use strategy::SortMethod;
pub use value::SortValue;
