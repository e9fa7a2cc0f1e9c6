//! Sorter factory
//!
//! Turns a [`SortSpec`] into a comparator over row references: each row is
//! resolved to its state, then the configured strategy orders the pair.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::collaborators::{RegistrySource, StateSource};
use crate::config::SortSpec;

/// A row to be sorted, identified by the entity it shows
///
/// Any other row options are carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowReference {
    pub entity: String,
    #[serde(flatten)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl RowReference {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            options: serde_json::Map::new(),
        }
    }
}

impl From<&str> for RowReference {
    fn from(entity: &str) -> Self {
        Self::new(entity)
    }
}

/// Comparator over rows for one sort configuration
///
/// Holds no results between calls: every comparison re-reads states and
/// registries.
#[derive(Debug)]
pub struct Sorter<'a, S: ?Sized, R: ?Sized> {
    spec: SortSpec,
    states: &'a S,
    registries: &'a R,
}

impl<'a, S, R> Sorter<'a, S, R>
where
    S: StateSource + ?Sized,
    R: RegistrySource + ?Sized,
{
    pub fn new(spec: SortSpec, states: &'a S, registries: &'a R) -> Self {
        Self {
            spec,
            states,
            registries,
        }
    }

    /// Order two rows
    pub fn compare(&self, a: &RowReference, b: &RowReference) -> Ordering {
        if !self.spec.method.is_known() {
            return Ordering::Equal;
        }

        let state_a = self.states.state(&a.entity);
        let state_b = self.states.state(&b.entity);
        if state_a.is_none() || state_b.is_none() {
            trace!(a = %a.entity, b = %b.entity, "Row without state");
        }

        self.spec.method.compare(
            state_a.as_ref(),
            state_b.as_ref(),
            &self.spec,
            self.registries,
        )
    }

    /// Stable in-place sort of `rows`
    pub fn sort(&self, rows: &mut [RowReference]) {
        debug!(method = %self.spec.method, rows = rows.len(), "Sorting rows");
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

/// Build a comparator closure for `spec`, ready for `slice::sort_by`
pub fn make_comparator<'a, S, R>(
    spec: SortSpec,
    states: &'a S,
    registries: &'a R,
) -> impl Fn(&RowReference, &RowReference) -> Ordering + 'a
where
    S: StateSource + ?Sized + 'a,
    R: RegistrySource + ?Sized + 'a,
{
    let sorter = Sorter::new(spec, states, registries);
    move |a, b| sorter.compare(a, b)
}
