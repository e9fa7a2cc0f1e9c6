//! Sort strategies
//!
//! Each [`SortMethod`] extracts one value per state record, joining through
//! the registries where needed, and hands the pair to [`compare`].

use std::cmp::Ordering;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ha_core::{State, ATTR_FRIENDLY_NAME, ATTR_LAST_TRIGGERED};
use ha_registries::{DeviceEntry, EntityEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::collaborators::RegistrySource;
use crate::compare::{compare, CompareOptions};
use crate::config::SortSpec;
use crate::value::{is_truthy, SortValue};

/// Named key-extraction strategy
///
/// Names that match no strategy parse to `Unknown` and sort every pair as
/// equal, leaving the input order untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortMethod {
    /// Keep input order
    #[default]
    None,
    Domain,
    EntityId,
    FriendlyName,
    /// Same key as `FriendlyName`
    Name,
    State,
    /// Nested attribute addressed by a colon-separated path
    Attribute,
    LastChanged,
    LastUpdated,
    LastTriggered,
    /// Device name, via the entity and device registries
    Device,
    /// Area name, via the entity, device and area registries
    Area,
    Unknown(String),
}

impl SortMethod {
    /// Configuration name of the method
    pub fn as_str(&self) -> &str {
        match self {
            SortMethod::None => "none",
            SortMethod::Domain => "domain",
            SortMethod::EntityId => "entity_id",
            SortMethod::FriendlyName => "friendly_name",
            SortMethod::Name => "name",
            SortMethod::State => "state",
            SortMethod::Attribute => "attribute",
            SortMethod::LastChanged => "last_changed",
            SortMethod::LastUpdated => "last_updated",
            SortMethod::LastTriggered => "last_triggered",
            SortMethod::Device => "device",
            SortMethod::Area => "area",
            SortMethod::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SortMethod::Unknown(_))
    }

    /// Order two (possibly unresolved) state records
    pub fn compare<R>(
        &self,
        a: Option<&State>,
        b: Option<&State>,
        spec: &SortSpec,
        registries: &R,
    ) -> Ordering
    where
        R: RegistrySource + ?Sized,
    {
        let options = spec.compare_options();

        match self {
            SortMethod::None => Ordering::Equal,
            SortMethod::Domain => by_key(a, b, &options, |s| SortValue::text(s.entity_id.domain())),
            SortMethod::EntityId => by_key(a, b, &options, |s| SortValue::text(s.entity_id.as_str())),
            SortMethod::FriendlyName | SortMethod::Name => by_key(a, b, &options, name_key),
            SortMethod::State => by_key(a, b, &options, |s| SortValue::text(&s.state)),
            SortMethod::Attribute => match spec.attribute_path.as_deref() {
                Some(path) => by_attribute(a, b, path, &options),
                None => {
                    trace!("Attribute sort without an attribute path");
                    Ordering::Equal
                }
            },
            SortMethod::LastChanged => by_instant(
                a.map(|s| s.last_changed),
                b.map(|s| s.last_changed),
                &options,
            ),
            SortMethod::LastUpdated => by_instant(
                a.map(|s| s.last_updated),
                b.map(|s| s.last_updated),
                &options,
            ),
            SortMethod::LastTriggered => by_instant(
                a.and_then(last_triggered),
                b.and_then(last_triggered),
                &options,
            ),
            SortMethod::Device => by_device(a, b, &options, registries),
            SortMethod::Area => by_area(a, b, &options, registries),
            SortMethod::Unknown(name) => {
                trace!(method = %name, "Unknown sort method");
                Ordering::Equal
            }
        }
    }
}

impl FromStr for SortMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "none" => SortMethod::None,
            "domain" => SortMethod::Domain,
            "entity_id" => SortMethod::EntityId,
            "friendly_name" => SortMethod::FriendlyName,
            "name" => SortMethod::Name,
            "state" => SortMethod::State,
            "attribute" => SortMethod::Attribute,
            "last_changed" => SortMethod::LastChanged,
            "last_updated" => SortMethod::LastUpdated,
            "last_triggered" => SortMethod::LastTriggered,
            "device" => SortMethod::Device,
            "area" => SortMethod::Area,
            other => SortMethod::Unknown(other.to_string()),
        })
    }
}

impl From<String> for SortMethod {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

impl From<SortMethod> for String {
    fn from(method: SortMethod) -> String {
        method.as_str().to_string()
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare a key pulled straight from each record; an unresolved record
/// yields a missing key.
fn by_key<'s, F>(a: Option<&'s State>, b: Option<&'s State>, options: &CompareOptions, key: F) -> Ordering
where
    F: Fn(&'s State) -> SortValue<'s>,
{
    compare(
        a.map_or(SortValue::Missing, &key),
        b.map_or(SortValue::Missing, &key),
        options,
    )
}

/// `friendly_name` when it is set to something truthy, else the object id
fn name_key(state: &State) -> SortValue<'_> {
    match state.attributes.get(ATTR_FRIENDLY_NAME) {
        Some(name) if is_truthy(name) => SortValue::from(name),
        _ => SortValue::text(state.entity_id.object_id()),
    }
}

fn last_triggered(state: &State) -> Option<DateTime<Utc>> {
    state.attribute(ATTR_LAST_TRIGGERED)
}

fn by_instant(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
    options: &CompareOptions,
) -> Ordering {
    match options.order_missing(a, b) {
        Ok((a, b)) => compare(
            SortValue::Instant(a),
            SortValue::Instant(b),
            &options.with_numeric(),
        ),
        Err(ord) => ord,
    }
}

/// Position while walking an attribute path
#[derive(Clone, Copy)]
enum Node<'s> {
    Attributes(&'s HashMap<String, Value>),
    Json(&'s Value),
}

impl<'s> Node<'s> {
    /// Step into `key`; JSON null counts as absent
    fn child(self, key: &str) -> Option<Node<'s>> {
        let value = match self {
            Node::Attributes(map) => map.get(key),
            Node::Json(Value::Object(map)) => map.get(key),
            Node::Json(Value::Array(items)) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            Node::Json(_) => None,
        }?;
        (!value.is_null()).then_some(Node::Json(value))
    }

    fn into_sort_value(self) -> SortValue<'s> {
        match self {
            Node::Json(value) => SortValue::from(value),
            Node::Attributes(_) => SortValue::Missing,
        }
    }
}

/// Walk `path` (colon separated) through both attribute maps in lockstep
///
/// A side that runs out before the path ends decides the pair with the
/// null-ordering rule, before any value comparison happens.
fn by_attribute(
    a: Option<&State>,
    b: Option<&State>,
    path: &str,
    options: &CompareOptions,
) -> Ordering {
    let mut left = a.map(|s| Node::Attributes(&s.attributes));
    let mut right = b.map(|s| Node::Attributes(&s.attributes));

    for step in path.split(':') {
        let (l, r) = match options.order_missing(left, right) {
            Ok(pair) => pair,
            Err(ord) => return ord,
        };
        left = l.child(step);
        right = r.child(step);
    }

    compare(
        left.map_or(SortValue::Missing, Node::into_sort_value),
        right.map_or(SortValue::Missing, Node::into_sort_value),
        options,
    )
}

/// Entity -> device join by linear lookup in the registry snapshots
fn device_of<'r>(
    state: &State,
    entities: &[Arc<EntityEntry>],
    devices: &'r [Arc<DeviceEntry>],
) -> Option<&'r DeviceEntry> {
    let entity = entities
        .iter()
        .find(|e| e.entity_id == state.entity_id.as_str())?;
    let device_id = entity.device_id.as_deref()?;
    devices
        .iter()
        .find(|d| d.id == device_id)
        .map(|d| d.as_ref())
}

fn by_device<R>(a: Option<&State>, b: Option<&State>, options: &CompareOptions, registries: &R) -> Ordering
where
    R: RegistrySource + ?Sized,
{
    let (Some(a), Some(b)) = (a, b) else {
        return Ordering::Equal;
    };

    let entities = registries.list_entities();
    let devices = registries.list_devices();
    let (Some(device_a), Some(device_b)) = (
        device_of(a, &entities, &devices),
        device_of(b, &entities, &devices),
    ) else {
        trace!(a = %a.entity_id, b = %b.entity_id, "Device join incomplete");
        return Ordering::Equal;
    };

    compare(
        SortValue::from_opt_str(device_a.display_name()),
        SortValue::from_opt_str(device_b.display_name()),
        options,
    )
}

fn by_area<R>(a: Option<&State>, b: Option<&State>, options: &CompareOptions, registries: &R) -> Ordering
where
    R: RegistrySource + ?Sized,
{
    let (Some(a), Some(b)) = (a, b) else {
        return Ordering::Equal;
    };

    let entities = registries.list_entities();
    let devices = registries.list_devices();
    let areas = registries.list_areas();
    let area_of = |state: &State| {
        let area_id = device_of(state, &entities, &devices)?.area_id.as_deref()?;
        areas.iter().find(|area| area.id == area_id)
    };

    let (Some(area_a), Some(area_b)) = (area_of(a), area_of(b)) else {
        trace!(a = %a.entity_id, b = %b.entity_id, "Area join incomplete");
        return Ordering::Equal;
    };

    compare(SortValue::text(&area_a.name), SortValue::text(&area_b.name), options)
}
