//! # Placement Data Model
//!
//! A [`PlacementConfig`] says where and how overlay text is drawn on one stamp.
//! The [`ConfigStore`] maps stamp file names to their placement and is the
//! unit of persistence: it is loaded once, edited in memory and written back
//! wholesale.
//!
//! Records coming from the backend may be partial, loosely typed or not
//! records at all. Each one is kept as the raw JSON it was loaded as and only
//! interpreted when read, so a malformed record never hides the others and a
//! save returns untouched records exactly as they came. Records written by
//! the editor always carry all five fields.

pub mod file;
pub mod lenient;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Name of a stamp image, e.g. `"approved.png"`.
pub type StampName = String;

/// Default font family for new placements.
pub const DEFAULT_FONT: &str = "Arial";

/// Default text size in pixels.
pub const DEFAULT_SIZE: i64 = 24;

/// Default text color.
pub const DEFAULT_COLOR: &str = "#000000";

/// Stored placement for a single stamp, as raw JSON.
///
/// Field accessors coerce leniently; unknown fields and values that do not
/// coerce stay in the record untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementConfig(Value);

impl Default for PlacementConfig {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl From<Value> for PlacementConfig {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl PlacementConfig {
    /// True when the stored value is a JSON object.
    pub fn is_record(&self) -> bool {
        self.0.is_object()
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn x(&self) -> Option<i64> {
        self.field("x").and_then(lenient::int_from_value)
    }

    pub fn y(&self) -> Option<i64> {
        self.field("y").and_then(lenient::int_from_value)
    }

    pub fn font(&self) -> Option<String> {
        self.field("font").and_then(lenient::text_from_value)
    }

    pub fn size(&self) -> Option<i64> {
        self.field("size").and_then(lenient::int_from_value)
    }

    pub fn color(&self) -> Option<String> {
        self.field("color").and_then(lenient::text_from_value)
    }

    /// The stored JSON.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Resolve to concrete values, treating zero/empty like missing.
    ///
    /// A stored `x` or `y` of 0 and a missing one both resolve to 0; a size of
    /// 0 falls back to [`DEFAULT_SIZE`].
    pub fn resolve(&self) -> Placement {
        Placement {
            x: self.x().unwrap_or(0),
            y: self.y().unwrap_or(0),
            font: self
                .font()
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_FONT.to_string()),
            size: self.size().filter(|s| *s != 0).unwrap_or(DEFAULT_SIZE),
            color: self
                .color()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        }
    }

    /// True when all five placement fields coerce to a value.
    pub fn is_complete(&self) -> bool {
        self.x().is_some()
            && self.y().is_some()
            && self.font().is_some()
            && self.size().is_some()
            && self.color().is_some()
    }

    /// Overwrite the five placement fields, keeping every other field. A
    /// stored value that is not an object is replaced.
    fn write(&mut self, placement: &Placement) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.0 {
            map.insert("x".to_string(), Value::from(placement.x));
            map.insert("y".to_string(), Value::from(placement.y));
            map.insert("font".to_string(), Value::from(placement.font.clone()));
            map.insert("size".to_string(), Value::from(placement.size));
            map.insert("color".to_string(), Value::from(placement.color.clone()));
        }
    }
}

/// A fully populated placement, as shown on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub font: String,
    pub size: i64,
    pub color: String,
}

impl Placement {
    /// Default placement centered on an image of the given size.
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            x: i64::from(width / 2),
            y: i64::from(height / 2),
            font: DEFAULT_FONT.to_string(),
            size: DEFAULT_SIZE,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// Map of stamp name to placement; the whole persisted state.
///
/// Any JSON object loads: each entry is kept as-is, whatever its shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigStore(BTreeMap<StampName, PlacementConfig>);

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The placement record of `name`. Entries that are not JSON objects
    /// count as unconfigured but are kept for saving.
    pub fn get(&self, name: &str) -> Option<&PlacementConfig> {
        self.0.get(name).filter(|config| config.is_record())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of entries, including ones that are not records.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Overwrite the five placement fields of `name`, creating the record if
    /// needed. Other fields of an existing record are kept.
    pub fn write(&mut self, name: &str, placement: &Placement) {
        self.0.entry(name.to_string()).or_default().write(placement);
    }

    pub fn insert(&mut self, name: impl Into<StampName>, config: PlacementConfig) {
        self.0.insert(name.into(), config);
    }
}

impl FromIterator<(StampName, PlacementConfig)> for ConfigStore {
    fn from_iter<T: IntoIterator<Item = (StampName, PlacementConfig)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
