//! Declarative option of the map component.
//!
//! The option is owned by the host engine's option model. On the wire it uses
//! the engine's camelCase keys:
//!
//! ```json
//! {
//!   "center": [104.11, 37.55],
//!   "zoom": 2,
//!   "roam": "move",
//!   "tiles": [{ "urlTemplate": "http://{s}.tile.osm.org/{z}/{x}/{y}.png", "label": "OSM" }],
//!   "layerControl": { "position": "topright" }
//! }
//! ```

use crate::core::constants::{
    DEFAULT_CENTER, DEFAULT_TILE_ATTRIBUTION, DEFAULT_TILE_URL, DEFAULT_ZOOM,
};
use crate::core::geo::GeoPoint;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map as JsonMap, Value};

/// Which user gestures may roam the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoamMode {
    /// `false`: no dragging, no zoom gestures
    #[default]
    Disabled,
    /// `true`: dragging and zoom gestures
    Enabled,
    /// `"move"`: dragging only
    Move,
    /// `"scale"`: zoom gestures only
    Scale,
}

impl RoamMode {
    pub fn allows_drag(self) -> bool {
        matches!(self, RoamMode::Enabled | RoamMode::Move)
    }

    pub fn allows_zoom(self) -> bool {
        matches!(self, RoamMode::Enabled | RoamMode::Scale)
    }

    fn to_value(self) -> Value {
        match self {
            RoamMode::Disabled => Value::Bool(false),
            RoamMode::Enabled => Value::Bool(true),
            RoamMode::Move => Value::String("move".to_string()),
            RoamMode::Scale => Value::String("scale".to_string()),
        }
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(false) | Value::Null => Ok(RoamMode::Disabled),
            Value::Bool(true) => Ok(RoamMode::Enabled),
            Value::String(s) if s == "move" => Ok(RoamMode::Move),
            Value::String(s) if s == "scale" => Ok(RoamMode::Scale),
            other => Err(Error::InvalidOption(format!(
                "roam must be false, true, \"move\" or \"scale\", got {other}"
            ))),
        }
    }
}

impl Serialize for RoamMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RoamMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RoamMode::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// One base tile layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSourceOption {
    pub url_template: String,
    /// Passed through to the widget's tile layer (attribution, subdomains, ...)
    #[serde(default = "empty_object")]
    pub options: Value,
    /// Name in the layer control; unlabelled sources are left out of it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TileSourceOption {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            options: empty_object(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        if !self.options.is_object() {
            self.options = empty_object();
        }
        if let Value::Object(map) = &mut self.options {
            map.insert("attribution".to_string(), Value::String(attribution.into()));
        }
        self
    }

    pub fn attribution(&self) -> Option<&str> {
        self.options.get("attribution").and_then(Value::as_str)
    }
}

impl Default for TileSourceOption {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_URL).with_attribution(DEFAULT_TILE_ATTRIBUTION)
    }
}

/// Option of one map component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapComponentOption {
    pub center: GeoPoint,
    pub zoom: f64,
    pub tiles: Vec<TileSourceOption>,
    pub layer_control: Value,
    pub roam: RoamMode,
    pub map_style: Value,
}

impl Default for MapComponentOption {
    fn default() -> Self {
        Self {
            center: GeoPoint::from(DEFAULT_CENTER),
            zoom: DEFAULT_ZOOM,
            tiles: vec![TileSourceOption::default()],
            layer_control: empty_object(),
            roam: RoamMode::Disabled,
            map_style: empty_object(),
        }
    }
}

impl MapComponentOption {
    pub fn new(center: GeoPoint, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            ..Self::default()
        }
    }

    pub fn with_roam(mut self, roam: RoamMode) -> Self {
        self.roam = roam;
        self
    }

    pub fn with_tiles(mut self, tiles: Vec<TileSourceOption>) -> Self {
        self.tiles = tiles;
        self
    }

    pub fn with_layer_control(mut self, layer_control: Value) -> Self {
        self.layer_control = layer_control;
        self
    }

    /// Parses a user option, filling every missing field with its default
    pub fn from_json(value: &Value) -> Result<Self> {
        let option: MapComponentOption = serde_json::from_value(value.clone())?;
        option.validate()?;
        Ok(option)
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Merges a partial option onto this one, the way the engine merges
    /// `setOption` calls: objects merge key by key, everything else replaces.
    pub fn merge_json(&mut self, patch: &Value) -> Result<()> {
        if !patch.is_object() {
            return Err(Error::InvalidOption(format!(
                "option patch must be an object, got {patch}"
            )));
        }
        let mut current = self.to_json()?;
        merge_value(&mut current, patch);
        *self = Self::from_json(&current)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() {
            return Err(Error::InvalidOption(format!(
                "center must be finite, got [{}, {}]",
                self.center.lng, self.center.lat
            )));
        }
        if !self.zoom.is_finite() || self.zoom < 0.0 {
            return Err(Error::InvalidOption(format!(
                "zoom must be a non-negative number, got {}",
                self.zoom
            )));
        }
        if self.tiles.is_empty() {
            return Err(Error::InvalidOption(
                "at least one tile source is required".to_string(),
            ));
        }
        if let Some(tile) = self.tiles.iter().find(|t| t.url_template.is_empty()) {
            return Err(Error::InvalidOption(format!(
                "tile source {:?} has an empty url template",
                tile.label
            )));
        }
        Ok(())
    }

    /// True when a layer control should be built for the tile sources
    pub fn wants_layer_control(&self) -> bool {
        self.tiles.len() > 1
    }
}

fn empty_object() -> Value {
    json!({})
}

fn merge_value(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => merge_object(target, patch),
        (target, patch) => *target = patch.clone(),
    }
}

fn merge_object(target: &mut JsonMap<String, Value>, patch: &JsonMap<String, Value>) {
    for (key, value) in patch {
        match target.get_mut(key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
