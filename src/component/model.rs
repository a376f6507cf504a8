use crate::core::config::MapComponentOption;
use crate::core::geo::GeoPoint;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identity of a map component within its chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaflet#{}", self.0)
    }
}

/// Model of one map component: its identity and declarative option.
///
/// Runtime handles (the widget, the offset, listeners) live in
/// [`ComponentStates`](crate::component::ComponentStates), not here.
#[derive(Debug, Clone, PartialEq)]
pub struct MapComponentModel {
    id: ComponentId,
    option: MapComponentOption,
}

impl MapComponentModel {
    pub fn new(id: ComponentId, option: MapComponentOption) -> Self {
        Self { id, option }
    }

    /// Builds the model from a user option, defaults filled in
    pub fn from_json(id: ComponentId, option: &Value) -> Result<Self> {
        Ok(Self::new(id, MapComponentOption::from_json(option)?))
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn option(&self) -> &MapComponentOption {
        &self.option
    }

    /// Applies a `setOption`-style partial update
    pub fn merge_option(&mut self, patch: &Value) -> Result<()> {
        self.option.merge_json(patch)
    }

    /// Overwrites center and zoom; the widget is not touched
    pub fn set_center_and_zoom(&mut self, center: GeoPoint, zoom: f64) {
        self.option.center = center;
        self.option.zoom = zoom;
    }

    /// False only when both center and zoom match the option exactly
    pub fn center_or_zoom_changed(&self, center: GeoPoint, zoom: f64) -> bool {
        !(center.same_as(&self.option.center) && zoom == self.option.zoom)
    }
}
