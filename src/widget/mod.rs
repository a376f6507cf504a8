//! The map widget as seen from the chart side.
//!
//! Only the surface the bridge needs is modelled: view state, layer-space
//! pixel conversion, tile layers and the layer control, custom layers, the
//! gesture handlers and `move`/`zoom`/`zoomend` listeners. Tile loading and
//! drawing stay inside the widget.

pub mod headless;

use crate::core::config::TileSourceOption;
use crate::core::geo::{GeoPoint, Point};
use crate::dom::Element;
use crate::input::{EventCallback, ListenerId, MapEventKind};
use crate::layers::base::LayerTrait;
use crate::Result;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

pub use headless::{HeadlessLibrary, HeadlessMap};

/// Identifies a layer added to a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// User gesture handlers a widget can switch on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionHandler {
    Dragging,
    ScrollWheelZoom,
    DoubleClickZoom,
    TouchZoom,
}

impl InteractionHandler {
    pub const ALL: [InteractionHandler; 4] = [
        InteractionHandler::Dragging,
        InteractionHandler::ScrollWheelZoom,
        InteractionHandler::DoubleClickZoom,
        InteractionHandler::TouchZoom,
    ];

    /// Handlers that zoom rather than pan
    pub const ZOOM: [InteractionHandler; 3] = [
        InteractionHandler::ScrollWheelZoom,
        InteractionHandler::DoubleClickZoom,
        InteractionHandler::TouchZoom,
    ];
}

impl fmt::Display for InteractionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InteractionHandler::Dragging => "dragging",
            InteractionHandler::ScrollWheelZoom => "scrollWheelZoom",
            InteractionHandler::DoubleClickZoom => "doubleClickZoom",
            InteractionHandler::TouchZoom => "touchZoom",
        };
        f.write_str(name)
    }
}

/// Layer switcher listing base layers (exclusive) and overlays by label
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerControl {
    pub base_layers: IndexMap<String, LayerId>,
    pub overlays: IndexMap<String, LayerId>,
    pub options: Value,
}

/// A live map widget bound to a container element.
///
/// Methods take `&self`: the widget is shared between the component that owns
/// it, the coordinate system and the synchronizer's listeners, and it may be
/// called back into while it is delivering an event.
pub trait MapWidget {
    /// Element the widget was created in
    fn container(&self) -> Element;

    /// A named pane (`mapPane`, `tilePane`, `overlayPane`, ...)
    fn pane(&self, name: &str) -> Option<Element>;

    /// Moves the view; fires the same events a user roam would
    fn set_view(&self, center: GeoPoint, zoom: f64);

    fn center(&self) -> GeoPoint;

    fn zoom(&self) -> f64;

    /// Size of the widget's viewport in pixels
    fn size(&self) -> Point;

    /// Geographic coordinates to the widget's layer pixel space
    fn lat_lng_to_layer_point(&self, geo: GeoPoint) -> Point;

    /// Layer pixel space back to geographic coordinates
    fn layer_point_to_lat_lng(&self, point: Point) -> GeoPoint;

    fn add_tile_layer(&self, tile: &TileSourceOption) -> LayerId;

    fn remove_layer(&self, id: LayerId) -> bool;

    fn add_layer_control(&self, control: LayerControl);

    /// Adds a custom layer, calling its `on_add`
    fn add_overlay(&self, layer: Rc<dyn LayerTrait>) -> Result<()>;

    /// Removes a custom layer by id, calling its `on_remove`.
    /// Fails with [`crate::Error::UnknownLayer`] if the id is not in the stack.
    fn remove_overlay(&self, id: &str) -> Result<()>;

    fn set_handler_enabled(&self, handler: InteractionHandler, enabled: bool);

    fn handler_enabled(&self, handler: InteractionHandler) -> bool;

    fn on(&self, kind: MapEventKind, callback: EventCallback) -> ListenerId;

    /// Returns false if the listener was not attached
    fn off(&self, kind: MapEventKind, id: ListenerId) -> bool;
}

/// Entry point of the map widget library
pub trait MapLibrary {
    /// Whether the library was loaded in the host
    fn is_available(&self) -> bool {
        true
    }

    /// Creates a map bound to `container`
    fn create_map(&self, container: &Element) -> Result<Rc<dyn MapWidget>>;
}
