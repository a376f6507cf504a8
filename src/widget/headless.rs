//! In-memory map widget following Leaflet's view model.
//!
//! Layer pixels are measured from a pixel origin that only changes when the
//! view is reset (`set_view`, zoom changes). Panning moves the map pane
//! instead, writing `translate3d(..)` to its style, so layer coordinates of a
//! fixed place stay put while the user drags. This is the behaviour the chart
//! offset correction is built against.

use crate::core::config::TileSourceOption;
use crate::core::constants::{MAP_PANE, OVERLAY_PANE, TILE_PANE};
use crate::core::geo::{GeoPoint, Point, TileCoord};
use crate::core::projection::{geo_to_world_pixel, world_pixel_to_geo};
use crate::dom::{translate3d, Element};
use crate::input::{EventCallback, EventManager, ListenerId, MapEvent, MapEventKind};
use crate::layers::base::LayerTrait;
use crate::layers::tile::{TileSource, TileTemplate};
use crate::widget::{InteractionHandler, LayerControl, LayerId, MapLibrary, MapWidget};
use crate::{Error, Result};
use fxhash::FxHashMap;
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const MIN_ZOOM: f64 = 0.0;
const MAX_ZOOM: f64 = 18.0;

pub struct HeadlessMap {
    container: Element,
    panes: FxHashMap<String, Element>,
    size: Point,
    zoom: Cell<f64>,
    pixel_origin: Cell<Point>,
    pane_pos: Cell<Point>,
    last_center: Cell<Option<GeoPoint>>,
    handlers: RefCell<FxHashMap<InteractionHandler, bool>>,
    events: RefCell<EventManager>,
    tile_layers: RefCell<IndexMap<LayerId, TileSourceOption>>,
    layer_controls: RefCell<Vec<LayerControl>>,
    overlays: RefCell<Vec<Rc<dyn LayerTrait>>>,
    next_layer_id: Cell<u64>,
}

impl HeadlessMap {
    /// Creates a map of `width`×`height` pixels inside `container`, viewing
    /// `[0, 0]` at zoom 0
    pub fn new(container: Element, width: f64, height: f64) -> Self {
        let map_pane = Element::new("div").with_class("leaflet-map-pane");
        let tile_pane = Element::new("div").with_class("leaflet-tile-pane");
        let overlay_pane = Element::new("div").with_class("leaflet-overlay-pane");
        container.append_child(&map_pane);
        map_pane.append_child(&tile_pane);
        map_pane.append_child(&overlay_pane);
        map_pane.set_style("transform", translate3d(0.0, 0.0));

        let mut panes = FxHashMap::default();
        panes.insert(MAP_PANE.to_string(), map_pane);
        panes.insert(TILE_PANE.to_string(), tile_pane);
        panes.insert(OVERLAY_PANE.to_string(), overlay_pane);

        let handlers: FxHashMap<InteractionHandler, bool> =
            InteractionHandler::ALL.iter().map(|h| (*h, true)).collect();

        let map = Self {
            container,
            panes,
            size: Point::new(width, height),
            zoom: Cell::new(0.0),
            pixel_origin: Cell::new(Point::default()),
            pane_pos: Cell::new(Point::default()),
            last_center: Cell::new(None),
            handlers: RefCell::new(handlers),
            events: RefCell::new(EventManager::new()),
            tile_layers: RefCell::new(IndexMap::new()),
            layer_controls: RefCell::new(Vec::new()),
            overlays: RefCell::new(Vec::new()),
            next_layer_id: Cell::new(0),
        };
        let center = GeoPoint::default();
        map.pixel_origin.set(map.new_pixel_origin(center, 0.0));
        map.last_center.set(Some(center));
        map
    }

    /// Pans the map by `delta` pixels, as a drag would
    pub fn pan_by(&self, delta: Point) {
        if delta.x == 0.0 && delta.y == 0.0 {
            return;
        }
        self.set_pane_pos(self.pane_pos.get().subtract(&delta));
        self.fire(MapEvent::Move {
            center: self.center(),
            zoom: self.zoom(),
        });
    }

    /// Zooms around the current center, as a zoom gesture would
    pub fn set_zoom(&self, zoom: f64) {
        self.set_view(self.center(), zoom);
    }

    /// Delivers `event` to its listeners
    pub fn fire(&self, event: MapEvent) {
        // Snapshot first so listeners can call back into the map
        let listeners = self.events.borrow().listeners(event.kind());
        for listener in listeners {
            listener(&event);
        }
    }

    /// Current translation of the map pane
    pub fn pane_pos(&self) -> Point {
        self.pane_pos.get()
    }

    pub fn pixel_origin(&self) -> Point {
        self.pixel_origin.get()
    }

    pub fn listener_count(&self, kind: MapEventKind) -> usize {
        self.events.borrow().listener_count(kind)
    }

    pub fn tile_layers(&self) -> Vec<(LayerId, TileSourceOption)> {
        self.tile_layers
            .borrow()
            .iter()
            .map(|(id, tile)| (*id, tile.clone()))
            .collect()
    }

    /// URL the tile layer `id` would request for `coord`
    pub fn tile_url(&self, id: LayerId, coord: TileCoord) -> Option<String> {
        self.tile_layers
            .borrow()
            .get(&id)
            .map(|tile| TileTemplate::from_option(tile).url(coord))
    }

    pub fn layer_controls(&self) -> Vec<LayerControl> {
        self.layer_controls.borrow().clone()
    }

    pub fn overlay_ids(&self) -> Vec<String> {
        self.overlays
            .borrow()
            .iter()
            .map(|layer| layer.id().to_string())
            .collect()
    }

    fn set_pane_pos(&self, pos: Point) {
        self.pane_pos.set(pos);
        if let Some(pane) = self.panes.get(MAP_PANE) {
            pane.set_style("transform", translate3d(pos.x, pos.y));
        }
    }

    fn new_pixel_origin(&self, center: GeoPoint, zoom: f64) -> Point {
        let half = self.size.multiply(0.5);
        geo_to_world_pixel(center, zoom)
            .subtract(&half)
            .add(&self.pane_pos.get())
            .round()
    }

    fn next_layer_id(&self) -> LayerId {
        let id = self.next_layer_id.get() + 1;
        self.next_layer_id.set(id);
        LayerId(id)
    }
}

impl MapWidget for HeadlessMap {
    fn container(&self) -> Element {
        self.container.clone()
    }

    fn pane(&self, name: &str) -> Option<Element> {
        self.panes.get(name).cloned()
    }

    fn set_view(&self, center: GeoPoint, zoom: f64) {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let zoom_changed = self.zoom.get() != zoom;

        self.set_pane_pos(Point::default());
        self.zoom.set(zoom);
        self.last_center.set(Some(center));
        self.pixel_origin.set(self.new_pixel_origin(center, zoom));

        if zoom_changed {
            self.fire(MapEvent::Zoom { center, zoom });
        }
        self.fire(MapEvent::Move { center, zoom });
        if zoom_changed {
            self.fire(MapEvent::ZoomEnd { zoom });
        }
    }

    fn center(&self) -> GeoPoint {
        let pane_pos = self.pane_pos.get();
        if pane_pos.x == 0.0 && pane_pos.y == 0.0 {
            if let Some(center) = self.last_center.get() {
                return center;
            }
        }
        let center_layer_point = self.size.multiply(0.5).subtract(&pane_pos);
        self.layer_point_to_lat_lng(center_layer_point)
    }

    fn zoom(&self) -> f64 {
        self.zoom.get()
    }

    fn size(&self) -> Point {
        self.size
    }

    fn lat_lng_to_layer_point(&self, geo: GeoPoint) -> Point {
        geo_to_world_pixel(geo, self.zoom.get()).subtract(&self.pixel_origin.get())
    }

    fn layer_point_to_lat_lng(&self, point: Point) -> GeoPoint {
        world_pixel_to_geo(point.add(&self.pixel_origin.get()), self.zoom.get())
    }

    fn add_tile_layer(&self, tile: &TileSourceOption) -> LayerId {
        let id = self.next_layer_id();
        self.tile_layers.borrow_mut().insert(id, tile.clone());
        id
    }

    fn remove_layer(&self, id: LayerId) -> bool {
        self.tile_layers.borrow_mut().shift_remove(&id).is_some()
    }

    fn add_layer_control(&self, control: LayerControl) {
        self.layer_controls.borrow_mut().push(control);
    }

    fn add_overlay(&self, layer: Rc<dyn LayerTrait>) -> Result<()> {
        layer.on_add(self)?;
        self.overlays.borrow_mut().push(layer);
        Ok(())
    }

    fn remove_overlay(&self, id: &str) -> Result<()> {
        let removed = {
            let mut overlays = self.overlays.borrow_mut();
            let index = overlays.iter().position(|layer| layer.id() == id);
            index.map(|i| overlays.remove(i))
        };
        match removed {
            Some(layer) => layer.on_remove(self),
            None => Err(Error::UnknownLayer(id.to_string())),
        }
    }

    fn set_handler_enabled(&self, handler: InteractionHandler, enabled: bool) {
        self.handlers.borrow_mut().insert(handler, enabled);
    }

    fn handler_enabled(&self, handler: InteractionHandler) -> bool {
        self.handlers.borrow().get(&handler).copied().unwrap_or(false)
    }

    fn on(&self, kind: MapEventKind, callback: EventCallback) -> ListenerId {
        self.events.borrow_mut().on(kind, callback)
    }

    fn off(&self, kind: MapEventKind, id: ListenerId) -> bool {
        self.events.borrow_mut().off(kind, id)
    }
}

/// Library handing out [`HeadlessMap`]s of a fixed size
pub struct HeadlessLibrary {
    width: f64,
    height: f64,
    available: bool,
    created: RefCell<Vec<Rc<HeadlessMap>>>,
}

impl HeadlessLibrary {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            available: true,
            created: RefCell::new(Vec::new()),
        }
    }

    /// A library that reports itself as not loaded
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(0.0, 0.0)
        }
    }

    /// Most recently created map
    pub fn last_map(&self) -> Option<Rc<HeadlessMap>> {
        self.created.borrow().last().cloned()
    }

    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }
}

impl MapLibrary for HeadlessLibrary {
    fn is_available(&self) -> bool {
        self.available
    }

    fn create_map(&self, container: &Element) -> Result<Rc<dyn MapWidget>> {
        if !self.available {
            return Err(Error::LibraryUnavailable);
        }
        let map = Rc::new(HeadlessMap::new(container.clone(), self.width, self.height));
        self.created.borrow_mut().push(Rc::clone(&map));
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn map() -> HeadlessMap {
        HeadlessMap::new(Element::new("div"), 800.0, 600.0)
    }

    #[test]
    fn test_set_view_centers_layer_space() {
        let map = map();
        let center = GeoPoint::new(104.11, 37.55);
        map.set_view(center, 2.0);

        assert_eq!(map.center(), center);
        assert_eq!(map.zoom(), 2.0);

        let p = map.lat_lng_to_layer_point(center);
        assert!((p.x - 400.0).abs() <= 0.5);
        assert!((p.y - 300.0).abs() <= 0.5);
    }

    #[test]
    fn test_layer_point_round_trip() {
        let map = map();
        map.set_view(GeoPoint::new(2.35, 48.85), 9.0);
        let geo = GeoPoint::new(2.5, 48.7);
        let back = map.layer_point_to_lat_lng(map.lat_lng_to_layer_point(geo));
        assert_relative_eq!(back.lng, geo.lng, epsilon = 1e-9);
        assert_relative_eq!(back.lat, geo.lat, epsilon = 1e-9);
    }

    #[test]
    fn test_pan_moves_pane_not_layer_points() {
        let map = map();
        map.set_view(GeoPoint::new(0.0, 0.0), 3.0);
        let geo = GeoPoint::new(10.0, 10.0);
        let before = map.lat_lng_to_layer_point(geo);

        map.pan_by(Point::new(20.0, 15.0));

        assert_eq!(map.pane_pos(), Point::new(-20.0, -15.0));
        assert_eq!(
            map.pane(MAP_PANE).unwrap().style("transform").as_deref(),
            Some("translate3d(-20px, -15px, 0px)")
        );
        assert_eq!(map.lat_lng_to_layer_point(geo), before);
        // The center follows the drag
        assert!(map.center().lng > 0.0);
    }

    #[test]
    fn test_set_view_event_sequence() {
        let map = map();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for kind in MapEventKind::ALL {
            let seen = Rc::clone(&seen);
            map.on(kind, Rc::new(move |e: &MapEvent| seen.borrow_mut().push(e.kind())));
        }

        map.set_view(GeoPoint::new(1.0, 1.0), 4.0);
        assert_eq!(
            *seen.borrow(),
            vec![MapEventKind::Zoom, MapEventKind::Move, MapEventKind::ZoomEnd]
        );

        seen.borrow_mut().clear();
        map.set_view(GeoPoint::new(2.0, 1.0), 4.0);
        assert_eq!(*seen.borrow(), vec![MapEventKind::Move]);
    }

    #[test]
    fn test_listener_may_call_back_into_map() {
        let map = Rc::new(map());
        let zooms = Rc::new(RefCell::new(Vec::new()));
        let weak = Rc::downgrade(&map);
        let sink = Rc::clone(&zooms);
        map.on(
            MapEventKind::Move,
            Rc::new(move |_: &MapEvent| {
                if let Some(map) = weak.upgrade() {
                    sink.borrow_mut().push(map.zoom());
                }
            }),
        );
        map.set_zoom(5.0);
        assert_eq!(*zooms.borrow(), vec![5.0]);
    }

    #[test]
    fn test_handlers_default_enabled() {
        let map = map();
        for handler in InteractionHandler::ALL {
            assert!(map.handler_enabled(handler));
        }
        map.set_handler_enabled(InteractionHandler::Dragging, false);
        assert!(!map.handler_enabled(InteractionHandler::Dragging));
    }

    #[test]
    fn test_unavailable_library() {
        let library = HeadlessLibrary::unavailable();
        assert!(!library.is_available());
        assert!(matches!(
            library.create_map(&Element::new("div")),
            Err(Error::LibraryUnavailable)
        ));
    }
}
