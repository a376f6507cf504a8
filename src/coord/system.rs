use crate::core::geo::{identity_matrix, GeoPoint, Matrix, PixelOffset, PixelPoint, PlanarPoint, Rect};
use crate::core::projection::SphericalMercator;
use crate::engine::ChartApi;
use crate::traits::{CoordinateSystem, Projection};
use crate::widget::MapWidget;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Data dimensions, in the order series store them
pub const DIMENSIONS: &[&str] = &["lng", "lat"];

/// Handle the engine binds series to; rebuilt every layout pass
pub type SharedCoordinateSystem = Rc<RefCell<MapCoordinateSystem>>;

/// Maps `[lng, lat]` data onto the chart surface through the map widget.
///
/// The widget does the projection to its layer pixel space; this type only
/// corrects for the offset between that space and the chart surface, which
/// the map drags around while panning.
pub struct MapCoordinateSystem {
    map: Rc<dyn MapWidget>,
    api: Rc<dyn ChartApi>,
    projection: SphericalMercator,
    zoom: f64,
    center: PlanarPoint,
    offset: PixelOffset,
}

impl MapCoordinateSystem {
    pub fn new(map: Rc<dyn MapWidget>, api: Rc<dyn ChartApi>) -> Self {
        Self {
            map,
            api,
            projection: SphericalMercator,
            zoom: 0.0,
            center: PlanarPoint::default(),
            offset: PixelOffset::ZERO,
        }
    }

    pub fn into_shared(self) -> SharedCoordinateSystem {
        Rc::new(RefCell::new(self))
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Records the view center; stored projected
    pub fn set_center(&mut self, center: GeoPoint) {
        self.center = self.projection.project(center);
    }

    pub fn set_map_offset(&mut self, offset: PixelOffset) {
        self.offset = offset;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn projected_center(&self) -> PlanarPoint {
        self.center
    }

    pub fn center(&self) -> GeoPoint {
        self.projection.unproject(self.center)
    }

    pub fn map_offset(&self) -> PixelOffset {
        self.offset
    }

    /// The widget this system projects through
    pub fn map(&self) -> &Rc<dyn MapWidget> {
        &self.map
    }
}

impl CoordinateSystem for MapCoordinateSystem {
    fn dimensions(&self) -> &'static [&'static str] {
        DIMENSIONS
    }

    fn data_to_point(&self, data: GeoPoint) -> PixelPoint {
        self.map.lat_lng_to_layer_point(data).shifted_by(self.offset)
    }

    fn point_to_data(&self, point: PixelPoint) -> GeoPoint {
        self.map.layer_point_to_lat_lng(point.unshifted_by(self.offset))
    }

    fn view_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.api.width(), self.api.height())
    }

    /// Roaming moves the surface itself, so there is nothing to add
    fn roam_transform(&self) -> Matrix {
        identity_matrix()
    }
}

impl fmt::Debug for MapCoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapCoordinateSystem")
            .field("zoom", &self.zoom)
            .field("center", &self.center)
            .field("offset", &self.offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::engine::ActionPayload;
    use crate::widget::HeadlessMap;
    use approx::assert_relative_eq;

    struct FixedApi;

    impl ChartApi for FixedApi {
        fn width(&self) -> f64 {
            640.0
        }
        fn height(&self) -> f64 {
            480.0
        }
        fn dom_root(&self) -> Element {
            Element::new("div")
        }
        fn viewport_root(&self) -> Element {
            Element::new("div")
        }
        fn dispatch_action(&self, _action: ActionPayload) {}
    }

    fn system() -> (Rc<HeadlessMap>, MapCoordinateSystem) {
        let map = Rc::new(HeadlessMap::new(Element::new("div"), 640.0, 480.0));
        map.set_view(GeoPoint::new(104.11, 37.55), 4.0);
        let cs = MapCoordinateSystem::new(map.clone(), Rc::new(FixedApi));
        (map, cs)
    }

    #[test]
    fn test_center_is_stored_projected() {
        let (_, mut cs) = system();
        let center = GeoPoint::new(104.11, 37.55);
        cs.set_center(center);
        assert_eq!(cs.projected_center(), SphericalMercator.project(center));
        assert_relative_eq!(cs.center().lng, center.lng, epsilon = 1e-9);
        assert_relative_eq!(cs.center().lat, center.lat, epsilon = 1e-9);
    }

    #[test]
    fn test_offset_shifts_data_to_point() {
        let (map, mut cs) = system();
        let geo = GeoPoint::new(110.0, 30.0);
        let layer = map.lat_lng_to_layer_point(geo);

        assert_eq!(cs.data_to_point(geo), layer);
        cs.set_map_offset(PixelOffset::new(20.0, 15.0));
        let shifted = cs.data_to_point(geo);
        assert_relative_eq!(shifted.x, layer.x - 20.0);
        assert_relative_eq!(shifted.y, layer.y - 15.0);
    }

    #[test]
    fn test_point_to_data_inverts() {
        let (_, mut cs) = system();
        cs.set_map_offset(PixelOffset::new(-35.0, 12.5));
        let p = PixelPoint::new(123.0, 456.0);
        let back = cs.data_to_point(cs.point_to_data(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-6);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-6);
    }

    #[test]
    fn test_view_rect_and_roam_transform() {
        let (_, cs) = system();
        assert_eq!(cs.view_rect(), Rect::new(0.0, 0.0, 640.0, 480.0));
        assert_eq!(cs.roam_transform(), identity_matrix());
        assert_eq!(cs.dimensions(), &["lng", "lat"]);
    }
}
