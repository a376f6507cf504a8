use serde::{Deserialize, Serialize};

/// A geographical coordinate in degrees.
///
/// Field order follows the chart data convention, `[lng, lat]`, rather than
/// the map widget's `(lat, lng)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    /// Creates a new coordinate from longitude and latitude
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }

    /// Coordinate-wise equality, as used to detect option changes
    pub fn same_as(&self, other: &GeoPoint) -> bool {
        self.lng == other.lng && self.lat == other.lat
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(value: GeoPoint) -> Self {
        value.to_array()
    }
}

impl From<geo_types::Coord<f64>> for GeoPoint {
    fn from(coord: geo_types::Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

impl From<geo_types::Point<f64>> for GeoPoint {
    fn from(point: geo_types::Point<f64>) -> Self {
        Self::new(point.x(), point.y())
    }
}

impl From<GeoPoint> for geo_types::Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        geo_types::Coord {
            x: point.lng,
            y: point.lat,
        }
    }
}

impl From<GeoPoint> for geo_types::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo_types::Point::new(point.lng, point.lat)
    }
}

/// Represents a point in screen, layer or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Device pixels relative to the chart surface origin.
pub type PixelPoint = Point;

/// Spherical Mercator meters.
pub type PlanarPoint = Point;

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn round(&self) -> Point {
        Point::new(self.x.round(), self.y.round())
    }

    /// Shifts the point out of layer space into the chart surface's space
    pub fn shifted_by(&self, offset: PixelOffset) -> Point {
        Point::new(self.x - offset.dx, self.y - offset.dy)
    }

    /// Inverse of [`Point::shifted_by`]
    pub fn unshifted_by(&self, offset: PixelOffset) -> Point {
        Point::new(self.x + offset.dx, self.y + offset.dy)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Translation between the widget's layer space and the chart surface.
///
/// Always the negation of the translation the map widget applied to the
/// surface's panes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct PixelOffset {
    pub dx: f64,
    pub dy: f64,
}

impl PixelOffset {
    pub const ZERO: PixelOffset = PixelOffset { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// The offset compensating a translation of `(tx, ty)`
    pub fn from_translation(tx: f64, ty: f64) -> Self {
        // `0.0 - t` keeps a zero translation at +0.0
        Self::new(0.0 - tx, 0.0 - ty)
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

impl From<[f64; 2]> for PixelOffset {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<PixelOffset> for [f64; 2] {
    fn from(value: PixelOffset) -> Self {
        [value.dx, value.dy]
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// 2D affine matrix `[a, b, c, d, tx, ty]`
pub type Matrix = [f64; 6];

/// The matrix that leaves every point where it is
pub fn identity_matrix() -> Matrix {
    [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_serializes_as_lng_lat_pair() {
        let point = GeoPoint::new(104.11, 37.55);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, "[104.11,37.55]");

        let back: GeoPoint = serde_json::from_str("[-74.006, 40.7128]").unwrap();
        assert_eq!(back.lng, -74.006);
        assert_eq!(back.lat, 40.7128);
        assert!(back.is_finite());
    }

    #[test]
    fn test_geo_types_interop() {
        let coord = geo_types::Coord { x: 2.35, y: 48.85 };
        let point = GeoPoint::from(coord);
        assert_eq!(point, GeoPoint::new(2.35, 48.85));

        let back: geo_types::Point<f64> = point.into();
        assert_eq!(back.x(), 2.35);
        assert_eq!(back.y(), 48.85);
    }

    #[test]
    fn test_offset_shift_round_trip() {
        let offset = PixelOffset::new(20.0, 15.0);
        let p = Point::new(100.0, 50.0);
        assert_eq!(p.shifted_by(offset), Point::new(80.0, 35.0));
        assert_eq!(p.shifted_by(offset).unshifted_by(offset), p);
    }

    #[test]
    fn test_offset_from_translation() {
        assert_eq!(
            PixelOffset::from_translation(-20.0, -15.0),
            PixelOffset::new(20.0, 15.0)
        );
        assert!(PixelOffset::from_translation(0.0, 0.0).is_zero());
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert!(rect.contains(&Point::new(400.0, 300.0)));
        assert!(!rect.contains(&Point::new(801.0, 300.0)));
    }
}
