//! Spherical Mercator (EPSG:3857) projection and the pixel transformation
//! layered on top of it.

use crate::core::constants::{EARTH_RADIUS, MAX_LATITUDE, TILE_SIZE};
use crate::core::geo::{GeoPoint, PlanarPoint, Point};
use crate::traits::Projection;
use std::f64::consts::PI;

/// Spherical Mercator, the projection behind web map tiles.
///
/// Latitudes are clamped to ±[`MAX_LATITUDE`] before projecting, so the poles
/// map to a finite (degenerate) edge instead of infinity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SphericalMercator;

impl SphericalMercator {
    pub const RADIUS: f64 = EARTH_RADIUS;

    pub fn new() -> Self {
        Self
    }

    /// Projected extent on either axis, `[-πR, πR]`
    pub fn half_extent() -> f64 {
        PI * Self::RADIUS
    }
}

impl Projection for SphericalMercator {
    fn project(&self, geo: GeoPoint) -> PlanarPoint {
        let lat = geo.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let sin = lat.to_radians().sin();

        Point::new(
            Self::RADIUS * geo.lng.to_radians(),
            Self::RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0,
        )
    }

    fn unproject(&self, planar: PlanarPoint) -> GeoPoint {
        let lat = 2.0 * (planar.y / Self::RADIUS).exp().atan() - PI / 2.0;
        GeoPoint::new((planar.x / Self::RADIUS).to_degrees(), lat.to_degrees())
    }
}

/// Affine `(a·x + b, c·y + d)` map from projected meters to pixels at zoom 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Transformation {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// The EPSG:3857 transformation: world square of side 1, y growing south
    pub fn web_mercator() -> Self {
        let scale = 0.5 / SphericalMercator::half_extent();
        Self::new(scale, 0.5, -scale, 0.5)
    }

    pub fn transform(&self, point: Point, scale: f64) -> Point {
        Point::new(
            scale * (self.a * point.x + self.b),
            scale * (self.c * point.y + self.d),
        )
    }

    pub fn untransform(&self, point: Point, scale: f64) -> Point {
        Point::new(
            (point.x / scale - self.b) / self.a,
            (point.y / scale - self.d) / self.c,
        )
    }
}

/// Pixel scale of the whole world at `zoom`
pub fn zoom_scale(zoom: f64) -> f64 {
    TILE_SIZE * 2_f64.powf(zoom)
}

/// Geographic coordinate to absolute world pixel at `zoom`
pub fn geo_to_world_pixel(geo: GeoPoint, zoom: f64) -> Point {
    let projected = SphericalMercator.project(geo);
    Transformation::web_mercator().transform(projected, zoom_scale(zoom))
}

/// Absolute world pixel at `zoom` back to geography
pub fn world_pixel_to_geo(pixel: Point, zoom: f64) -> GeoPoint {
    let projected = Transformation::web_mercator().untransform(pixel, zoom_scale(zoom));
    SphericalMercator.unproject(projected)
}
