//! Shared trait abstractions
//!
//! The seams between this crate and its collaborators: the projection the map
//! widget uses, and the coordinate system contract the charting engine calls
//! into while rendering.

use crate::core::geo::{GeoPoint, Matrix, PixelPoint, PlanarPoint, Rect};

/// A fixed map projection between degrees and a planar space
pub trait Projection {
    /// Geographic coordinates to planar coordinates
    fn project(&self, geo: GeoPoint) -> PlanarPoint;

    /// Planar coordinates back to geographic coordinates
    fn unproject(&self, planar: PlanarPoint) -> GeoPoint;
}

/// What the charting engine's layout and rendering code asks of a coordinate
/// system, every frame
pub trait CoordinateSystem {
    /// Names of the data dimensions, in data order
    fn dimensions(&self) -> &'static [&'static str];

    /// Data coordinates to chart surface pixels
    fn data_to_point(&self, data: GeoPoint) -> PixelPoint;

    /// Chart surface pixels back to data coordinates
    fn point_to_data(&self, point: PixelPoint) -> GeoPoint;

    /// Area of the chart surface the system covers, for clipping and hit testing
    fn view_rect(&self) -> Rect;

    /// Extra transform applied on top of [`CoordinateSystem::data_to_point`]
    fn roam_transform(&self) -> Matrix;
}

/// Combine two transformation matrices
pub fn combine_matrices(a: &Matrix, b: &Matrix) -> Matrix {
    [
        a[0] * b[0] + a[2] * b[1],        // a
        a[1] * b[0] + a[3] * b[1],        // b
        a[0] * b[2] + a[2] * b[3],        // c
        a[1] * b[2] + a[3] * b[3],        // d
        a[0] * b[4] + a[2] * b[5] + a[4], // e
        a[1] * b[4] + a[3] * b[5] + a[5], // f
    ]
}

/// Apply a matrix to a point
pub fn apply_matrix(m: &Matrix, point: PixelPoint) -> PixelPoint {
    PixelPoint::new(
        m[0] * point.x + m[2] * point.y + m[4],
        m[1] * point.x + m[3] * point.y + m[5],
    )
}
