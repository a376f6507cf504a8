//! Coordinate system bridging chart data space and the map widget.

pub mod system;

pub use system::{MapCoordinateSystem, SharedCoordinateSystem, DIMENSIONS};
