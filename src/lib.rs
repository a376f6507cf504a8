//! # maplet-chart
//!
//! Lets a charting engine draw its series on top of a Leaflet-style slippy
//! map. Data given as `[lng, lat]` is placed through the map widget's own
//! projection, the chart's rendering surface is mounted as a layer of the map,
//! and panning or zooming the map keeps the chart aligned and feeds the new
//! view back into the component option.
//!
//! Both the engine and the map widget are injected: the engine through the
//! traits in [`engine`], the widget through [`widget::MapLibrary`]. A complete
//! in-memory widget, [`widget::HeadlessMap`], is included.

pub mod component;
pub mod coord;
pub mod core;
pub mod dom;
pub mod engine;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod sync;
pub mod traits;
pub mod widget;
pub use crate::core::constants;

// Re-export public API
pub use component::{ComponentId, MapComponentModel, MapExtension};
pub use coord::MapCoordinateSystem;
pub use crate::core::{
    config::{MapComponentOption, RoamMode, TileSourceOption},
    geo::{GeoPoint, PixelOffset, PixelPoint, PlanarPoint, Rect},
    projection::SphericalMercator,
};
pub use engine::{ChartApi, EngineRegistry, ModelTree};
pub use layers::overlay::ChartOverlay;
pub use sync::{SyncPhase, ViewSynchronizer};
pub use traits::{CoordinateSystem, Projection};
pub use widget::{HeadlessLibrary, HeadlessMap, MapLibrary, MapWidget};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("map library is not loaded")]
    LibraryUnavailable,

    #[error("only one map component can exist per chart")]
    DuplicateCoordinateSystem,

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("map has no pane named {0:?}")]
    MissingPane(String),

    #[error("map has no layer with id {0:?}")]
    UnknownLayer(String),

    #[error("no map state for component {0}")]
    UnknownComponent(ComponentId),
}

impl Error {
    /// Setup errors that abort chart initialisation
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::LibraryUnavailable
                | Error::DuplicateCoordinateSystem
                | Error::InvalidOption(_)
                | Error::Serialization(_)
        )
    }
}

/// Error type alias for convenience
pub type MapError = Error;
