//! Prelude module for common maplet-chart types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use maplet_chart::prelude::*;`

pub use crate::core::{
    config::{MapComponentOption, RoamMode, TileSourceOption},
    geo::{GeoPoint, PixelOffset, PixelPoint, PlanarPoint, Point, Rect, TileCoord},
    projection::SphericalMercator,
};

pub use crate::component::{ComponentId, MapComponentModel, MapExtension};

pub use crate::coord::{MapCoordinateSystem, SharedCoordinateSystem};

pub use crate::engine::{
    ActionDescriptor, ActionHandler, ActionPayload, ChartApi, ComponentView,
    CoordinateSystemCreator, EngineRegistry, ModelTree, UpdatePhase,
};

pub use crate::input::{MapEvent, MapEventKind, Subscription};

pub use crate::layers::{base::LayerTrait, overlay::ChartOverlay, tile::TileTemplate};

pub use crate::sync::{RoamSink, SyncPhase, ViewSynchronizer};

pub use crate::traits::{CoordinateSystem, Projection};

pub use crate::widget::{
    HeadlessLibrary, HeadlessMap, InteractionHandler, LayerControl, LayerId, MapLibrary,
    MapWidget,
};

pub use crate::dom::Element;

pub use crate::{Error as MapError, Result};

pub use std::{cell::RefCell, rc::Rc};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
