use crate::core::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event types the synchronizer subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapEventKind {
    Move,
    Zoom,
    ZoomEnd,
}

impl MapEventKind {
    pub const ALL: [MapEventKind; 3] = [MapEventKind::Move, MapEventKind::Zoom, MapEventKind::ZoomEnd];

    /// Name of the event in the widget's own vocabulary
    pub fn name(self) -> &'static str {
        match self {
            MapEventKind::Move => "move",
            MapEventKind::Zoom => "zoom",
            MapEventKind::ZoomEnd => "zoomend",
        }
    }
}

impl fmt::Display for MapEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map event types that can be emitted by the map widget
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The view moved, by panning or as part of a zoom
    Move { center: GeoPoint, zoom: f64 },
    /// Zoom level is changing
    Zoom { center: GeoPoint, zoom: f64 },
    /// Zoom settled
    ZoomEnd { zoom: f64 },
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::Move { .. } => MapEventKind::Move,
            MapEvent::Zoom { .. } => MapEventKind::Zoom,
            MapEvent::ZoomEnd { .. } => MapEventKind::ZoomEnd,
        }
    }

    pub fn zoom(&self) -> f64 {
        match self {
            MapEvent::Move { zoom, .. } | MapEvent::Zoom { zoom, .. } | MapEvent::ZoomEnd { zoom } => {
                *zoom
            }
        }
    }
}
