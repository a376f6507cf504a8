//! Mounts the chart's rendering surface as a custom layer of the map.

use crate::core::constants::OVERLAY_PANE;
use crate::dom::Element;
use crate::layers::base::{LayerProperties, LayerTrait};
use crate::widget::MapWidget;
use crate::{Error, Result};

/// Custom layer carrying an externally owned rendering surface.
///
/// The surface is appended to the target pane on add and detached on remove.
/// Positioning is left to the view synchronizer.
pub struct ChartOverlay {
    properties: LayerProperties,
    surface: Element,
}

impl ChartOverlay {
    pub fn new(id: impl Into<String>, surface: Element) -> Self {
        Self::with_pane(id, surface, OVERLAY_PANE)
    }

    pub fn with_pane(id: impl Into<String>, surface: Element, pane: &str) -> Self {
        Self {
            properties: LayerProperties::new(id.into(), pane),
            surface,
        }
    }

    pub fn surface(&self) -> &Element {
        &self.surface
    }

    /// True while the surface sits in `map`'s target pane
    pub fn is_mounted(&self, map: &dyn MapWidget) -> bool {
        match (map.pane(self.pane()), self.surface.parent()) {
            (Some(pane), Some(parent)) => pane == parent,
            _ => false,
        }
    }
}

impl LayerTrait for ChartOverlay {
    fn properties(&self) -> &LayerProperties {
        &self.properties
    }

    fn on_add(&self, map: &dyn MapWidget) -> Result<()> {
        let pane = map
            .pane(self.pane())
            .ok_or_else(|| Error::MissingPane(self.pane().to_string()))?;

        // A previous overlay may still hold the surface
        if self.surface.parent().is_some() {
            self.surface.remove();
        }
        pane.append_child(&self.surface);
        Ok(())
    }

    fn on_remove(&self, _map: &dyn MapWidget) -> Result<()> {
        self.surface.remove();
        Ok(())
    }
}
