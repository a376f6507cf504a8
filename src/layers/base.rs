use crate::widget::MapWidget;
use crate::Result;

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    /// Pane the layer mounts its element into
    pub pane: String,
}

impl LayerProperties {
    pub fn new(id: String, pane: &str) -> Self {
        Self {
            id,
            pane: pane.to_string(),
        }
    }
}

/// A layer living in the map widget's layer stack
pub trait LayerTrait {
    fn properties(&self) -> &LayerProperties;

    fn id(&self) -> &str {
        &self.properties().id
    }

    fn pane(&self) -> &str {
        &self.properties().pane
    }

    /// Called by the widget once the layer joined its stack
    fn on_add(&self, map: &dyn MapWidget) -> Result<()>;

    /// Called by the widget once the layer left its stack
    fn on_remove(&self, map: &dyn MapWidget) -> Result<()>;
}
