//! The charting engine as seen from the map component.
//!
//! The engine is injected: it hands the extension a [`ChartApi`] for the chart
//! being drawn and a [`ModelTree`] to read and write component options, and it
//! accepts registrations through [`EngineRegistry`].

use crate::component::{ComponentId, MapComponentModel};
use crate::dom::Element;
use crate::traits::CoordinateSystem;
use crate::Result;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Pipeline stage the engine re-runs after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdatePhase {
    /// Rebuild coordinate systems, layout and views
    Update,
    /// Re-run layout only, keeping the option tree
    UpdateLayout,
    /// Redraw views only
    UpdateView,
    None,
}

/// A named action the engine may dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub action_type: &'static str,
    /// Event emitted once the action ran
    pub event: &'static str,
    pub update: UpdatePhase,
}

/// A dispatched action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionPayload {
    pub action_type: String,
    pub component: Option<ComponentId>,
    pub data: Value,
}

impl ActionPayload {
    pub fn new(action_type: &str) -> Self {
        Self {
            action_type: action_type.to_string(),
            component: None,
            data: Value::Null,
        }
    }

    pub fn for_component(mut self, component: ComponentId) -> Self {
        self.component = Some(component);
        self
    }
}

/// Services of one chart instance
pub trait ChartApi {
    /// Chart width in pixels
    fn width(&self) -> f64;

    /// Chart height in pixels
    fn height(&self) -> f64;

    /// Element the chart was initialised in
    fn dom_root(&self) -> Element;

    /// The chart's rendering surface
    fn viewport_root(&self) -> Element;

    /// Runs the action's handler and the update phase it declares,
    /// synchronously
    fn dispatch_action(&self, action: ActionPayload);
}

/// The engine's option/model tree for one chart
pub trait ModelTree {
    /// Every map component, in declaration order
    fn map_components(&mut self) -> Vec<&mut MapComponentModel>;

    /// Binds every series declaring `coordinate_system` to `system`;
    /// returns how many series were bound
    fn bind_series(
        &mut self,
        coordinate_system: &str,
        system: Rc<RefCell<dyn CoordinateSystem>>,
    ) -> usize;
}

/// Builds coordinate systems when the engine lays a chart out
pub trait CoordinateSystemCreator {
    fn dimensions(&self) -> &'static [&'static str];

    fn create(&self, model: &mut dyn ModelTree, api: &Rc<dyn ChartApi>) -> Result<()>;
}

/// View side of a component type
pub trait ComponentView {
    fn render(&self, component: &MapComponentModel, api: &Rc<dyn ChartApi>) -> Result<()>;

    fn dispose(&self, _component: ComponentId) -> Result<()> {
        Ok(())
    }
}

/// Handler run when an action is dispatched
pub type ActionHandler = Rc<dyn Fn(&ActionPayload, &mut dyn ModelTree) -> Result<()>>;

/// Where extensions register themselves with the engine
pub trait EngineRegistry {
    fn register_coordinate_system(
        &mut self,
        name: &'static str,
        creator: Rc<dyn CoordinateSystemCreator>,
    );

    fn register_component_view(&mut self, component_type: &'static str, view: Rc<dyn ComponentView>);

    fn register_action(&mut self, descriptor: ActionDescriptor, handler: ActionHandler);
}
