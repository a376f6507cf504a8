//! Wires the map component into the charting engine.

use crate::component::{ComponentId, ComponentState, ComponentStates, MapComponentModel};
use crate::coord::{MapCoordinateSystem, SharedCoordinateSystem};
use crate::core::config::MapComponentOption;
use crate::core::constants::{
    COMPONENT_TYPE, COORDINATE_SYSTEM_NAME, MAP_CONTAINER_CLASS, ROAM_ACTION_TYPE, ROAM_EVENT_TYPE,
};
use crate::core::geo::{PixelOffset, Point};
use crate::dom::{set_position, Element};
use crate::engine::{
    ActionDescriptor, ActionHandler, ActionPayload, ChartApi, ComponentView,
    CoordinateSystemCreator, EngineRegistry, ModelTree, UpdatePhase,
};
use crate::layers::overlay::ChartOverlay;
use crate::sync::{apply_roam_mode, offset_from_surface, RoamSink, SyncPhase};
use crate::traits::CoordinateSystem;
use crate::widget::{LayerControl, MapLibrary, MapWidget};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// The map component as an engine extension.
///
/// Owns the map library handle and the per-component runtime state. Install
/// it once per engine with [`MapExtension::install`].
pub struct MapExtension {
    library: Rc<dyn MapLibrary>,
    states: Rc<RefCell<ComponentStates>>,
}

impl MapExtension {
    pub fn new(library: Rc<dyn MapLibrary>) -> Rc<Self> {
        Rc::new(Self {
            library,
            states: Rc::new(RefCell::new(ComponentStates::new())),
        })
    }

    /// Action dispatched whenever the user roams the map
    pub fn roam_action() -> ActionDescriptor {
        ActionDescriptor {
            action_type: ROAM_ACTION_TYPE,
            event: ROAM_EVENT_TYPE,
            update: UpdatePhase::UpdateLayout,
        }
    }

    /// Registers the coordinate system, the component view and the roam
    /// action with `registry`
    pub fn install(self: &Rc<Self>, registry: &mut dyn EngineRegistry) {
        registry.register_coordinate_system(
            COORDINATE_SYSTEM_NAME,
            Rc::clone(self) as Rc<dyn CoordinateSystemCreator>,
        );
        registry.register_component_view(COMPONENT_TYPE, Rc::clone(self) as Rc<dyn ComponentView>);

        let extension = Rc::downgrade(self);
        let handler: ActionHandler =
            Rc::new(move |payload: &ActionPayload, model: &mut dyn ModelTree| {
                match extension.upgrade() {
                    Some(extension) => extension.handle_roam(payload, model),
                    None => Ok(()),
                }
            });
        registry.register_action(Self::roam_action(), handler);
        log::debug!("Registered {} coordinate system", COORDINATE_SYSTEM_NAME);
    }

    /// Builds this draw cycle's coordinate system and binds series to it.
    ///
    /// The map widget is created the first time a component is seen and
    /// reused afterwards; the surface offset carries over between cycles.
    pub fn create_coordinate_systems(
        &self,
        model: &mut dyn ModelTree,
        api: &Rc<dyn ChartApi>,
    ) -> Result<()> {
        let mut created: Option<SharedCoordinateSystem> = None;

        for component in model.map_components() {
            if !self.library.is_available() {
                return Err(Error::LibraryUnavailable);
            }
            if created.is_some() {
                return Err(Error::DuplicateCoordinateSystem);
            }
            created = Some(self.create_for(component, api)?);
        }

        if let Some(system) = created {
            let system: Rc<RefCell<dyn CoordinateSystem>> = system;
            let bound = model.bind_series(COORDINATE_SYSTEM_NAME, system);
            log::debug!(
                "Bound {} series to the {} coordinate system",
                bound,
                COORDINATE_SYSTEM_NAME
            );
        }
        Ok(())
    }

    /// Sets up roaming for a component after its coordinate system exists
    pub fn render_component(
        &self,
        component: &MapComponentModel,
        api: &Rc<dyn ChartApi>,
    ) -> Result<()> {
        let id = component.id();
        let sink: Rc<dyn RoamSink> = Rc::new(ComponentRoamSink {
            component: id,
            states: Rc::downgrade(&self.states),
            api: Rc::downgrade(api),
        });

        let mut states = self.states.borrow_mut();
        let state = states.get_mut(id).ok_or(Error::UnknownComponent(id))?;
        state.synchronizer.begin();
        state
            .synchronizer
            .resubscribe(Rc::clone(&state.map), api.viewport_root(), sink);
        apply_roam_mode(state.map.as_ref(), component.option().roam);
        state.synchronizer.go_live();
        Ok(())
    }

    /// Copies each map's live view back onto its component option
    pub fn handle_roam(&self, _payload: &ActionPayload, model: &mut dyn ModelTree) -> Result<()> {
        for component in model.map_components() {
            let map = self.map_handle(component.id());
            if let Some(map) = map {
                component.set_center_and_zoom(map.center(), map.zoom());
            }
        }
        Ok(())
    }

    /// The cached map widget of a component
    pub fn map_handle(&self, id: ComponentId) -> Option<Rc<dyn MapWidget>> {
        self.states.borrow().get(id).map(|state| Rc::clone(&state.map))
    }

    /// Coordinate system built by the latest layout pass
    pub fn coordinate_system(&self, id: ComponentId) -> Option<SharedCoordinateSystem> {
        self.states
            .borrow()
            .get(id)
            .and_then(|state| state.coordinate_system.clone())
    }

    /// Offset persisted for a component
    pub fn map_offset(&self, id: ComponentId) -> Option<PixelOffset> {
        self.states.borrow().get(id).map(|state| state.offset)
    }

    pub fn phase(&self, id: ComponentId) -> Option<SyncPhase> {
        self.states.borrow().get(id).map(|state| state.synchronizer.phase())
    }

    pub fn is_subscribed(&self, id: ComponentId) -> bool {
        self.states
            .borrow()
            .get(id)
            .map_or(false, |state| state.synchronizer.is_subscribed())
    }

    /// Tears down a component: listeners, overlay, map container
    pub fn dispose(&self, id: ComponentId) -> Result<()> {
        let mut state = self
            .states
            .borrow_mut()
            .remove(id)
            .ok_or(Error::UnknownComponent(id))?;

        state.synchronizer.unsubscribe();
        // The container goes even if the overlay was already taken off the map
        let removed = state.map.remove_overlay(&state.overlay_id);
        state.map.container().remove();
        if let Err(err) = &removed {
            log::warn!("Disposing {}: {}", id, err);
        }
        log::info!("Disposed map widget of {}", id);
        removed
    }

    fn create_for(
        &self,
        component: &MapComponentModel,
        api: &Rc<dyn ChartApi>,
    ) -> Result<SharedCoordinateSystem> {
        let id = component.id();
        let option = component.option();
        option.validate()?;

        let map = self.ensure_map(id, option, api)?;

        if component.center_or_zoom_changed(map.center(), map.zoom()) {
            let guard = self
                .states
                .borrow()
                .get(id)
                .map(|state| state.synchronizer.suppress());
            map.set_view(option.center, option.zoom);
            drop(guard);

            // A view reset moves the panes back, so the surface follows
            let surface = api.viewport_root();
            let offset = offset_from_surface(&surface);
            set_position(&surface, Point::new(offset.dx, offset.dy));
            if let Some(state) = self.states.borrow_mut().get_mut(id) {
                state.offset = offset;
            }
        }

        let offset = self.map_offset(id).unwrap_or(PixelOffset::ZERO);
        let mut system = MapCoordinateSystem::new(Rc::clone(&map), Rc::clone(api));
        system.set_map_offset(offset);
        system.set_zoom(option.zoom);
        system.set_center(option.center);
        let system = system.into_shared();

        if let Some(state) = self.states.borrow_mut().get_mut(id) {
            state.coordinate_system = Some(Rc::clone(&system));
        }
        Ok(system)
    }

    fn ensure_map(
        &self,
        id: ComponentId,
        option: &MapComponentOption,
        api: &Rc<dyn ChartApi>,
    ) -> Result<Rc<dyn MapWidget>> {
        if let Some(map) = self.map_handle(id) {
            return Ok(map);
        }

        let root = api.dom_root();
        let surface = api.viewport_root();
        if let Some(stale) = root.query_class(MAP_CONTAINER_CLASS) {
            set_position(&surface, Point::default());
            stale.remove();
        }

        let container = Element::new("div").with_class(MAP_CONTAINER_CLASS);
        container.set_css_text("width:100%;height:100%");
        root.append_child(&container);
        let map = self.library.create_map(&container)?;

        let mut base_layers = IndexMap::new();
        for tile in &option.tiles {
            let layer = map.add_tile_layer(tile);
            if let Some(label) = &tile.label {
                base_layers.insert(label.clone(), layer);
            }
        }
        if option.wants_layer_control() {
            map.add_layer_control(LayerControl {
                base_layers,
                overlays: IndexMap::new(),
                options: option.layer_control.clone(),
            });
        }

        let overlay_id = format!("chart-overlay-{}", id.0);
        map.add_overlay(Rc::new(ChartOverlay::new(overlay_id.clone(), surface)))?;

        log::info!("Created map widget for {} with {} tile layers", id, option.tiles.len());
        self.states
            .borrow_mut()
            .insert(id, ComponentState::new(Rc::clone(&map), overlay_id));
        Ok(map)
    }
}

impl CoordinateSystemCreator for MapExtension {
    fn dimensions(&self) -> &'static [&'static str] {
        crate::coord::DIMENSIONS
    }

    fn create(&self, model: &mut dyn ModelTree, api: &Rc<dyn ChartApi>) -> Result<()> {
        self.create_coordinate_systems(model, api)
    }
}

impl ComponentView for MapExtension {
    fn render(&self, component: &MapComponentModel, api: &Rc<dyn ChartApi>) -> Result<()> {
        self.render_component(component, api)
    }

    fn dispose(&self, component: ComponentId) -> Result<()> {
        MapExtension::dispose(self, component)
    }
}

/// Routes a component's roam events back into its state and the engine.
///
/// Holds weak handles: the listeners it lives in are owned by the map widget,
/// which the states own in turn.
struct ComponentRoamSink {
    component: ComponentId,
    states: Weak<RefCell<ComponentStates>>,
    api: Weak<dyn ChartApi>,
}

impl RoamSink for ComponentRoamSink {
    fn apply_offset(&self, offset: PixelOffset) {
        let Some(states) = self.states.upgrade() else {
            return;
        };
        let system = match states.borrow_mut().get_mut(self.component) {
            Some(state) => {
                state.offset = offset;
                state.coordinate_system.clone()
            }
            None => return,
        };
        if let Some(system) = system {
            system.borrow_mut().set_map_offset(offset);
        }
    }

    fn roam_changed(&self) {
        if let Some(api) = self.api.upgrade() {
            api.dispatch_action(ActionPayload::new(ROAM_ACTION_TYPE).for_component(self.component));
        }
    }
}
