//! A small charting engine driving the map component the way a real one
//! would: layout builds coordinate systems, render calls component views,
//! and dispatched actions run their handler followed by the declared update.

#![allow(dead_code)]

use maplet_chart::component::{ComponentId, MapComponentModel, MapExtension};
use maplet_chart::dom::Element;
use maplet_chart::engine::{
    ActionDescriptor, ActionHandler, ActionPayload, ChartApi, ComponentView,
    CoordinateSystemCreator, EngineRegistry, ModelTree, UpdatePhase,
};
use maplet_chart::traits::CoordinateSystem;
use maplet_chart::widget::{HeadlessLibrary, HeadlessMap};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 600.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Series {
    pub coordinate_system: String,
    pub system: Option<Rc<RefCell<dyn CoordinateSystem>>>,
}

#[derive(Default)]
pub struct ChartModel {
    pub components: Vec<MapComponentModel>,
    pub series: Vec<Series>,
}

impl ModelTree for ChartModel {
    fn map_components(&mut self) -> Vec<&mut MapComponentModel> {
        self.components.iter_mut().collect()
    }

    fn bind_series(
        &mut self,
        coordinate_system: &str,
        system: Rc<RefCell<dyn CoordinateSystem>>,
    ) -> usize {
        let mut bound = 0;
        for series in &mut self.series {
            if series.coordinate_system == coordinate_system {
                series.system = Some(Rc::clone(&system));
                bound += 1;
            }
        }
        bound
    }
}

#[derive(Default)]
pub struct Registry {
    pub creators: Vec<(&'static str, Rc<dyn CoordinateSystemCreator>)>,
    pub views: Vec<(&'static str, Rc<dyn ComponentView>)>,
    pub actions: Vec<(ActionDescriptor, ActionHandler)>,
}

impl EngineRegistry for Registry {
    fn register_coordinate_system(
        &mut self,
        name: &'static str,
        creator: Rc<dyn CoordinateSystemCreator>,
    ) {
        self.creators.push((name, creator));
    }

    fn register_component_view(&mut self, component_type: &'static str, view: Rc<dyn ComponentView>) {
        self.views.push((component_type, view));
    }

    fn register_action(&mut self, descriptor: ActionDescriptor, handler: ActionHandler) {
        self.actions.push((descriptor, handler));
    }
}

pub struct FakeEngine {
    this: Weak<FakeEngine>,
    pub root: Element,
    pub surface: Element,
    pub model: RefCell<ChartModel>,
    pub registry: RefCell<Registry>,
    pub dispatched: RefCell<Vec<ActionPayload>>,
    next_component: RefCell<u64>,
}

impl FakeEngine {
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| {
            let root = Element::new("div");
            let surface = Element::new("div");
            root.append_child(&surface);
            FakeEngine {
                this: this.clone(),
                root,
                surface,
                model: RefCell::new(ChartModel::default()),
                registry: RefCell::new(Registry::default()),
                dispatched: RefCell::new(Vec::new()),
                next_component: RefCell::new(0),
            }
        })
    }

    pub fn api(&self) -> Rc<dyn ChartApi> {
        let engine: Rc<FakeEngine> = self.this.upgrade().expect("engine alive");
        engine
    }

    pub fn add_component(&self, option: Value) -> ComponentId {
        let id = {
            let mut next = self.next_component.borrow_mut();
            *next += 1;
            ComponentId(*next)
        };
        let model = MapComponentModel::from_json(id, &option).expect("valid option");
        self.model.borrow_mut().components.push(model);
        id
    }

    pub fn add_series(&self, coordinate_system: &str) {
        self.model.borrow_mut().series.push(Series {
            coordinate_system: coordinate_system.to_string(),
            system: None,
        });
    }

    pub fn component(&self, id: ComponentId) -> MapComponentModel {
        self.model
            .borrow()
            .components
            .iter()
            .find(|c| c.id() == id)
            .cloned()
            .expect("component exists")
    }

    pub fn merge_option(&self, id: ComponentId, patch: Value) {
        let mut model = self.model.borrow_mut();
        let component = model
            .components
            .iter_mut()
            .find(|c| c.id() == id)
            .expect("component exists");
        component.merge_option(&patch).expect("valid patch");
    }

    pub fn series_system(&self, index: usize) -> Option<Rc<RefCell<dyn CoordinateSystem>>> {
        self.model.borrow().series[index].system.clone()
    }

    /// Layout then render
    pub fn update(&self) -> maplet_chart::Result<()> {
        self.layout()?;
        self.render()
    }

    pub fn layout(&self) -> maplet_chart::Result<()> {
        let creators: Vec<_> = self
            .registry
            .borrow()
            .creators
            .iter()
            .map(|(_, creator)| Rc::clone(creator))
            .collect();
        let api = self.api();
        for creator in creators {
            creator.create(&mut *self.model.borrow_mut(), &api)?;
        }
        Ok(())
    }

    pub fn render(&self) -> maplet_chart::Result<()> {
        let views: Vec<_> = self
            .registry
            .borrow()
            .views
            .iter()
            .map(|(_, view)| Rc::clone(view))
            .collect();
        let components = self.model.borrow().components.clone();
        let api = self.api();
        for view in views {
            for component in &components {
                view.render(component, &api)?;
            }
        }
        Ok(())
    }

    pub fn dispatch_count(&self, action_type: &str) -> usize {
        self.dispatched
            .borrow()
            .iter()
            .filter(|a| a.action_type == action_type)
            .count()
    }
}

impl ChartApi for FakeEngine {
    fn width(&self) -> f64 {
        WIDTH
    }

    fn height(&self) -> f64 {
        HEIGHT
    }

    fn dom_root(&self) -> Element {
        self.root.clone()
    }

    fn viewport_root(&self) -> Element {
        self.surface.clone()
    }

    fn dispatch_action(&self, action: ActionPayload) {
        self.dispatched.borrow_mut().push(action.clone());

        let registered = self
            .registry
            .borrow()
            .actions
            .iter()
            .find(|(descriptor, _)| descriptor.action_type == action.action_type)
            .map(|(descriptor, handler)| (descriptor.clone(), Rc::clone(handler)));
        let Some((descriptor, handler)) = registered else {
            return;
        };

        handler(&action, &mut *self.model.borrow_mut()).expect("action handler");
        match descriptor.update {
            UpdatePhase::UpdateLayout => self.layout().expect("layout update"),
            UpdatePhase::Update => self.update().expect("full update"),
            UpdatePhase::UpdateView => self.render().expect("view update"),
            UpdatePhase::None => {}
        }
    }
}

pub struct Harness {
    pub engine: Rc<FakeEngine>,
    pub library: Rc<HeadlessLibrary>,
    pub extension: Rc<MapExtension>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_library(HeadlessLibrary::new(WIDTH, HEIGHT))
    }

    pub fn with_library(library: HeadlessLibrary) -> Self {
        init_logging();
        let engine = FakeEngine::new();
        let library = Rc::new(library);
        let extension = MapExtension::new(library.clone());
        extension.install(&mut *engine.registry.borrow_mut());
        Self {
            engine,
            library,
            extension,
        }
    }

    pub fn map(&self) -> Rc<HeadlessMap> {
        self.library.last_map().expect("map created")
    }
}
