//! Runtime state of map components, kept beside the option model.

use crate::component::ComponentId;
use crate::coord::SharedCoordinateSystem;
use crate::core::geo::PixelOffset;
use crate::sync::ViewSynchronizer;
use crate::widget::MapWidget;
use fxhash::FxHashMap;
use std::rc::Rc;

/// What one component carries between draw cycles.
///
/// Created the first time the component's coordinate system is built and
/// dropped when the component is disposed.
pub struct ComponentState {
    pub map: Rc<dyn MapWidget>,
    /// Last offset applied to the chart surface
    pub offset: PixelOffset,
    /// System built by the latest layout pass
    pub coordinate_system: Option<SharedCoordinateSystem>,
    pub overlay_id: String,
    pub synchronizer: ViewSynchronizer,
}

impl ComponentState {
    pub fn new(map: Rc<dyn MapWidget>, overlay_id: String) -> Self {
        Self {
            map,
            offset: PixelOffset::ZERO,
            coordinate_system: None,
            overlay_id,
            synchronizer: ViewSynchronizer::new(),
        }
    }
}

/// Side table of component states keyed by component identity
#[derive(Default)]
pub struct ComponentStates {
    entries: FxHashMap<ComponentId, ComponentState>,
}

impl ComponentStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ComponentId) -> Option<&ComponentState> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut ComponentState> {
        self.entries.get_mut(&id)
    }

    pub fn insert(&mut self, id: ComponentId, state: ComponentState) {
        self.entries.insert(id, state);
    }

    pub fn remove(&mut self, id: ComponentId) -> Option<ComponentState> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<ComponentId> {
        let mut ids: Vec<_> = self.entries.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::widget::HeadlessMap;

    #[test]
    fn test_lifecycle() {
        let mut states = ComponentStates::new();
        assert!(states.is_empty());

        let map: Rc<dyn MapWidget> = Rc::new(HeadlessMap::new(Element::new("div"), 10.0, 10.0));
        states.insert(ComponentId(2), ComponentState::new(map.clone(), "a".to_string()));
        states.insert(ComponentId(1), ComponentState::new(map, "b".to_string()));
        assert_eq!(states.ids(), vec![ComponentId(1), ComponentId(2)]);

        states.get_mut(ComponentId(1)).unwrap().offset = PixelOffset::new(3.0, 4.0);
        assert_eq!(states.get(ComponentId(1)).unwrap().offset, PixelOffset::new(3.0, 4.0));

        assert!(states.remove(ComponentId(1)).is_some());
        assert!(!states.contains(ComponentId(1)));
        assert_eq!(states.len(), 1);
    }
}
