use crate::input::events::{MapEvent, MapEventKind};
use crate::widget::MapWidget;
use fxhash::FxHashMap;
use std::rc::Rc;

/// Event listener callback type
pub type EventCallback = Rc<dyn Fn(&MapEvent)>;

/// Handle returned by [`EventManager::on`], used to detach the listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener registry for a map widget
#[derive(Default)]
pub struct EventManager {
    listeners: FxHashMap<MapEventKind, Vec<(ListenerId, EventCallback)>>,
    next_id: u64,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on(&mut self, kind: MapEventKind, callback: EventCallback) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.entry(kind).or_default().push((id, callback));
        id
    }

    /// Remove a listener; returns false if it was not attached
    pub fn off(&mut self, kind: MapEventKind, id: ListenerId) -> bool {
        match self.listeners.get_mut(&kind) {
            Some(callbacks) => {
                let before = callbacks.len();
                callbacks.retain(|(listener, _)| *listener != id);
                callbacks.len() != before
            }
            None => false,
        }
    }

    /// Snapshot of the callbacks for `kind`.
    ///
    /// Callers invoke the snapshot after releasing the registry, so listeners
    /// may attach or detach listeners while an event is being delivered.
    pub fn listeners(&self, kind: MapEventKind) -> Vec<EventCallback> {
        self.listeners
            .get(&kind)
            .map(|callbacks| callbacks.iter().map(|(_, cb)| Rc::clone(cb)).collect())
            .unwrap_or_default()
    }

    pub fn listener_count(&self, kind: MapEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

/// Listeners attached to one widget as a unit.
///
/// Dropping a subscription leaves its listeners attached; call
/// [`Subscription::revoke`] to detach them.
pub struct Subscription {
    map: Rc<dyn MapWidget>,
    entries: Vec<(MapEventKind, ListenerId)>,
}

impl Subscription {
    pub fn new(map: Rc<dyn MapWidget>) -> Self {
        Self {
            map,
            entries: Vec::new(),
        }
    }

    /// Attaches `callback` for `kind` and records it
    pub fn listen(&mut self, kind: MapEventKind, callback: EventCallback) {
        let id = self.map.on(kind, callback);
        self.entries.push((kind, id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_for(&self, map: &Rc<dyn MapWidget>) -> bool {
        Rc::ptr_eq(&self.map, map)
    }

    /// Detaches every recorded listener
    pub fn revoke(self) {
        for (kind, id) in self.entries {
            if !self.map.off(kind, id) {
                log::debug!("{} listener {:?} was already detached", kind, id);
            }
        }
    }
}
