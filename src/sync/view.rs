use crate::core::config::RoamMode;
use crate::core::geo::{PixelOffset, Point};
use crate::dom::{read_translation, set_position, Element};
use crate::input::{EventCallback, MapEvent, MapEventKind, Subscription};
use crate::widget::{InteractionHandler, MapWidget};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Lifecycle of a synchronizer within one render call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Render in progress; roam events have no visible effect
    Initializing,
    /// Setup finished; roam events move the chart and notify the engine
    Live,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPhase::Initializing => f.write_str("initializing"),
            SyncPhase::Live => f.write_str("live"),
        }
    }
}

/// Receives what the synchronizer derives from a roam
pub trait RoamSink {
    /// Persists a new surface offset and forwards it to the coordinate system
    fn apply_offset(&self, offset: PixelOffset);

    /// Notifies the engine that the map view moved
    fn roam_changed(&self);
}

/// Restores the previous phase when dropped
pub struct PhaseGuard {
    phase: Rc<Cell<SyncPhase>>,
    previous: SyncPhase,
}

impl Drop for PhaseGuard {
    fn drop(&mut self) {
        self.phase.set(self.previous);
    }
}

/// Keeps the chart surface aligned with the map while the user roams.
///
/// Each render call goes through `begin` → `resubscribe` → `go_live`. Listener
/// handles are owned here, so resubscribing always detaches the previous set
/// before attaching the next one.
pub struct ViewSynchronizer {
    phase: Rc<Cell<SyncPhase>>,
    subscription: Option<Subscription>,
}

impl ViewSynchronizer {
    pub fn new() -> Self {
        Self {
            phase: Rc::new(Cell::new(SyncPhase::Initializing)),
            subscription: None,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase.get()
    }

    pub fn is_live(&self) -> bool {
        self.phase.get() == SyncPhase::Live
    }

    /// Enters `Initializing` at the start of a render call
    pub fn begin(&self) {
        if self.phase.replace(SyncPhase::Initializing) != SyncPhase::Initializing {
            log::debug!("View synchronizer suspended for render");
        }
    }

    /// Enters `Live` once listeners and gestures are set up
    pub fn go_live(&self) {
        if self.phase.replace(SyncPhase::Live) != SyncPhase::Live {
            log::debug!("View synchronizer live");
        }
    }

    /// Holds the synchronizer in `Initializing` until the guard drops.
    ///
    /// Used around programmatic view changes so their events do not feed
    /// back into the engine.
    pub fn suppress(&self) -> PhaseGuard {
        let previous = self.phase.replace(SyncPhase::Initializing);
        PhaseGuard {
            phase: Rc::clone(&self.phase),
            previous,
        }
    }

    /// Replaces the listeners on `map` with a fresh set bound to `surface`
    pub fn resubscribe(&mut self, map: Rc<dyn MapWidget>, surface: Element, sink: Rc<dyn RoamSink>) {
        self.unsubscribe();

        let mut subscription = Subscription::new(map);
        let on_move = self.offset_handler(surface.clone(), Rc::clone(&sink));
        subscription.listen(MapEventKind::Move, on_move);
        let on_zoom = self.offset_handler(surface, Rc::clone(&sink));
        subscription.listen(MapEventKind::Zoom, on_zoom);

        let phase = Rc::clone(&self.phase);
        subscription.listen(
            MapEventKind::ZoomEnd,
            Rc::new(move |_: &MapEvent| {
                if phase.get() == SyncPhase::Live {
                    sink.roam_changed();
                }
            }),
        );

        log::debug!("View synchronizer attached {} listeners", subscription.len());
        self.subscription = Some(subscription);
    }

    /// Detaches the current listeners, if any
    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.revoke();
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    fn offset_handler(&self, surface: Element, sink: Rc<dyn RoamSink>) -> EventCallback {
        let phase = Rc::clone(&self.phase);
        Rc::new(move |_: &MapEvent| {
            if phase.get() != SyncPhase::Live {
                return;
            }
            let offset = offset_from_surface(&surface);
            set_position(&surface, Point::new(offset.dx, offset.dy));
            log::debug!("Map roamed, surface offset now [{}, {}]", offset.dx, offset.dy);
            sink.apply_offset(offset);
            sink.roam_changed();
        })
    }
}

impl Default for ViewSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewSynchronizer {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Offset of the chart surface against the map's layer space.
///
/// The surface sits in the overlay pane inside the map pane; the map pane is
/// what panning translates, and the surface has to move the opposite way.
pub fn offset_from_surface(surface: &Element) -> PixelOffset {
    let translation = surface
        .ancestor(2)
        .map(|pane| read_translation(&pane))
        .unwrap_or_default();
    PixelOffset::from_translation(translation.x, translation.y)
}

/// Switches the widget's gesture handlers to match `roam`
pub fn apply_roam_mode(map: &dyn MapWidget, roam: RoamMode) {
    map.set_handler_enabled(InteractionHandler::Dragging, roam.allows_drag());
    for handler in InteractionHandler::ZOOM {
        map.set_handler_enabled(handler, roam.allows_zoom());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::GeoPoint;
    use crate::widget::HeadlessMap;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        offsets: RefCell<Vec<PixelOffset>>,
        dispatches: Cell<usize>,
    }

    impl RoamSink for RecordingSink {
        fn apply_offset(&self, offset: PixelOffset) {
            self.offsets.borrow_mut().push(offset);
        }

        fn roam_changed(&self) {
            self.dispatches.set(self.dispatches.get() + 1);
        }
    }

    fn mounted_map() -> (Rc<HeadlessMap>, Element) {
        let map = Rc::new(HeadlessMap::new(Element::new("div"), 400.0, 300.0));
        let surface = Element::new("div");
        map.pane("overlayPane").unwrap().append_child(&surface);
        (map, surface)
    }

    fn move_event() -> MapEvent {
        MapEvent::Move {
            center: GeoPoint::default(),
            zoom: 0.0,
        }
    }

    #[test]
    fn test_initializing_suppresses_dispatch() {
        let (map, surface) = mounted_map();
        let sink = Rc::new(RecordingSink::default());
        let mut sync = ViewSynchronizer::new();

        sync.begin();
        sync.resubscribe(map.clone(), surface, sink.clone());
        map.fire(move_event());
        assert_eq!(sink.dispatches.get(), 0);
        assert!(sink.offsets.borrow().is_empty());

        sync.go_live();
        map.fire(move_event());
        assert_eq!(sink.dispatches.get(), 1);
    }

    #[test]
    fn test_move_reads_map_pane_translation() {
        let (map, surface) = mounted_map();
        let sink = Rc::new(RecordingSink::default());
        let mut sync = ViewSynchronizer::new();
        sync.resubscribe(map.clone(), surface.clone(), sink.clone());
        sync.go_live();

        map.pane("mapPane")
            .unwrap()
            .set_style("transform", "translate3d(-20px, -15px, 0)");
        map.fire(move_event());

        assert_eq!(*sink.offsets.borrow(), vec![PixelOffset::new(20.0, 15.0)]);
        assert_eq!(surface.style("left").as_deref(), Some("20px"));
        assert_eq!(surface.style("top").as_deref(), Some("15px"));
    }

    #[test]
    fn test_zoomend_dispatches_without_offset() {
        let (map, surface) = mounted_map();
        let sink = Rc::new(RecordingSink::default());
        let mut sync = ViewSynchronizer::new();
        sync.resubscribe(map.clone(), surface, sink.clone());
        sync.go_live();

        map.fire(MapEvent::ZoomEnd { zoom: 3.0 });
        assert_eq!(sink.dispatches.get(), 1);
        assert!(sink.offsets.borrow().is_empty());
    }

    #[test]
    fn test_resubscribe_replaces_listeners() {
        let (map, surface) = mounted_map();
        let sink = Rc::new(RecordingSink::default());
        let mut sync = ViewSynchronizer::new();

        for _ in 0..3 {
            sync.begin();
            sync.resubscribe(map.clone(), surface.clone(), sink.clone());
            sync.go_live();
        }
        for kind in MapEventKind::ALL {
            assert_eq!(map.listener_count(kind), 1);
        }

        map.fire(move_event());
        assert_eq!(sink.dispatches.get(), 1);

        sync.unsubscribe();
        assert!(!sync.is_subscribed());
        for kind in MapEventKind::ALL {
            assert_eq!(map.listener_count(kind), 0);
        }
    }

    #[test]
    fn test_suppress_restores_phase() {
        let sync = ViewSynchronizer::new();
        sync.go_live();
        {
            let _guard = sync.suppress();
            assert_eq!(sync.phase(), SyncPhase::Initializing);
        }
        assert_eq!(sync.phase(), SyncPhase::Live);
    }

    #[test]
    fn test_roam_mode_gating() {
        let map = HeadlessMap::new(Element::new("div"), 100.0, 100.0);
        let cases = [
            (RoamMode::Disabled, false, false),
            (RoamMode::Enabled, true, true),
            (RoamMode::Move, true, false),
            (RoamMode::Scale, false, true),
        ];
        for (mode, drag, zoom) in cases {
            apply_roam_mode(&map, mode);
            assert_eq!(map.handler_enabled(InteractionHandler::Dragging), drag);
            for handler in InteractionHandler::ZOOM {
                assert_eq!(map.handler_enabled(handler), zoom, "{:?} {}", mode, handler);
            }
        }
    }

    #[test]
    fn test_offset_without_pane_is_zero() {
        let surface = Element::new("div");
        assert_eq!(offset_from_surface(&surface), PixelOffset::ZERO);
    }
}
