//! Keeps the chart in step with the map while the user roams.

pub mod view;

pub use view::{apply_roam_mode, offset_from_surface, PhaseGuard, RoamSink, SyncPhase, ViewSynchronizer};
