//! The map component: option model, runtime state and engine binding.

pub mod extension;
pub mod model;
pub mod state;

pub use extension::MapExtension;
pub use model::{ComponentId, MapComponentModel};
pub use state::{ComponentState, ComponentStates};
