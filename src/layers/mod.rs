pub mod base;
pub mod overlay;
pub mod tile;

pub use base::{LayerProperties, LayerTrait};
pub use overlay::ChartOverlay;
pub use tile::{TileSource, TileTemplate};
