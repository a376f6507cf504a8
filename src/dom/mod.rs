//! Minimal element tree standing in for the host page.
//!
//! The chart's rendering surface, the map container and the widget's panes
//! are all [`Element`]s, so mounting and positioning can be driven (and
//! tested) without a browser.

pub mod element;
pub mod style;

pub use element::Element;
pub use style::{parse_translation, read_translation, set_position, translate3d};
