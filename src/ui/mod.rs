//! egui integration

pub mod widget;

pub use widget::{MapWidget, MapWidgetExt};
