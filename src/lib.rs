//! # geocanvas
//!
//! A small, Rust-native world map renderer.
//!
//! The map is a fixed-size raster showing an equirectangular window onto the
//! globe. User gestures step the window around (clamped at the map edges),
//! every change re-queries a geometry source for the regions in view, and the
//! renderer repaints the whole frame from scratch into a double buffer.

pub mod core;
pub mod data;
pub mod input;
pub mod rendering;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
#[cfg(feature = "egui")]
pub mod ui;

pub mod prelude;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    builder::MapBuilder,
    config::MapConfig,
    geo::{LatLng, Point},
    map::{FrameOutcome, Map, RedrawTicket},
    projection::{project, unproject},
    viewport::{apply_pan, apply_zoom, Direction, Viewport, ZoomLimits},
};

pub use data::{
    region::Region,
    source::{GeometrySource, HttpGeometrySource, StaticGeometrySource, ViewportQuery},
};

pub use input::{
    events::{InputEvent, KeyCode, MapEvent},
    handler::{Action, InputHandler, Subscription},
};

pub use rendering::{
    color::{color_of, RegionColor},
    renderer::{FrameStats, RenderStyle, Renderer},
    surface::{Canvas, DoubleBuffer, Surface},
};

#[cfg(feature = "tokio-runtime")]
pub use runtime::{Frame, MapSession, SessionHandle};

#[cfg(feature = "egui")]
pub use ui::widget::MapWidget;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Map session closed")]
    SessionClosed,
}

/// Error type alias for convenience
pub type Error = MapError;
