//! Prelude module for common geocanvas types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use geocanvas::prelude::*;`

pub use crate::core::{
    builder::MapBuilder,
    config::{MapConfig, RenderConfig, SourceConfig, ViewportConfig},
    geo::{LatLng, Point},
    map::{FrameOutcome, Map, RedrawTicket},
    projection::{project, unproject},
    viewport::{apply_pan, apply_zoom, Direction, Viewport, ZoomLimits},
};

pub use crate::data::{
    region::Region,
    source::{GeometrySource, HttpGeometrySource, StaticGeometrySource, ViewportQuery},
};

pub use crate::input::{
    events::{InputEvent, KeyCode, MapEvent},
    handler::{Action, DragState, EventManager, InputHandler, Subscription},
};

pub use crate::rendering::{
    color::{color_of, RegionColor},
    renderer::{FrameStats, RenderStyle, Renderer},
    surface::{Canvas, DoubleBuffer, Surface},
};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{Frame, MapSession, SessionHandle};

#[cfg(feature = "egui")]
pub use crate::ui::widget::MapWidget;

pub use crate::{Error as MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
