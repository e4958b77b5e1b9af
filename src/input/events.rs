use crate::core::{geo::Point, viewport::Viewport};
use serde::{Deserialize, Serialize};

/// Input events fed into the map by the host UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer pressed: records the start position and arms drag tracking
    PointerDown { position: Point },
    /// Pointer moved; only acts while a drag is armed
    PointerMove { position: Point },
    /// Pointer released: disarms drag tracking
    PointerUp,
    /// Discrete key press
    KeyPress { key: KeyCode },
}

/// Keys the map reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Control,
    Shift,
    Other(u32),
}

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Viewport changed after a pan or zoom
    ViewChanged { viewport: Viewport },
    /// A fetched frame was drawn and presented
    FramePresented { generation: u64, regions: usize },
    /// A fetch resolved after the view had moved on
    FrameDiscarded { generation: u64 },
    /// A fetch failed; the previous frame stays on screen
    FetchFailed { generation: u64, message: String },
}

impl InputEvent {
    /// Gets the pointer position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position } | InputEvent::PointerMove { position } => {
                Some(*position)
            }
            _ => None,
        }
    }

    /// Checks if this is a pointer event
    pub fn is_pointer_event(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerDown { .. } | InputEvent::PointerMove { .. } | InputEvent::PointerUp
        )
    }

    /// Checks if this is a keyboard event
    pub fn is_keyboard_event(&self) -> bool {
        matches!(self, InputEvent::KeyPress { .. })
    }
}

impl MapEvent {
    /// Listener key for this event
    pub fn kind(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::FramePresented { .. } => "framepresented",
            MapEvent::FrameDiscarded { .. } => "framediscarded",
            MapEvent::FetchFailed { .. } => "fetchfailed",
        }
    }
}
