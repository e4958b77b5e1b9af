pub mod builder;
pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod projection;
pub mod viewport;

// Re-export the essential types
pub use builder::MapBuilder;
pub use config::{MapConfig, RenderConfig, SourceConfig, ViewportConfig};
pub use geo::{LatLng, Point};
pub use map::{FrameOutcome, Map, RedrawTicket};
pub use viewport::{Direction, Viewport, ZoomLimits};
