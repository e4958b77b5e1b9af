pub mod color;
pub mod renderer;
pub mod surface;

// Re-export main types
pub use color::{color_of, RegionColor};
pub use renderer::{FrameStats, Renderer, RenderStyle};
pub use surface::{Canvas, DoubleBuffer, Surface};
