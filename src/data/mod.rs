pub mod region;
pub mod source;

// Re-exports for convenience
pub use region::{parse_regions, Region};
pub use source::{GeometrySource, HttpGeometrySource, StaticGeometrySource, ViewportQuery};
