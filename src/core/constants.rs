//! Core constants for the world map view.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default output surface width in pixels.
pub const DEFAULT_CANVAS_WIDTH: u32 = 1000;

/// Default output surface height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 500;

/// Requested latitude of the viewport's top edge at startup. Construction
/// clamps it to 90.
pub const INITIAL_CENTER_LAT: f64 = 100.0;

/// Requested longitude of the viewport's left edge at startup. With the
/// initial 200° width the clamp pulls it back to -20, so the first frame
/// spans 20°W to 180°.
pub const INITIAL_CENTER_LNG: f64 = 0.0;

/// Angular width of the viewport at startup, in degrees.
pub const INITIAL_EXTENT_WIDTH: f64 = 200.0;

/// Angular height of the viewport at startup, in degrees.
pub const INITIAL_EXTENT_HEIGHT: f64 = 100.0;

/// Fraction of the current extent moved by one discrete pan step.
pub const DEFAULT_PAN_SPEED: f64 = 0.005;

/// Extent multiplier applied by the zoom-in key.
pub const ZOOM_IN_FACTOR: f64 = 0.95;

/// Extent multiplier applied by the zoom-out key.
pub const ZOOM_OUT_FACTOR: f64 = 1.05;

/// Narrowest allowed viewport width, in degrees.
pub const MIN_EXTENT_WIDTH: f64 = 1.0;

/// Widest allowed viewport width, in degrees (the whole globe).
pub const MAX_EXTENT_WIDTH: f64 = 360.0;

/// Geographic bounds of the equirectangular plane.
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LNG: f64 = 180.0;
pub const MIN_LNG: f64 = -180.0;

/// Open water / unclaimed space.
pub const BACKGROUND_COLOR: &str = "#55a9ed";

/// Region outline color.
pub const BOUNDARY_COLOR: &str = "#000000";

/// Outline width in pixels.
pub const BOUNDARY_WIDTH: f32 = 1.0;

/// Multiplier spreading a name's code point sum across the color channels.
pub const COLOR_SPREAD: u64 = 12_345_678;

/// Default geometry endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Path of the country geometry query on the endpoint.
pub const COUNTRIES_PATH: &str = "/api/countries";

/// Default request timeout for geometry fetches.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
