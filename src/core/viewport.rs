use crate::constants::{
    DEFAULT_PAN_SPEED, MAX_EXTENT_WIDTH, MAX_LAT, MAX_LNG, MIN_EXTENT_WIDTH, MIN_LAT, MIN_LNG,
};
use crate::core::geo::{LatLng, Point};
use crate::core::projection;
use serde::{Deserialize, Serialize};

/// Manages the current view of the map: its anchor and angular extents.
///
/// The anchor (`center_lat`, `center_lng`) is the top-left corner of the
/// window: the view extends `extent_height` degrees south of `center_lat` and
/// `extent_width` degrees east of `center_lng`. Every mutator re-applies
/// [`Viewport::clamp`] so the window never leaves the equirectangular plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ViewportState")]
pub struct Viewport {
    center_lat: f64,
    center_lng: f64,
    extent_width: f64,
    extent_height: f64,
    /// Fraction of the current extent moved by one pan step
    pan_speed: f64,
    zoom_limits: ZoomLimits,
}

/// Deserialized form of a [`Viewport`], fitted and clamped on conversion
#[derive(Deserialize)]
struct ViewportState {
    center_lat: f64,
    center_lng: f64,
    extent_width: f64,
    extent_height: f64,
    #[serde(default = "default_pan_speed")]
    pan_speed: f64,
    #[serde(default)]
    zoom_limits: ZoomLimits,
}

fn default_pan_speed() -> f64 {
    DEFAULT_PAN_SPEED
}

impl From<ViewportState> for Viewport {
    fn from(state: ViewportState) -> Self {
        let zoom_limits = if state.zoom_limits.is_valid() {
            state.zoom_limits
        } else {
            log::warn!("replacing invalid zoom limits {:?}", state.zoom_limits);
            ZoomLimits::default()
        };
        Viewport::with_options(
            LatLng::new(state.center_lat, state.center_lng),
            state.extent_width,
            state.extent_height,
            state.pan_speed,
            zoom_limits,
        )
    }
}

/// Allowed range for the viewport's angular width.
///
/// The height follows the width through the zoom factor, so the aspect ratio
/// set at construction is kept for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min_width: f64,
    pub max_width: f64,
}

impl ZoomLimits {
    pub fn new(min_width: f64, max_width: f64) -> Self {
        Self {
            min_width,
            max_width,
        }
    }

    /// Limits that never constrain a positive finite width
    pub fn unbounded() -> Self {
        Self::new(f64::MIN_POSITIVE, f64::MAX)
    }

    pub fn is_valid(&self) -> bool {
        self.min_width > 0.0 && self.min_width <= self.max_width
    }

    /// Clamps a width into the limits; invalid limits leave it untouched
    fn clamp_width(&self, width: f64) -> f64 {
        if self.is_valid() {
            width.clamp(self.min_width, self.max_width)
        } else {
            width
        }
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self::new(MIN_EXTENT_WIDTH, MAX_EXTENT_WIDTH)
    }
}

/// One discrete pan step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Viewport {
    /// Creates a new viewport with default pan speed and zoom limits
    pub fn new(center: LatLng, extent_width: f64, extent_height: f64) -> Self {
        Self::with_options(
            center,
            extent_width,
            extent_height,
            DEFAULT_PAN_SPEED,
            ZoomLimits::default(),
        )
    }

    /// Creates a new viewport, fitting the extents to `zoom_limits` and
    /// clamping the anchor to the map edges
    pub fn with_options(
        center: LatLng,
        extent_width: f64,
        extent_height: f64,
        pan_speed: f64,
        zoom_limits: ZoomLimits,
    ) -> Self {
        let mut viewport = Self {
            center_lat: center.lat,
            center_lng: center.lng,
            extent_width,
            extent_height,
            pan_speed,
            zoom_limits,
        };
        viewport.fit_extents();
        viewport.clamp();
        viewport
    }

    /// Raw state without fitting or clamping, for exercising the clamp itself
    #[cfg(test)]
    pub(crate) fn unclamped(center_lat: f64, center_lng: f64, width: f64, height: f64) -> Self {
        Self {
            center_lat,
            center_lng,
            extent_width: width,
            extent_height: height,
            pan_speed: DEFAULT_PAN_SPEED,
            zoom_limits: ZoomLimits::unbounded(),
        }
    }

    /// Latitude of the top edge
    pub fn center_lat(&self) -> f64 {
        self.center_lat
    }

    /// Longitude of the left edge
    pub fn center_lng(&self) -> f64 {
        self.center_lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(self.center_lat, self.center_lng)
    }

    pub fn extent_width(&self) -> f64 {
        self.extent_width
    }

    pub fn extent_height(&self) -> f64 {
        self.extent_height
    }

    pub fn pan_speed(&self) -> f64 {
        self.pan_speed
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        self.zoom_limits
    }

    /// Latitude of the bottom edge
    pub fn south(&self) -> f64 {
        self.center_lat - self.extent_height
    }

    /// Longitude of the right edge
    pub fn east(&self) -> f64 {
        self.center_lng + self.extent_width
    }

    /// Re-establishes the edge invariants.
    ///
    /// The bottom edge wins over the top edge and the right edge wins over the
    /// left one when the extent is larger than the whole plane.
    pub fn clamp(&mut self) {
        if self.center_lat > MAX_LAT {
            self.center_lat = MAX_LAT;
        }
        if self.center_lat - self.extent_height < MIN_LAT {
            self.center_lat = MIN_LAT + self.extent_height;
        }

        if self.center_lng < MIN_LNG {
            self.center_lng = MIN_LNG;
        }
        if self.center_lng + self.extent_width > MAX_LNG {
            self.center_lng = MAX_LNG - self.extent_width;
        }
    }

    /// Moves one discrete step, scaled by the current extents
    pub fn step(&mut self, direction: Direction) {
        let step_lng = self.pan_speed * self.extent_width;
        let step_lat = self.pan_speed * self.extent_height;

        match direction {
            Direction::North => self.center_lat += step_lat,
            Direction::South => self.center_lat -= step_lat,
            Direction::East => self.center_lng += step_lng,
            Direction::West => self.center_lng -= step_lng,
        }
        self.clamp();
    }

    /// Turns a drag delta into at most one step per axis.
    ///
    /// Only the sign of each component counts: dragging right moves the view
    /// west, dragging down moves it north. Returns whether any step was taken.
    pub fn pan_by_gesture(&mut self, dx: f64, dy: f64) -> bool {
        let mut moved = false;

        if dx > 0.0 {
            self.step(Direction::West);
            moved = true;
        } else if dx < 0.0 {
            self.step(Direction::East);
            moved = true;
        }

        if dy > 0.0 {
            self.step(Direction::North);
            moved = true;
        } else if dy < 0.0 {
            self.step(Direction::South);
            moved = true;
        }

        moved
    }

    /// Scales both extents by `factor` (below 1 zooms in), then re-clamps the
    /// anchor since a wider window may no longer fit where it was.
    ///
    /// Returns false when the factor is unusable or fully absorbed by the
    /// zoom limits.
    pub fn zoom(&mut self, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("ignoring invalid zoom factor {}", factor);
            return false;
        }

        let width = self.zoom_limits.clamp_width(self.extent_width * factor);
        if width == self.extent_width {
            log::debug!("zoom limit reached at width {:.3}", self.extent_width);
            return false;
        }

        self.resize_width(width);
        self.clamp();
        true
    }

    /// Sets the zoom limits, refitting the current extents if needed
    pub fn set_zoom_limits(&mut self, zoom_limits: ZoomLimits) {
        self.zoom_limits = zoom_limits;
        self.fit_extents();
        self.clamp();
    }

    fn fit_extents(&mut self) {
        let width = self.zoom_limits.clamp_width(self.extent_width);
        if width != self.extent_width {
            self.resize_width(width);
        }
    }

    /// Sets the width and scales the height by the same ratio
    fn resize_width(&mut self, width: f64) {
        self.extent_height *= width / self.extent_width;
        self.extent_width = width;
    }

    /// Projects a coordinate onto a `size.x` × `size.y` surface
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng, size: Point) -> Point {
        projection::project(lat_lng, self, size.x, size.y)
    }

    /// Converts a surface pixel back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point, size: Point) -> LatLng {
        projection::unproject(pixel, self, size.x, size.y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        use crate::constants::{
            INITIAL_CENTER_LAT, INITIAL_CENTER_LNG, INITIAL_EXTENT_HEIGHT, INITIAL_EXTENT_WIDTH,
        };
        Self::new(
            LatLng::new(INITIAL_CENTER_LAT, INITIAL_CENTER_LNG),
            INITIAL_EXTENT_WIDTH,
            INITIAL_EXTENT_HEIGHT,
        )
    }
}

/// Pure pan transition: returns the state after a drag gesture
pub fn apply_pan(viewport: &Viewport, dx: f64, dy: f64) -> Viewport {
    let mut next = viewport.clone();
    next.pan_by_gesture(dx, dy);
    next
}

/// Pure zoom transition: returns the state after scaling the extents
pub fn apply_zoom(viewport: &Viewport, factor: f64) -> Viewport {
    let mut next = viewport.clone();
    next.zoom(factor);
    next
}
