//! Configuration for the map view, renderer and geometry source
//!
//! Every section falls back to its defaults for missing fields, so a config
//! file only needs to name what it changes:
//!
//! ```json
//! { "render": { "width": 800, "height": 400 }, "source": { "base_url": "http://maps.local" } }
//! ```

use crate::{
    constants::*,
    core::{
        geo::LatLng,
        viewport::{Viewport, ZoomLimits},
    },
    rendering::color::RegionColor,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport: ViewportConfig,
    pub render: RenderConfig,
    pub source: SourceConfig,
}

impl MapConfig {
    /// Parses and validates a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("loaded map config from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.viewport.validate()?;
        self.render.validate()?;
        self.source.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Top-left anchor of the initial window
    pub initial_center: LatLng,
    pub extent_width: f64,
    pub extent_height: f64,
    pub pan_speed: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub zoom_limits: ZoomLimits,
}

impl ViewportConfig {
    /// Builds the initial, clamped viewport
    pub fn build(&self) -> Viewport {
        Viewport::with_options(
            self.initial_center,
            self.extent_width,
            self.extent_height,
            self.pan_speed,
            self.zoom_limits,
        )
    }

    fn validate(&self) -> Result<()> {
        if !(self.extent_width > 0.0 && self.extent_height > 0.0) {
            return Err(MapError::Config(format!(
                "viewport extents must be positive, got {}x{}",
                self.extent_width, self.extent_height
            )));
        }
        if !(self.pan_speed > 0.0 && self.pan_speed.is_finite()) {
            return Err(MapError::Config(format!(
                "pan speed must be positive, got {}",
                self.pan_speed
            )));
        }
        if !(self.zoom_in_factor > 0.0 && self.zoom_in_factor < 1.0) {
            return Err(MapError::Config(format!(
                "zoom-in factor must be in (0, 1), got {}",
                self.zoom_in_factor
            )));
        }
        if !(self.zoom_out_factor > 1.0 && self.zoom_out_factor.is_finite()) {
            return Err(MapError::Config(format!(
                "zoom-out factor must be greater than 1, got {}",
                self.zoom_out_factor
            )));
        }
        if !self.zoom_limits.is_valid() {
            return Err(MapError::Config(format!(
                "invalid zoom limits {:?}",
                self.zoom_limits
            )));
        }
        if !self.initial_center.lat.is_finite() || !self.initial_center.lng.is_finite() {
            return Err(MapError::InvalidCoordinates(format!(
                "{:?}",
                self.initial_center
            )));
        }
        Ok(())
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            initial_center: LatLng::new(INITIAL_CENTER_LAT, INITIAL_CENTER_LNG),
            extent_width: INITIAL_EXTENT_WIDTH,
            extent_height: INITIAL_EXTENT_HEIGHT,
            pan_speed: DEFAULT_PAN_SPEED,
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
            zoom_limits: ZoomLimits::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// `#rrggbb` or `#rgb`
    pub background: String,
    pub boundary: String,
    pub boundary_width: f32,
}

impl RenderConfig {
    pub fn background_color(&self) -> Result<RegionColor> {
        RegionColor::from_hex(&self.background)
    }

    pub fn boundary_color(&self) -> Result<RegionColor> {
        RegionColor::from_hex(&self.boundary)
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::Surface(format!(
                "surface must not be empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > u16::MAX as u32 || self.height > u16::MAX as u32 {
            return Err(MapError::Surface(format!(
                "surface is too large, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.boundary_width >= 0.0) {
            return Err(MapError::Config(format!(
                "boundary width must not be negative, got {}",
                self.boundary_width
            )));
        }
        self.background_color()?;
        self.boundary_color()?;
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            background: BACKGROUND_COLOR.to_string(),
            boundary: BOUNDARY_COLOR.to_string(),
            boundary_width: BOUNDARY_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(MapError::Config("source base_url is empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(MapError::Config("source timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}
