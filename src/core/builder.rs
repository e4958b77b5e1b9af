//! Map builder for fluent API configuration
//!
//! This module provides a MapBuilder that starts from a [`MapConfig`] (or the
//! defaults) and lets callers override individual settings before building.

use crate::{
    core::{
        config::MapConfig,
        geo::LatLng,
        map::Map,
        viewport::ZoomLimits,
    },
    Result,
};

/// Builder for creating and configuring Map instances
#[derive(Debug, Clone, Default)]
pub struct MapBuilder {
    config: MapConfig,
}

impl MapBuilder {
    /// Create a new MapBuilder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: MapConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the render surface size in pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.render.width = width;
        self.config.render.height = height;
        self
    }

    /// Set the initial window: top-left anchor and extents in degrees
    pub fn with_initial_view(mut self, anchor: LatLng, extent_width: f64, extent_height: f64) -> Self {
        self.config.viewport.initial_center = anchor;
        self.config.viewport.extent_width = extent_width;
        self.config.viewport.extent_height = extent_height;
        self
    }

    /// Set the pan step as a fraction of the extent
    pub fn with_pan_speed(mut self, pan_speed: f64) -> Self {
        self.config.viewport.pan_speed = pan_speed;
        self
    }

    /// Set zoom-in and zoom-out factors
    pub fn with_zoom_factors(mut self, zoom_in: f64, zoom_out: f64) -> Self {
        self.config.viewport.zoom_in_factor = zoom_in;
        self.config.viewport.zoom_out_factor = zoom_out;
        self
    }

    /// Set zoom limits
    pub fn with_zoom_limits(mut self, limits: ZoomLimits) -> Self {
        self.config.viewport.zoom_limits = limits;
        self
    }

    /// Set background and boundary colors (`#rrggbb` or `#rgb`)
    pub fn with_colors(mut self, background: &str, boundary: &str) -> Self {
        self.config.render.background = background.to_string();
        self.config.render.boundary = boundary.to_string();
        self
    }

    pub fn with_boundary_width(mut self, width: f32) -> Self {
        self.config.render.boundary_width = width;
        self
    }

    /// Set the geometry endpoint base URL
    pub fn with_endpoint(mut self, base_url: impl Into<String>) -> Self {
        self.config.source.base_url = base_url.into();
        self
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Consume the builder, returning the validated configuration
    pub fn into_config(self) -> Result<MapConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build the map
    pub fn build(self) -> Result<Map> {
        Map::new(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;

    #[test]
    fn test_builder_defaults() {
        let map = MapBuilder::new().build().unwrap();

        assert_eq!(map.viewport().center_lat(), 90.0);
        assert_eq!(map.viewport().center_lng(), -20.0);
        assert_eq!(map.front().width(), 1000);
        assert_eq!(map.front().height(), 500);
    }

    #[test]
    fn test_builder_overrides() {
        let map = MapBuilder::new()
            .with_size(400, 200)
            .with_initial_view(LatLng::new(60.0, -10.0), 40.0, 20.0)
            .with_zoom_factors(0.5, 2.0)
            .with_colors("#000", "#fff")
            .build()
            .unwrap();

        assert_eq!(map.front().width(), 400);
        assert_eq!(map.viewport().extent_width(), 40.0);
        assert_eq!(map.input_handler().zoom_in_factor, 0.5);
        assert_eq!(map.renderer().style().boundary.to_hex(), "#ffffff");
    }

    #[test]
    fn test_builder_rejects_invalid_settings() {
        let result = MapBuilder::new().with_pan_speed(-1.0).build();
        assert!(matches!(result, Err(MapError::Config(_))));

        let result = MapBuilder::new().with_endpoint("").into_config();
        assert!(result.is_err());
    }
}
