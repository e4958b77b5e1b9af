use crate::{
    constants::COUNTRIES_PATH,
    core::{config::SourceConfig, viewport::Viewport},
    data::region::{parse_regions, Region},
    MapError, Result,
};
use async_trait::async_trait;
use geo::Intersects;
use geo_types::{coord, Rect};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Shared HTTP client. Building the client once avoids the cost of TLS and
/// connection pool setup for every redraw.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("geocanvas/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default HTTP client: {}", e);
            Client::new()
        })
});

/// The four numbers a geometry request is parameterised by
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportQuery {
    pub lat: f64,
    pub lon: f64,
    pub pov_width: f64,
    pub pov_height: f64,
}

impl ViewportQuery {
    /// Geographic window covered by the query (x = longitude, y = latitude)
    pub fn window(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.lon, y: self.lat - self.pov_height },
            coord! { x: self.lon + self.pov_width, y: self.lat },
        )
    }
}

impl From<&Viewport> for ViewportQuery {
    fn from(viewport: &Viewport) -> Self {
        Self {
            lat: viewport.center_lat(),
            lon: viewport.center_lng(),
            pov_width: viewport.extent_width(),
            pov_height: viewport.extent_height(),
        }
    }
}

/// Anything that can produce the regions covering a viewport
#[async_trait]
pub trait GeometrySource: Send + Sync {
    async fn fetch(&self, query: ViewportQuery) -> Result<Vec<Region>>;
}

#[async_trait]
impl<S: GeometrySource + ?Sized> GeometrySource for std::sync::Arc<S> {
    async fn fetch(&self, query: ViewportQuery) -> Result<Vec<Region>> {
        (**self).fetch(query).await
    }
}

/// Queries the country geometry endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpGeometrySource {
    base_url: String,
    timeout: Duration,
}

impl HttpGeometrySource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(&SourceConfig {
            base_url: base_url.into(),
            ..SourceConfig::default()
        })
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, COUNTRIES_PATH)
    }
}

#[async_trait]
impl GeometrySource for HttpGeometrySource {
    async fn fetch(&self, query: ViewportQuery) -> Result<Vec<Region>> {
        log::debug!("fetching geometry for {:?}", query);

        let response = HTTP_CLIENT
            .get(self.endpoint())
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MapError::Fetch(format!(
                "{} returned HTTP {}",
                self.endpoint(),
                response.status()
            )));
        }

        let body = response.bytes().await?;
        let regions = parse_regions(&body)?;
        log::debug!("received {} regions ({} bytes)", regions.len(), body.len());
        Ok(regions)
    }
}

/// Serves a fixed region set, culled to the queried window
#[derive(Debug, Clone, Default)]
pub struct StaticGeometrySource {
    regions: Vec<Region>,
}

impl StaticGeometrySource {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Loads a JSON array of regions in the endpoint's format
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let body = std::fs::read(path.as_ref())?;
        let regions = parse_regions(&body)?;
        log::info!(
            "loaded {} regions from {}",
            regions.len(),
            path.as_ref().display()
        );
        Ok(Self::new(regions))
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Regions whose bounding box touches the window. Regions without any
    /// vertex are passed through for the renderer to skip.
    pub fn regions_in(&self, query: &ViewportQuery) -> Vec<Region> {
        let window = query.window();
        self.regions
            .iter()
            .filter(|region| {
                region
                    .bounding_rect()
                    .map_or(true, |rect| rect.intersects(&window))
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GeometrySource for StaticGeometrySource {
    async fn fetch(&self, query: ViewportQuery) -> Result<Vec<Region>> {
        Ok(self.regions_in(&query))
    }
}
