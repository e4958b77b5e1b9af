use crate::core::geo::LatLng;
use crate::Result;
use geo::BoundingRect;
use geo_types::{MultiPoint, Point as GeoPoint, Rect};
use serde::{Deserialize, Serialize};

/// A named area made of one or more closed rings.
///
/// On the wire the rings are called `polygons`:
///
/// ```json
/// { "name": "France", "polygons": [[{ "lat": 51.1, "lon": 2.5 }, ...]] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(rename = "polygons", alias = "rings", default)]
    pub rings: Vec<Vec<LatLng>>,
}

impl Region {
    pub fn new(name: impl Into<String>, rings: Vec<Vec<LatLng>>) -> Self {
        Self {
            name: name.into(),
            rings,
        }
    }

    /// Total number of vertices over all rings
    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    /// Bounding box over every ring, `None` when the region has no vertices
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        let points: Vec<GeoPoint<f64>> = self
            .rings
            .iter()
            .flatten()
            .map(|coord| GeoPoint::from(geo_types::Coord::from(*coord)))
            .collect();
        MultiPoint::new(points).bounding_rect()
    }
}

/// Decodes a geometry response body
pub fn parse_regions(body: &[u8]) -> Result<Vec<Region>> {
    let regions: Vec<Region> = serde_json::from_slice(body)?;

    let invalid = regions
        .iter()
        .flat_map(|region| region.rings.iter().flatten())
        .filter(|coord| !coord.is_valid())
        .count();
    if invalid > 0 {
        log::debug!("geometry response has {} out-of-range coordinates", invalid);
    }

    Ok(regions)
}
