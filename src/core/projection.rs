//! Equirectangular projection between geographic and surface coordinates.
//!
//! The mapping is affine: longitude grows to the right, latitude grows upward
//! on the globe and downward on the raster. There is no wraparound at the
//! ±180° seam, so a ring crossing it is drawn stretched across the view.

use crate::core::geo::{LatLng, Point};
use crate::core::viewport::Viewport;

/// Projects a coordinate onto a `width` × `height` surface
pub fn project(coord: &LatLng, viewport: &Viewport, width: f64, height: f64) -> Point {
    let x = (coord.lng - viewport.center_lng()) * width / viewport.extent_width();
    let y = (viewport.center_lat() - coord.lat) * height / viewport.extent_height();
    Point::new(x, y)
}

/// Inverse of [`project`]
pub fn unproject(point: &Point, viewport: &Viewport, width: f64, height: f64) -> LatLng {
    let lng = viewport.center_lng() + point.x * viewport.extent_width() / width;
    let lat = viewport.center_lat() - point.y * viewport.extent_height() / height;
    LatLng::new(lat, lng)
}

/// Projects every vertex of a ring, keeping order
pub fn project_ring(ring: &[LatLng], viewport: &Viewport, width: f64, height: f64) -> Vec<Point> {
    ring.iter()
        .map(|coord| project(coord, viewport, width, height))
        .collect()
}
