//! Geometry models for geofence-geo.
//!
//! This module re-exports canonical types from `geofence-core` and provides
//! conversions to and from the `geo` crate.

use geo::Centroid;

// Re-export canonical types from geofence-core
pub use geofence_core::models::{Coordinate, ValidityMode, ZoneShape};

/// Convert a coordinate to a geo::Coord (x = longitude, y = latitude)
pub fn to_geo_coord(coord: Coordinate) -> geo::Coord<f64> {
    geo::Coord { x: coord.lng, y: coord.lat }
}

/// Convert a geo::Coord back to a coordinate
pub fn from_geo_coord(coord: geo::Coord<f64>) -> Coordinate {
    Coordinate::new(coord.x, coord.y)
}

/// Convert a coordinate to a geo::Point
pub fn to_geo_point(coord: Coordinate) -> geo::Point<f64> {
    geo::Point::from(to_geo_coord(coord))
}

/// Convert an open ring to a closed geo::Polygon without holes
pub fn to_geo_polygon(ring: &[Coordinate]) -> geo::Polygon<f64> {
    let coords: Vec<geo::Coord<f64>> = ring.iter().copied().map(to_geo_coord).collect();
    geo::Polygon::new(geo::LineString::new(coords), vec![])
}

/// Representative center of a zone
///
/// The circle center, or the polygon centroid. `None` for an empty or
/// collapsed polygon.
pub fn shape_center(shape: &ZoneShape) -> Option<Coordinate> {
    match shape {
        ZoneShape::Circle { center, .. } => Some(*center),
        ZoneShape::Polygon { ring } => {
            to_geo_polygon(ring).centroid().map(|p| from_geo_coord(p.0))
        }
    }
}
