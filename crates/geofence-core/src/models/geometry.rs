//! Zone geometry types shared by all geofence crates.
//!
//! Coordinates are always `(longitude, latitude)` in decimal degrees, matching
//! the `[lng, lat]` pair order used by GeoJSON and by the zone records stored
//! in the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(longitude, latitude)` pair in decimal degrees
///
/// Serialized as a two-element `[lng, lat]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }

    pub fn to_pair(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coord: Coordinate) -> Self {
        coord.to_pair()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lng, self.lat)
    }
}

/// Zone definition validation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidityMode {
    /// Reject a zone if any of its coordinates is malformed
    Strict,
    /// Drop malformed polygon vertices and keep the zone if enough remain
    #[default]
    Lenient,
}

/// Validated zone geometry
///
/// Built once when a zone is loaded, so containment checks do not have to
/// re-validate loosely typed record fields on every position update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneShape {
    Circle { center: Coordinate, radius_m: f64 },
    /// Implicitly closed ring; the last vertex connects back to the first
    Polygon { ring: Vec<Coordinate> },
}

impl ZoneShape {
    pub fn circle(center: Coordinate, radius_m: f64) -> Self {
        ZoneShape::Circle { center, radius_m }
    }

    pub fn polygon(ring: Vec<Coordinate>) -> Self {
        ZoneShape::Polygon { ring }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ZoneShape::Circle { .. } => "circle",
            ZoneShape::Polygon { .. } => "polygon",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_serializes_as_pair() {
        let coord = Coordinate::new(106.8456, -6.2088);
        let json = serde_json::to_value(coord).unwrap();
        assert_eq!(json, serde_json::json!([106.8456, -6.2088]));

        let back: Coordinate = serde_json::from_value(json).unwrap();
        assert_eq!(back, coord);
    }

    #[test]
    fn test_coordinate_finiteness() {
        assert!(Coordinate::new(0.0, 0.0).is_finite());
        assert!(!Coordinate::new(f64::NAN, 10.0).is_finite());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_shape_tagging() {
        let shape = ZoneShape::circle(Coordinate::new(1.0, 2.0), 250.0);
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "circle");
        assert_eq!(json["radius_m"], 250.0);
        assert_eq!(shape.kind_name(), "circle");
    }
}
