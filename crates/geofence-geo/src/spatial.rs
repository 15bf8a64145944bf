//! Point-in-zone predicates
//!
//! Boundary points get no epsilon tolerance: a position exactly on a circle
//! edge or polygon edge may resolve either way, and that is expected.

use crate::models::{to_geo_point, Coordinate, ZoneShape};
use geo::{Distance, HaversineMeasure};
use geofence_core::error::{GeofenceError, Result};

/// Mean earth radius used for the spherical approximation, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters (haversine)
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    HaversineMeasure::new(EARTH_RADIUS_METERS).distance(to_geo_point(a), to_geo_point(b))
}

/// Check if a point lies within `radius_m` meters of `center`
pub fn point_in_circle(point: Coordinate, center: Coordinate, radius_m: f64) -> bool {
    haversine_distance(point, center) <= radius_m
}

/// Even-odd ray casting over an implicitly closed ring
///
/// Coordinates are treated as planar `(x = lng, y = lat)`. Rings with fewer
/// than 3 vertices contain nothing.
pub fn point_in_polygon(point: Coordinate, ring: &[Coordinate]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let (x, y) = (point.lng, point.lat);
    let mut inside = false;
    let mut j = ring.len() - 1;

    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].lng, ring[i].lat);
        let (xj, yj) = (ring[j].lng, ring[j].lat);

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Extension trait for evaluating zone shapes
pub trait ZoneShapeExt {
    /// Check if the shape contains a point.
    ///
    /// Fails with [`GeofenceError::DegenerateZone`] when the shape cannot be
    /// evaluated: non-finite circle parameters, a non-positive radius, or a
    /// polygon with fewer than 3 usable vertices.
    fn contains_point(&self, point: Coordinate) -> Result<bool>;
}

impl ZoneShapeExt for ZoneShape {
    fn contains_point(&self, point: Coordinate) -> Result<bool> {
        match self {
            ZoneShape::Circle { center, radius_m } => {
                if !center.is_finite() {
                    return Err(GeofenceError::DegenerateZone {
                        reason: format!("circle center {} is not finite", center),
                    });
                }
                if !radius_m.is_finite() || *radius_m <= 0.0 {
                    return Err(GeofenceError::DegenerateZone {
                        reason: format!("circle radius {} must be a positive number", radius_m),
                    });
                }
                Ok(point_in_circle(point, *center, *radius_m))
            }
            ZoneShape::Polygon { ring } => {
                if ring.iter().all(Coordinate::is_finite) {
                    return usable_ring(ring).map(|ring| point_in_polygon(point, ring));
                }
                let usable: Vec<Coordinate> =
                    ring.iter().copied().filter(Coordinate::is_finite).collect();
                usable_ring(&usable).map(|ring| point_in_polygon(point, ring))
            }
        }
    }
}

fn usable_ring(ring: &[Coordinate]) -> Result<&[Coordinate]> {
    if ring.len() < 3 {
        return Err(GeofenceError::DegenerateZone {
            reason: format!("polygon has {} usable vertices, at least 3 required", ring.len()),
        });
    }
    Ok(ring)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(1.0, 0.0),
        ]
    }

    #[test]
    fn test_point_in_circle_fixture() {
        let center = Coordinate::new(0.0, 0.0);

        // ~555 m north
        assert!(point_in_circle(Coordinate::new(0.0, 0.005), center, 1000.0));
        // ~2224 m north
        assert!(!point_in_circle(Coordinate::new(0.0, 0.02), center, 1000.0));
    }

    #[test]
    fn test_haversine_known_distance() {
        // Paris to London is roughly 344 km
        let paris = Coordinate::new(2.3522, 48.8566);
        let london = Coordinate::new(-0.1276, 51.5074);

        let distance = haversine_distance(paris, london);
        assert!(
            distance > 339_000.0 && distance < 349_000.0,
            "Paris-London distance {} should be ~344km",
            distance
        );
    }

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinate::new(106.8456, -6.2088);
        assert!(haversine_distance(point, point) < 0.001);
    }

    #[test]
    fn test_distance_uses_fixed_earth_radius() {
        // 0.005 degrees of arc on a 6,371,000 m sphere
        let d = haversine_distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.005));
        let expected = EARTH_RADIUS_METERS * 0.005f64.to_radians();
        assert!((d - expected).abs() < 1e-6, "got {}, expected {}", d, expected);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((d - 111_194.9).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_point_in_polygon_fixture() {
        let square = unit_square();
        assert!(point_in_polygon(Coordinate::new(0.5, 0.5), &square));
        assert!(!point_in_polygon(Coordinate::new(2.0, 2.0), &square));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        // U shape opening to the north
        let ring = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(3.0, 0.0),
            Coordinate::new(3.0, 3.0),
            Coordinate::new(2.0, 3.0),
            Coordinate::new(2.0, 1.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(1.0, 3.0),
            Coordinate::new(0.0, 3.0),
        ];

        assert!(point_in_polygon(Coordinate::new(0.5, 2.0), &ring));
        assert!(point_in_polygon(Coordinate::new(2.5, 2.0), &ring));
        // Inside the notch
        assert!(!point_in_polygon(Coordinate::new(1.5, 2.0), &ring));
        assert!(point_in_polygon(Coordinate::new(1.5, 0.5), &ring));
    }

    #[test]
    fn test_closing_vertex_does_not_change_result() {
        let mut closed = unit_square();
        closed.push(Coordinate::new(0.0, 0.0));

        assert!(point_in_polygon(Coordinate::new(0.5, 0.5), &closed));
        assert!(!point_in_polygon(Coordinate::new(1.5, 0.5), &closed));
    }

    #[test]
    fn test_too_few_vertices_is_outside() {
        let line = vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)];
        assert!(!point_in_polygon(Coordinate::new(0.5, 0.5), &line));
        assert!(!point_in_polygon(Coordinate::new(0.5, 0.5), &[]));
    }

    #[test]
    fn test_shape_contains_point() {
        let circle = ZoneShape::circle(Coordinate::new(106.8456, -6.2088), 500.0);
        assert!(circle.contains_point(Coordinate::new(106.8456, -6.2088)).unwrap());
        assert!(!circle.contains_point(Coordinate::new(106.9, -6.3)).unwrap());

        let square = ZoneShape::polygon(unit_square());
        assert!(square.contains_point(Coordinate::new(0.5, 0.5)).unwrap());
    }

    #[test]
    fn test_degenerate_shapes() {
        let point = Coordinate::new(0.0, 0.0);

        let bad_radius = ZoneShape::circle(Coordinate::new(0.0, 0.0), f64::NAN);
        assert!(matches!(
            bad_radius.contains_point(point),
            Err(GeofenceError::DegenerateZone { .. })
        ));

        let zero_radius = ZoneShape::circle(Coordinate::new(0.0, 0.0), 0.0);
        assert!(zero_radius.contains_point(point).is_err());

        let bad_center = ZoneShape::circle(Coordinate::new(f64::INFINITY, 0.0), 10.0);
        assert!(bad_center.contains_point(point).is_err());

        let sliver = ZoneShape::polygon(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(f64::NAN, 1.0),
            Coordinate::new(1.0, 1.0),
        ]);
        assert!(sliver.contains_point(point).is_err());
    }

    #[test]
    fn test_malformed_vertices_are_discarded() {
        let ring = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(f64::NAN, f64::NAN),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(1.0, 0.0),
        ];
        let shape = ZoneShape::polygon(ring);
        assert!(shape.contains_point(Coordinate::new(0.5, 0.5)).unwrap());
    }
}
