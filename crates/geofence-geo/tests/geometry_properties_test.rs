//! Property tests for the point-in-zone predicates
//!
//! The `geo` crate serves as the reference implementation.

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Distance, Haversine, HaversineMeasure};
use geofence_core::models::{Coordinate, ZoneShape};
use geofence_geo::models::{to_geo_coord, to_geo_point, to_geo_polygon};
use geofence_geo::spatial::EARTH_RADIUS_METERS;
use geofence_geo::{haversine_distance, point_in_circle, point_in_polygon, ZoneShapeExt};
use proptest::prelude::*;
use std::f64::consts::TAU;

/// Regular polygon around a center, rotated by `phase`
fn regular_ring(center: Coordinate, radius: f64, sides: usize, phase: f64) -> Vec<Coordinate> {
    (0..sides)
        .map(|i| {
            let angle = phase + TAU * i as f64 / sides as f64;
            Coordinate::new(center.lng + radius * angle.cos(), center.lat + radius * angle.sin())
        })
        .collect()
}

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-179.0f64..179.0, -80.0f64..80.0).prop_map(|(lng, lat)| Coordinate::new(lng, lat))
}

proptest! {
    #[test]
    fn ray_casting_matches_geo_off_boundary(
        center in coordinate(),
        radius in 0.001f64..0.5,
        sides in 3usize..12,
        phase in 0.0f64..TAU,
        dx in -1.0f64..1.0,
        dy in -1.0f64..1.0,
    ) {
        let ring = regular_ring(center, radius, sides, phase);
        let point = Coordinate::new(center.lng + dx * radius * 1.5, center.lat + dy * radius * 1.5);

        let reference = to_geo_polygon(&ring).coordinate_position(&to_geo_coord(point));
        prop_assume!(reference != CoordPos::OnBoundary);

        prop_assert_eq!(point_in_polygon(point, &ring), reference == CoordPos::Inside);
    }

    #[test]
    fn polygon_center_is_inside(
        center in coordinate(),
        radius in 0.001f64..0.5,
        sides in 3usize..12,
        phase in 0.0f64..TAU,
    ) {
        let shape = ZoneShape::polygon(regular_ring(center, radius, sides, phase));
        prop_assert!(shape.contains_point(center).unwrap());
    }

    #[test]
    fn haversine_matches_geo(a in coordinate(), b in coordinate()) {
        let ours = haversine_distance(a, b);
        let fixed = HaversineMeasure::new(EARTH_RADIUS_METERS)
            .distance(to_geo_point(a), to_geo_point(b));
        prop_assert_eq!(ours, fixed);

        // geo's default sphere is slightly larger (6,371,008.8 m)
        let mean = Haversine.distance(to_geo_point(a), to_geo_point(b));
        prop_assert!((ours - mean).abs() <= mean * 1e-4 + 1e-3,
            "ours={} mean={}", ours, mean);
    }

    #[test]
    fn haversine_is_symmetric(a in coordinate(), b in coordinate()) {
        let ab = haversine_distance(a, b);
        let ba = haversine_distance(b, a);
        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert!(ab >= 0.0);
    }

    #[test]
    fn circle_contains_its_center(center in coordinate(), radius in 1.0f64..100_000.0) {
        prop_assert!(point_in_circle(center, center, radius));
    }
}
