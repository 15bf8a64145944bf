//! Geofence Geo - Zone geometry and point-in-zone predicates
//!
//! This crate holds the pure geometry used by the detector: haversine
//! distance, point-in-circle and point-in-polygon tests, and normalization of
//! raw zone definitions into validated shapes.

pub mod models;
pub mod spatial;
pub mod validation;

pub use spatial::{haversine_distance, point_in_circle, point_in_polygon, ZoneShapeExt};
pub use validation::{coordinate_from_json, coordinate_from_pair, geofence_from_record};
