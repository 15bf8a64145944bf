//! Normalization of raw zone records and positions into validated types

use crate::models::{Coordinate, ValidityMode, ZoneShape};
use geofence_core::error::{GeofenceError, Result};
use geofence_core::models::{
    Geofence, GeofenceRecord, RuleType, ZoneDefinition, ZoneKind, ZoneStatus,
};
use serde_json::Value;

/// Validate a `[lng, lat]` pair
pub fn coordinate_from_pair(pair: [f64; 2]) -> Result<Coordinate> {
    let coord = Coordinate::from(pair);
    if !coord.is_finite() {
        return Err(GeofenceError::InvalidCoordinate {
            reason: format!("coordinate {} must have finite components", coord),
        });
    }
    Ok(coord)
}

/// Parse a coordinate from JSON.
///
/// Accepts a `[lng, lat]` array or an object with `lng`/`lon`/`longitude` and
/// `lat`/`latitude` keys. Components must be finite numbers.
pub fn coordinate_from_json(value: &Value) -> Result<Coordinate> {
    match value {
        Value::Array(items) => {
            if items.len() != 2 {
                return Err(GeofenceError::InvalidCoordinate {
                    reason: format!("expected [lng, lat], got {} components", items.len()),
                });
            }
            let lng = number(&items[0], "longitude")?;
            let lat = number(&items[1], "latitude")?;
            coordinate_from_pair([lng, lat])
        }
        Value::Object(map) => {
            let lng = ["lng", "lon", "longitude"].iter().find_map(|k| map.get(*k));
            let lat = ["lat", "latitude"].iter().find_map(|k| map.get(*k));
            match (lng, lat) {
                (Some(lng), Some(lat)) => {
                    coordinate_from_pair([number(lng, "longitude")?, number(lat, "latitude")?])
                }
                _ => Err(GeofenceError::InvalidCoordinate {
                    reason: "object is missing a longitude or latitude key".to_string(),
                }),
            }
        }
        other => Err(GeofenceError::InvalidCoordinate {
            reason: format!("expected [lng, lat], got {}", other),
        }),
    }
}

fn number(value: &Value, component: &str) -> Result<f64> {
    value.as_f64().ok_or_else(|| GeofenceError::InvalidCoordinate {
        reason: format!("{} must be a number, got {}", component, value),
    })
}

/// Build a validated zone shape from a raw definition
pub fn shape_from_definition(
    kind: ZoneKind,
    definition: &ZoneDefinition,
    validity: ValidityMode,
) -> Result<ZoneShape> {
    match kind {
        ZoneKind::Circle => {
            let center =
                definition.center.as_ref().ok_or_else(|| bad_shape("circle is missing a center"))?;
            let center =
                coordinate_from_json(center).map_err(|e| bad_shape(format!("center: {}", e)))?;
            let radius =
                definition.radius.as_ref().ok_or_else(|| bad_shape("circle is missing a radius"))?;
            let radius_m = radius_from_json(radius)?;
            Ok(ZoneShape::circle(center, radius_m))
        }
        ZoneKind::Polygon => {
            let coordinates = definition
                .coordinates
                .as_ref()
                .ok_or_else(|| bad_shape("polygon is missing coordinates"))?;
            let ring = ring_from_json(coordinates, validity)?;
            Ok(ZoneShape::polygon(ring))
        }
    }
}

fn bad_shape(reason: impl Into<String>) -> GeofenceError {
    GeofenceError::InvalidZoneShape { reason: reason.into() }
}

fn radius_from_json(value: &Value) -> Result<f64> {
    let radius = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| bad_shape(format!("radius must be a number, got {}", value)))?;

    if !radius.is_finite() || radius <= 0.0 {
        return Err(bad_shape(format!(
            "radius must be a positive number of meters, got {}",
            radius
        )));
    }
    Ok(radius)
}

/// Normalize polygon coordinates to an open ring of usable vertices.
///
/// Accepts GeoJSON polygon nesting (`[[[lng, lat], ...]]`, exterior ring
/// first) or a bare ring (`[[lng, lat], ...]`). A closing vertex equal to the
/// first one is dropped.
fn ring_from_json(value: &Value, validity: ValidityMode) -> Result<Vec<Coordinate>> {
    let outer = value.as_array().ok_or_else(|| bad_shape("coordinates must be an array"))?;

    let is_nested = outer
        .first()
        .and_then(Value::as_array)
        .and_then(|first| first.first())
        .map(Value::is_array)
        .unwrap_or(false);

    let raw_ring = if is_nested {
        if outer.len() > 1 {
            tracing::debug!("Ignoring {} interior ring(s) of polygon zone", outer.len() - 1);
        }
        outer[0].as_array().ok_or_else(|| bad_shape("exterior ring must be an array"))?
    } else {
        outer
    };

    let mut ring = Vec::with_capacity(raw_ring.len());
    for (i, vertex) in raw_ring.iter().enumerate() {
        match coordinate_from_json(vertex) {
            Ok(coord) => ring.push(coord),
            Err(e) => match validity {
                ValidityMode::Strict => return Err(bad_shape(format!("vertex {}: {}", i, e))),
                ValidityMode::Lenient => {
                    tracing::debug!("Discarding polygon vertex {}: {}", i, e);
                }
            },
        }
    }

    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    if ring.len() < 3 {
        return Err(bad_shape(format!(
            "polygon has {} usable vertices, at least 3 required",
            ring.len()
        )));
    }

    Ok(ring)
}

/// Convert a wire zone record into a validated geofence.
///
/// Missing `rule_type` defaults to `STANDARD` and missing `status` to
/// `active`. A missing `type` is inferred from the definition fields.
pub fn geofence_from_record(record: &GeofenceRecord, validity: ValidityMode) -> Result<Geofence> {
    let id = record.id()?;
    let invalid = |reason: String| GeofenceError::InvalidZoneDefinition {
        geofence_id: id.to_string(),
        reason,
    };

    let definition =
        record.definition.as_ref().ok_or_else(|| invalid("missing definition".into()))?;

    let kind = match record.kind.as_deref() {
        Some(kind) => kind.parse::<ZoneKind>().map_err(|e| invalid(e.to_string()))?,
        None if definition.coordinates.is_some() => ZoneKind::Polygon,
        None if definition.center.is_some() => ZoneKind::Circle,
        None => return Err(invalid("missing zone type".into())),
    };

    let rule_type = match record.rule_type.as_deref() {
        Some(rule) => rule.parse::<RuleType>().map_err(|e| invalid(e.to_string()))?,
        None => RuleType::default(),
    };

    let status = match record.status.as_deref() {
        Some(status) => status.parse::<ZoneStatus>().map_err(|e| invalid(e.to_string()))?,
        None => ZoneStatus::default(),
    };

    let shape = shape_from_definition(kind, definition, validity).map_err(|e| match e {
        GeofenceError::InvalidZoneShape { reason } => invalid(reason),
        other => other,
    })?;

    let name = record
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("Geofence {}", id));

    let geofence = Geofence::new(id, name, shape).with_rule_type(rule_type).with_status(status);

    Ok(match &record.user_id {
        Some(Value::String(s)) => geofence.with_owner(s.as_str()),
        Some(Value::Null) | None => geofence,
        Some(other) => geofence.with_owner(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofence_core::models::GeofenceId;
    use serde_json::json;

    fn record(value: Value) -> GeofenceRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_coordinate_from_json_array() {
        let coord = coordinate_from_json(&json!([106.8456, -6.2088])).unwrap();
        assert_eq!(coord, Coordinate::new(106.8456, -6.2088));
    }

    #[test]
    fn test_coordinate_from_json_object_any_key_order() {
        let a = coordinate_from_json(&json!({ "lat": -6.2, "lng": 106.8 })).unwrap();
        let b = coordinate_from_json(&json!({ "longitude": 106.8, "latitude": -6.2 })).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_coordinate_from_json_rejects_malformed() {
        assert!(coordinate_from_json(&json!([1.0])).is_err());
        assert!(coordinate_from_json(&json!([1.0, 2.0, 3.0])).is_err());
        assert!(coordinate_from_json(&json!(["a", 2.0])).is_err());
        assert!(coordinate_from_json(&json!([null, 2.0])).is_err());
        assert!(coordinate_from_json(&json!("106.8,-6.2")).is_err());
        assert!(coordinate_from_json(&json!({ "lat": 1.0 })).is_err());
    }

    #[test]
    fn test_coordinate_from_pair_rejects_nan() {
        assert!(coordinate_from_pair([f64::NAN, 10.0]).is_err());
        assert!(coordinate_from_pair([10.0, f64::NEG_INFINITY]).is_err());
        assert!(coordinate_from_pair([10.0, 20.0]).is_ok());
    }

    #[test]
    fn test_circle_record() {
        let geofence = geofence_from_record(
            &record(json!({
                "geofence_id": 1,
                "name": "Monas",
                "type": "circle",
                "rule_type": "FORBIDDEN",
                "status": "active",
                "definition": { "radius": 500, "center": [106.8456, -6.2088] },
                "user_id": 12
            })),
            ValidityMode::Lenient,
        )
        .unwrap();

        assert_eq!(geofence.id, GeofenceId(1));
        assert_eq!(geofence.rule_type, RuleType::Forbidden);
        assert_eq!(geofence.owner.as_deref(), Some("12"));
        assert_eq!(geofence.shape, ZoneShape::circle(Coordinate::new(106.8456, -6.2088), 500.0));
    }

    #[test]
    fn test_polygon_record_geojson_nesting() {
        let geofence = geofence_from_record(
            &record(json!({
                "geofence_id": "2",
                "type": "polygon",
                "definition": {
                    "coordinates": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]]
                }
            })),
            ValidityMode::Lenient,
        )
        .unwrap();

        assert_eq!(geofence.name, "Geofence 2");
        assert_eq!(geofence.rule_type, RuleType::Standard);
        assert_eq!(geofence.status, ZoneStatus::Active);
        match geofence.shape {
            ZoneShape::Polygon { ring } => assert_eq!(ring.len(), 4),
            other => panic!("Expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_polygon_bare_ring_and_inferred_kind() {
        let geofence = geofence_from_record(
            &record(json!({
                "geofence_id": 3,
                "definition": { "coordinates": [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]] }
            })),
            ValidityMode::Lenient,
        )
        .unwrap();

        assert_eq!(geofence.shape.kind_name(), "polygon");
        assert_eq!(geofence.owner, None);
    }

    #[test]
    fn test_lenient_discards_bad_vertices() {
        let rec = record(json!({
            "geofence_id": 4,
            "type": "polygon",
            "definition": {
                "coordinates": [[[0.0, 0.0], [0.0, 1.0], ["x", 1.0], [1.0, 1.0], [1.0, 0.0]]]
            }
        }));

        let geofence = geofence_from_record(&rec, ValidityMode::Lenient).unwrap();
        match geofence.shape {
            ZoneShape::Polygon { ring } => assert_eq!(ring.len(), 4),
            other => panic!("Expected polygon, got {:?}", other),
        }

        let strict = geofence_from_record(&rec, ValidityMode::Strict);
        assert!(matches!(strict, Err(GeofenceError::InvalidZoneDefinition { .. })));
    }

    #[test]
    fn test_shape_errors_carry_reason() {
        let definition: ZoneDefinition =
            serde_json::from_value(json!({ "center": [0.0, 0.0], "radius": 0 })).unwrap();
        let err = shape_from_definition(ZoneKind::Circle, &definition, ValidityMode::Lenient)
            .unwrap_err();
        match err {
            GeofenceError::InvalidZoneShape { reason } => assert!(reason.contains("radius")),
            other => panic!("Expected InvalidZoneShape, got {:?}", other),
        }

        let definition: ZoneDefinition =
            serde_json::from_value(json!({ "coordinates": [[0.0, 0.0], [1.0, 1.0]] })).unwrap();
        assert!(matches!(
            shape_from_definition(ZoneKind::Polygon, &definition, ValidityMode::Lenient),
            Err(GeofenceError::InvalidZoneShape { .. })
        ));
    }

    #[test]
    fn test_too_few_usable_vertices() {
        let rec = record(json!({
            "geofence_id": 5,
            "type": "polygon",
            "definition": { "coordinates": [[[0.0, 0.0], [1.0, 1.0], [null, 2.0], [0.0, 0.0]]] }
        }));

        let err = geofence_from_record(&rec, ValidityMode::Lenient).unwrap_err();
        assert!(err.to_string().contains("at least 3"), "unexpected error: {}", err);
    }

    #[test]
    fn test_invalid_records() {
        let cases = [
            json!({ "type": "circle", "definition": { "center": [0.0, 0.0], "radius": 10 } }),
            json!({ "geofence_id": "abc", "type": "circle", "definition": { "center": [0.0, 0.0], "radius": 10 } }),
            json!({ "geofence_id": 6, "type": "circle", "definition": { "radius": 10 } }),
            json!({ "geofence_id": 6, "type": "circle", "definition": { "center": [0.0, 0.0] } }),
            json!({ "geofence_id": 6, "type": "circle", "definition": { "center": [0.0, 0.0], "radius": -1 } }),
            json!({ "geofence_id": 6, "type": "hexagon", "definition": { "center": [0.0, 0.0], "radius": 10 } }),
            json!({ "geofence_id": 6, "type": "circle", "rule_type": "MAYBE", "definition": { "center": [0.0, 0.0], "radius": 10 } }),
            json!({ "geofence_id": 6, "type": "circle" }),
        ];

        for case in cases {
            let result = geofence_from_record(&record(case.clone()), ValidityMode::Lenient);
            assert!(result.is_err(), "expected rejection for {}", case);
        }
    }

    #[test]
    fn test_radius_as_string() {
        let geofence = geofence_from_record(
            &record(json!({
                "geofence_id": 8,
                "type": "circle",
                "status": "inactive",
                "definition": { "center": { "lng": 1.0, "lat": 2.0 }, "radius": "250" }
            })),
            ValidityMode::Strict,
        )
        .unwrap();

        assert!(!geofence.is_active());
        assert_eq!(geofence.shape, ZoneShape::circle(Coordinate::new(1.0, 2.0), 250.0));
    }
}
