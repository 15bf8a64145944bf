//! Readers for zone files, position feeds, and vehicle name maps

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use geofence_core::models::{GeofenceRecord, VehicleId};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Zone records read from a file, plus entries that were not records at all
pub struct ZoneFile {
    pub records: Vec<GeofenceRecord>,
    pub warnings: Vec<String>,
}

/// Load zone records from JSON.
///
/// Accepts a bare array or the CRUD API envelope (`{"geofences": [...]}` or
/// `{"data": [...]}`). Entries that do not deserialize into a record are
/// reported as warnings so the rest of the file still loads.
pub fn load_zone_records(path: &Path) -> Result<ZoneFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read zone file {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Zone file {} is not valid JSON", path.display()))?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("geofences").or_else(|| map.remove("data")) {
            Some(Value::Array(entries)) => entries,
            _ => bail!("Zone file {} has no \"geofences\" or \"data\" array", path.display()),
        },
        _ => bail!("Zone file {} must contain a JSON array of zones", path.display()),
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut warnings = Vec::new();
    for (i, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<GeofenceRecord>(entry) {
            Ok(record) => records.push(record),
            Err(e) => warnings.push(format!("Zone entry {} is malformed: {}", i, e)),
        }
    }

    Ok(ZoneFile { records, warnings })
}

/// One line of a position feed
#[derive(Debug, Deserialize)]
pub struct PositionUpdate {
    pub vehicle_id: String,
    /// Kept loose so the detector decides what is malformed
    pub position: Value,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Parsed position feed with the line number of each update
pub struct PositionFeed {
    pub updates: Vec<(usize, PositionUpdate)>,
    pub warnings: Vec<String>,
}

/// Load an NDJSON position feed. Blank lines and `#` comments are skipped.
pub fn load_positions(path: &Path) -> Result<PositionFeed> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open position feed {}", path.display()))?;

    let mut updates = Vec::new();
    let mut warnings = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line_no = i + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<PositionUpdate>(trimmed) {
            Ok(update) => updates.push((line_no, update)),
            Err(e) => warnings.push(format!("Line {}: {}", line_no, e)),
        }
    }

    Ok(PositionFeed { updates, warnings })
}

/// Load vehicle display names from a JSON object `{ "<vehicle id>": "<name>" }`
pub fn load_vehicle_names(path: &Path) -> Result<HashMap<VehicleId, String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read vehicle file {}", path.display()))?;
    let names: HashMap<String, String> = serde_json::from_str(&content)
        .with_context(|| format!("Vehicle file {} must map ids to names", path.display()))?;

    Ok(names.into_iter().map(|(id, name)| (VehicleId(id), name)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_zone_file_envelope() {
        let file = write_temp(
            r#"{"data": [
                {"geofence_id": 1, "type": "circle", "definition": {"center": [0, 0], "radius": 10}},
                {"geofence_id": 2, "name": 5}
            ]}"#,
        );

        let zones = load_zone_records(file.path()).unwrap();
        assert_eq!(zones.records.len(), 1);
        assert_eq!(zones.warnings.len(), 1);
    }

    #[test]
    fn test_zone_file_rejects_scalar() {
        let file = write_temp("42");
        assert!(load_zone_records(file.path()).is_err());
    }

    #[test]
    fn test_position_feed() {
        let file = write_temp(
            "# fleet feed\n\
             {\"vehicle_id\": \"V1\", \"position\": [106.9, -6.3], \"timestamp\": \"2024-05-01T08:00:00Z\"}\n\
             \n\
             not json\n\
             {\"vehicle_id\": \"V2\", \"position\": \"garbage\"}\n",
        );

        let feed = load_positions(file.path()).unwrap();
        assert_eq!(feed.updates.len(), 2);
        assert_eq!(feed.updates[0].0, 2);
        assert!(feed.updates[1].1.timestamp.is_none());
        assert_eq!(feed.warnings.len(), 1);
        assert!(feed.warnings[0].starts_with("Line 4"));
    }

    #[test]
    fn test_vehicle_names() {
        let file = write_temp(r#"{"V1": "Truck 1"}"#);
        let names = load_vehicle_names(file.path()).unwrap();
        assert_eq!(names.get(&VehicleId::new("V1")).map(String::as_str), Some("Truck 1"));
    }
}
