use geofence_core::models::{EventRecord, GeofenceEvent};
use serde::Serialize;

/// Output for replay command
#[derive(Debug, Serialize)]
pub struct ReplayOutput {
    pub zones_loaded: usize,
    pub zones_rejected: usize,
    pub updates_processed: usize,
    pub updates_rejected: usize,
    pub alerts: usize,
    pub events: Vec<GeofenceEvent>,
    pub records: Vec<EventRecord>,
    pub warnings: Vec<String>,
    pub final_status: Vec<VehicleStatus>,
}

/// Membership snapshot of one vehicle after the replay
#[derive(Debug, Serialize)]
pub struct VehicleStatus {
    pub vehicle_id: String,
    pub inside: Vec<u64>,
    pub last_position: Option<[f64; 2]>,
}

/// Output for check command
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub position: [f64; 2],
    pub zones: Vec<ZoneCheck>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ZoneCheck {
    pub geofence_id: u64,
    pub name: String,
    pub rule_type: String,
    pub active: bool,
    /// `None` when the shape cannot be evaluated
    pub inside: Option<bool>,
    pub distance_to_center_m: Option<f64>,
}

/// Output for validate command
#[derive(Debug, Serialize)]
pub struct ValidateOutput {
    pub accepted: Vec<AcceptedZone>,
    pub rejected: Vec<RejectedZone>,
}

#[derive(Debug, Serialize)]
pub struct AcceptedZone {
    pub geofence_id: u64,
    pub name: String,
    pub kind: String,
    pub rule_type: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct RejectedZone {
    pub entry: String,
    pub reason: String,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub fallback_vehicle_name: ConfigEntry,
    pub zone_validity: ConfigEntry,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: String,
}
