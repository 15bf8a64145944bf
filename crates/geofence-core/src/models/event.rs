//! Vehicle tracking state and the events produced by zone transitions.

use crate::models::geofence::{GeofenceId, RuleType};
use crate::models::geometry::Coordinate;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a tracked vehicle
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        VehicleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        VehicleId(id.to_string())
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        VehicleId(id)
    }
}

/// Kind of zone transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Enter,
    Exit,
    ViolationEnter,
    ViolationExit,
}

impl EventType {
    /// Event type for a vehicle entering a zone with the given rule
    pub fn for_entry(rule: RuleType) -> Self {
        match rule {
            RuleType::Forbidden => EventType::ViolationEnter,
            RuleType::Standard | RuleType::StayIn => EventType::Enter,
        }
    }

    /// Event type for a vehicle leaving a zone with the given rule
    pub fn for_exit(rule: RuleType) -> Self {
        match rule {
            RuleType::StayIn => EventType::ViolationExit,
            RuleType::Standard | RuleType::Forbidden => EventType::Exit,
        }
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, EventType::ViolationEnter | EventType::ViolationExit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Enter => "enter",
            EventType::Exit => "exit",
            EventType::ViolationEnter => "violation_enter",
            EventType::ViolationExit => "violation_exit",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected zone transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceEvent {
    pub id: String,
    pub vehicle_id: VehicleId,
    pub geofence_id: GeofenceId,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub position: Coordinate,
    pub geofence_name: String,
    pub vehicle_name: String,
    pub rule_type: RuleType,
}

impl GeofenceEvent {
    /// Event id unique per vehicle, zone, event type and millisecond
    pub fn make_id(
        vehicle_id: &VehicleId,
        geofence_id: GeofenceId,
        event_type: EventType,
        timestamp: DateTime<Utc>,
    ) -> String {
        format!("{}-{}-{}-{}", vehicle_id, geofence_id, event_type, timestamp.timestamp_millis())
    }

    /// Outbound record for the event persistence API
    pub fn to_record(&self) -> EventRecord {
        EventRecord::from(self)
    }
}

/// Event payload as accepted by the persistence/notification API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub vehicle_id: String,
    pub geofence_id: u64,
    pub event: String,
    /// RFC 3339 / ISO-8601 timestamp
    pub event_timestamp: String,
}

impl From<&GeofenceEvent> for EventRecord {
    fn from(event: &GeofenceEvent) -> Self {
        Self {
            vehicle_id: event.vehicle_id.0.clone(),
            geofence_id: event.geofence_id.0,
            event: event.event_type.as_str().to_string(),
            event_timestamp: event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Outcome of one position update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub triggered_alert: bool,
    /// The position itself was unusable and no zone was evaluated
    #[serde(default)]
    pub rejected: bool,
    pub events: Vec<GeofenceEvent>,
    pub warnings: Vec<String>,
}

impl DetectionResult {
    /// Result for an update that was skipped entirely
    pub fn rejected(warning: impl Into<String>) -> Self {
        Self {
            triggered_alert: false,
            rejected: true,
            events: Vec::new(),
            warnings: vec![warning.into()],
        }
    }

    /// Append an event, raising the alert flag for violations
    pub fn push_event(&mut self, event: GeofenceEvent) {
        if event.event_type.is_violation() {
            self.triggered_alert = true;
        }
        self.events.push(event);
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// No events and no warnings
    pub fn is_quiet(&self) -> bool {
        self.events.is_empty() && self.warnings.is_empty()
    }
}

/// Last accepted position of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleTrack {
    pub last_position: Coordinate,
    pub last_checked: DateTime<Utc>,
}
