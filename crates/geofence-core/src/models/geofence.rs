//! Geofence zones and their wire records.

use crate::error::{GeofenceError, Result};
use crate::models::geometry::ZoneShape;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a geofence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeofenceId(pub u64);

impl GeofenceId {
    /// Parse an id from a loosely typed record field.
    ///
    /// Accepts non-negative integral numbers (including `1.0`) and numeric strings.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(id) = n.as_u64() {
                    return Ok(GeofenceId(id));
                }
                match n.as_f64() {
                    Some(f) if is_whole_id(f) => Ok(GeofenceId(f as u64)),
                    _ => Err(GeofenceError::InvalidGeofenceId { value: n.to_string() }),
                }
            }
            serde_json::Value::String(s) => s
                .trim()
                .parse::<u64>()
                .map(GeofenceId)
                .map_err(|_| GeofenceError::InvalidGeofenceId { value: format!("{:?}", s) }),
            other => Err(GeofenceError::InvalidGeofenceId { value: other.to_string() }),
        }
    }
}

fn is_whole_id(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64
}

impl fmt::Display for GeofenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GeofenceId {
    fn from(id: u64) -> Self {
        GeofenceId(id)
    }
}

/// Policy attached to a zone, governing how entry and exit are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    /// Neutral enter/exit logging
    #[default]
    Standard,
    /// Entering the zone is a violation
    Forbidden,
    /// Leaving the zone is a violation
    StayIn,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Standard => "STANDARD",
            RuleType::Forbidden => "FORBIDDEN",
            RuleType::StayIn => "STAY_IN",
        }
    }
}

impl FromStr for RuleType {
    type Err = GeofenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "STANDARD" => Ok(RuleType::Standard),
            "FORBIDDEN" => Ok(RuleType::Forbidden),
            "STAY_IN" => Ok(RuleType::StayIn),
            _ => Err(GeofenceError::InvalidRecordField {
                field: "rule_type".to_string(),
                reason: format!("unknown rule type '{}'", s),
            }),
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activation status of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    #[default]
    Active,
    Inactive,
}

impl FromStr for ZoneStatus {
    type Err = GeofenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ZoneStatus::Active),
            "inactive" => Ok(ZoneStatus::Inactive),
            _ => Err(GeofenceError::InvalidRecordField {
                field: "status".to_string(),
                reason: format!("unknown zone status '{}'", s),
            }),
        }
    }
}

/// Geometry kind declared by a zone record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Circle,
    Polygon,
}

impl FromStr for ZoneKind {
    type Err = GeofenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "circle" => Ok(ZoneKind::Circle),
            "polygon" => Ok(ZoneKind::Polygon),
            _ => Err(GeofenceError::InvalidRecordField {
                field: "type".to_string(),
                reason: format!("unknown zone type '{}'", s),
            }),
        }
    }
}

/// A named geographic zone with a validated shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub id: GeofenceId,
    pub name: String,
    pub shape: ZoneShape,
    pub rule_type: RuleType,
    pub status: ZoneStatus,
    /// Owning user in the backend, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Geofence {
    /// Create an active `STANDARD` zone
    pub fn new(id: impl Into<GeofenceId>, name: impl Into<String>, shape: ZoneShape) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shape,
            rule_type: RuleType::Standard,
            status: ZoneStatus::Active,
            owner: None,
        }
    }

    pub fn with_rule_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = rule_type;
        self
    }

    pub fn with_status(mut self, status: ZoneStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == ZoneStatus::Active
    }
}

/// Raw geometry definition as stored by the backend
///
/// Fields stay loosely typed so a malformed definition reaches validation
/// (and becomes a warning) instead of failing deserialization of the whole
/// batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<serde_json::Value>,
}

/// Zone record in the shape served by the geofence CRUD API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeofenceRecord {
    #[serde(default)]
    pub geofence_id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub definition: Option<ZoneDefinition>,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
}

impl GeofenceRecord {
    /// The record's id, if present and numeric
    pub fn id(&self) -> Result<GeofenceId> {
        match &self.geofence_id {
            Some(value) => GeofenceId::from_json(value),
            None => Err(GeofenceError::InvalidGeofenceId { value: "<missing>".to_string() }),
        }
    }

    /// Best-effort id label for log messages
    pub fn id_label(&self) -> String {
        match &self.geofence_id {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => "<missing>".to_string(),
        }
    }
}
