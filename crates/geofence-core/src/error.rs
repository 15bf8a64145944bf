//! Error types for the geofence engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeofenceError {
    // Zone record errors
    #[error("Invalid geofence id: {value}")]
    InvalidGeofenceId { value: String },

    #[error("Invalid definition for geofence {geofence_id}: {reason}")]
    InvalidZoneDefinition { geofence_id: String, reason: String },

    #[error("Invalid zone shape: {reason}")]
    InvalidZoneShape { reason: String },

    #[error("Invalid value for record field {field}: {reason}")]
    InvalidRecordField { field: String, reason: String },

    #[error("Degenerate zone geometry: {reason}")]
    DegenerateZone { reason: String },

    // Position errors
    #[error("Invalid coordinate: {reason}")]
    InvalidCoordinate { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GeofenceError {
    fn from(err: serde_json::Error) -> Self {
        GeofenceError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeofenceError>;
