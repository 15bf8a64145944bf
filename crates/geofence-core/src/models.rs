pub mod event;
pub mod geofence;
pub mod geometry;

pub use event::{
    DetectionResult, EventRecord, EventType, GeofenceEvent, VehicleId, VehicleTrack,
};
pub use geofence::{
    Geofence, GeofenceId, GeofenceRecord, RuleType, ZoneDefinition, ZoneKind, ZoneStatus,
};
pub use geometry::{Coordinate, ValidityMode, ZoneShape};
