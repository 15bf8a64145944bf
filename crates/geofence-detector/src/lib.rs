//! Geofence Detector - Per-vehicle zone membership and transition events
//!
//! The detector owns the active zone set and, for every vehicle, the last
//! known inside/outside state against each zone. Each position update is
//! diffed against that state and turned into typed enter/exit and violation
//! events.

pub mod detector;
pub mod membership;
pub mod transition;

pub use detector::GeofenceDetector;
pub use membership::MembershipTable;
pub use transition::{Membership, Transition};
