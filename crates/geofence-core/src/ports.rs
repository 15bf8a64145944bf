//! Port trait definitions
//!
//! These traits define the interfaces the surrounding application implements
//! for the detector: vehicle display names and event delivery.

pub mod directory;
pub mod sink;

pub use directory::{NoVehicleNames, VehicleDirectory};
pub use sink::{EventSink, MemoryEventSink};
