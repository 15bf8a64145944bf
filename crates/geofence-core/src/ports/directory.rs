use crate::models::VehicleId;
use std::collections::HashMap;

/// Port for looking up human-readable vehicle names
///
/// Lookups are best effort: `None` makes the detector fall back to its
/// configured generic label.
pub trait VehicleDirectory {
    /// Display name for a vehicle, if known
    fn vehicle_name(&self, id: &VehicleId) -> Option<String>;
}

/// Directory that knows no vehicle names
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVehicleNames;

impl VehicleDirectory for NoVehicleNames {
    fn vehicle_name(&self, _id: &VehicleId) -> Option<String> {
        None
    }
}

impl VehicleDirectory for HashMap<VehicleId, String> {
    fn vehicle_name(&self, id: &VehicleId) -> Option<String> {
        self.get(id).cloned()
    }
}
