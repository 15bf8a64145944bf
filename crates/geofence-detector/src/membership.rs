//! Flat `(vehicle, geofence)` membership table

use geofence_core::models::{GeofenceId, VehicleId};
use std::collections::{BTreeMap, HashMap};

/// Inside/outside flags keyed by vehicle and geofence.
///
/// A missing entry means the vehicle has never been seen inside that zone,
/// which is the same as outside.
#[derive(Debug, Clone, Default)]
pub struct MembershipTable {
    entries: HashMap<(VehicleId, GeofenceId), bool>,
}

impl MembershipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store membership, returning the previous value (outside if unseen)
    pub fn set(&mut self, vehicle_id: &VehicleId, geofence_id: GeofenceId, inside: bool) -> bool {
        self.entries.insert((vehicle_id.clone(), geofence_id), inside).unwrap_or(false)
    }

    /// Snapshot of every recorded zone for one vehicle
    pub fn vehicle_status(&self, vehicle_id: &VehicleId) -> BTreeMap<GeofenceId, bool> {
        self.entries
            .iter()
            .filter(|((vehicle, _), _)| vehicle == vehicle_id)
            .map(|((_, geofence), inside)| (*geofence, *inside))
            .collect()
    }

    /// Drop all entries for a geofence, returning how many were removed
    pub fn purge_geofence(&mut self, geofence_id: GeofenceId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, geofence), _| *geofence != geofence_id);
        before - self.entries.len()
    }

    /// Drop all entries for a vehicle, returning how many were removed
    pub fn purge_vehicle(&mut self, vehicle_id: &VehicleId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(vehicle, _), _| vehicle != vehicle_id);
        before - self.entries.len()
    }

    /// Keep only entries whose geofence passes the predicate
    pub fn retain_geofences(&mut self, mut keep: impl FnMut(GeofenceId) -> bool) {
        self.entries.retain(|(_, geofence), _| keep(*geofence));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
