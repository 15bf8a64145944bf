//! The geofence detector

use crate::membership::MembershipTable;
use crate::transition::{Membership, Transition};
use chrono::{DateTime, Utc};
use geofence_core::config::DetectorConfig;
use geofence_core::error::Result;
use geofence_core::models::{
    Coordinate, DetectionResult, Geofence, GeofenceEvent, GeofenceId, GeofenceRecord, VehicleId,
    VehicleTrack,
};
use geofence_core::ports::{NoVehicleNames, VehicleDirectory};
use geofence_geo::{coordinate_from_json, coordinate_from_pair, geofence_from_record, ZoneShapeExt};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Converts vehicle position updates into geofence transition events.
///
/// The detector is a plain value owned by the caller. Every mutating method
/// takes `&mut self`; callers that share one detector across threads wrap it
/// in a `Mutex`.
pub struct GeofenceDetector {
    config: DetectorConfig,
    vehicle_names: Box<dyn VehicleDirectory + Send + Sync>,
    geofences: BTreeMap<GeofenceId, Geofence>,
    membership: MembershipTable,
    tracks: HashMap<VehicleId, VehicleTrack>,
}

impl GeofenceDetector {
    /// Create a detector without vehicle name lookup
    pub fn new(config: DetectorConfig) -> Self {
        Self::with_vehicle_directory(config, NoVehicleNames)
    }

    /// Create a detector that resolves vehicle names through `directory`
    pub fn with_vehicle_directory(
        config: DetectorConfig,
        directory: impl VehicleDirectory + Send + Sync + 'static,
    ) -> Self {
        Self {
            config,
            vehicle_names: Box::new(directory),
            geofences: BTreeMap::new(),
            membership: MembershipTable::new(),
            tracks: HashMap::new(),
        }
    }

    /// Insert or replace a geofence by id
    ///
    /// Membership recorded for the id is kept, so replacing a zone with a new
    /// shape is judged against where vehicles were before.
    pub fn set_geofence(&mut self, geofence: Geofence) {
        tracing::debug!(geofence_id = %geofence.id, name = %geofence.name, "Setting geofence");
        self.geofences.insert(geofence.id, geofence);
    }

    /// Validate a zone record and insert it.
    ///
    /// An invalid record is logged and returned as an error; the zone set is
    /// left unchanged.
    pub fn set_geofence_record(&mut self, record: &GeofenceRecord) -> Result<GeofenceId> {
        match geofence_from_record(record, self.config.zone_validity) {
            Ok(geofence) => {
                let id = geofence.id;
                self.set_geofence(geofence);
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(geofence_id = %record.id_label(), "Rejected geofence record: {}", e);
                Err(e)
            }
        }
    }

    /// Replace the whole zone set with validated records.
    ///
    /// Returns one warning per rejected record. Membership for zones that are
    /// no longer present is purged.
    pub fn set_geofences<I>(&mut self, records: I) -> Vec<String>
    where
        I: IntoIterator<Item = GeofenceRecord>,
    {
        let mut warnings = Vec::new();
        let mut geofences = Vec::new();

        for record in records {
            match geofence_from_record(&record, self.config.zone_validity) {
                Ok(geofence) => geofences.push(geofence),
                Err(e) => {
                    tracing::warn!(
                        geofence_id = %record.id_label(),
                        "Rejected geofence record: {}",
                        e
                    );
                    warnings.push(e.to_string());
                }
            }
        }

        self.replace_geofences(geofences);
        warnings
    }

    /// Replace the whole zone set, purging membership for dropped zones
    pub fn replace_geofences<I>(&mut self, geofences: I)
    where
        I: IntoIterator<Item = Geofence>,
    {
        self.geofences = geofences.into_iter().map(|g| (g.id, g)).collect();
        let geofences = &self.geofences;
        self.membership.retain_geofences(|id| geofences.contains_key(&id));
        tracing::debug!(count = self.geofences.len(), "Replaced geofence set");
    }

    /// Remove a geofence and purge its membership for every vehicle.
    ///
    /// Removing an unknown id is a no-op.
    pub fn remove_geofence(&mut self, id: GeofenceId) -> Option<Geofence> {
        let removed = self.geofences.remove(&id);
        let purged = self.membership.purge_geofence(id);
        if removed.is_some() || purged > 0 {
            tracing::debug!(geofence_id = %id, purged, "Removed geofence");
        }
        removed
    }

    pub fn geofence(&self, id: GeofenceId) -> Option<&Geofence> {
        self.geofences.get(&id)
    }

    /// All geofences in ascending id order
    pub fn geofences(&self) -> impl Iterator<Item = &Geofence> {
        self.geofences.values()
    }

    pub fn geofence_count(&self) -> usize {
        self.geofences.len()
    }

    /// Process one position update.
    ///
    /// A malformed position yields a warning and leaves all state untouched.
    /// Otherwise every active zone is evaluated, transitions become events,
    /// and the stored membership is refreshed.
    pub fn update_vehicle_data(
        &mut self,
        vehicle_id: impl Into<VehicleId>,
        position: [f64; 2],
        timestamp: DateTime<Utc>,
    ) -> DetectionResult {
        let vehicle_id = vehicle_id.into();
        match coordinate_from_pair(position) {
            Ok(position) => self.evaluate(vehicle_id, position, timestamp),
            Err(e) => reject_position(&vehicle_id, e),
        }
    }

    /// Process one position update given as loosely typed JSON.
    ///
    /// Accepts the same shapes as [`coordinate_from_json`]; wrong arity or
    /// non-numeric components are rejected like non-finite ones.
    pub fn update_vehicle_json(
        &mut self,
        vehicle_id: impl Into<VehicleId>,
        position: &serde_json::Value,
        timestamp: DateTime<Utc>,
    ) -> DetectionResult {
        let vehicle_id = vehicle_id.into();
        match coordinate_from_json(position) {
            Ok(position) => self.evaluate(vehicle_id, position, timestamp),
            Err(e) => reject_position(&vehicle_id, e),
        }
    }

    fn evaluate(
        &mut self,
        vehicle_id: VehicleId,
        position: Coordinate,
        timestamp: DateTime<Utc>,
    ) -> DetectionResult {
        let mut result = DetectionResult::default();
        let mut vehicle_name: Option<String> = None;

        for geofence in self.geofences.values().filter(|g| g.is_active()) {
            let inside = match geofence.shape.contains_point(position) {
                Ok(inside) => inside,
                Err(e) => {
                    let warning = format!(
                        "Skipping geofence {} ({}) for vehicle {}: {}",
                        geofence.id, geofence.name, vehicle_id, e
                    );
                    tracing::warn!("{}", warning);
                    result.push_warning(warning);
                    continue;
                }
            };

            let previous = Membership::from(self.membership.set(&vehicle_id, geofence.id, inside));
            let Some(transition) = Transition::between(previous, Membership::from(inside)) else {
                continue;
            };

            let event_type = transition.event_type(geofence.rule_type);
            let vehicle_name = vehicle_name
                .get_or_insert_with(|| {
                    self.vehicle_names
                        .vehicle_name(&vehicle_id)
                        .unwrap_or_else(|| self.config.fallback_vehicle_name.clone())
                })
                .clone();

            tracing::debug!(
                vehicle_id = %vehicle_id,
                geofence_id = %geofence.id,
                event = %event_type,
                "Geofence transition"
            );

            result.push_event(GeofenceEvent {
                id: GeofenceEvent::make_id(&vehicle_id, geofence.id, event_type, timestamp),
                vehicle_id: vehicle_id.clone(),
                geofence_id: geofence.id,
                event_type,
                timestamp,
                position,
                geofence_name: geofence.name.clone(),
                vehicle_name,
                rule_type: geofence.rule_type,
            });
        }

        self.tracks
            .insert(vehicle_id, VehicleTrack { last_position: position, last_checked: timestamp });

        result
    }

    /// Current membership of a vehicle per zone; empty for unknown vehicles
    pub fn get_vehicle_geofence_status(
        &self,
        vehicle_id: &VehicleId,
    ) -> BTreeMap<GeofenceId, bool> {
        self.membership.vehicle_status(vehicle_id)
    }

    /// Last accepted position of a vehicle
    pub fn vehicle_track(&self, vehicle_id: &VehicleId) -> Option<&VehicleTrack> {
        self.tracks.get(vehicle_id)
    }

    /// Forget everything known about one vehicle
    pub fn reset_vehicle_state(&mut self, vehicle_id: &VehicleId) {
        self.tracks.remove(vehicle_id);
        self.membership.purge_vehicle(vehicle_id);
    }

    /// Forget every vehicle's membership and track
    pub fn clear_all_vehicle_states(&mut self) {
        self.tracks.clear();
        self.membership.clear();
    }

    /// Remove every geofence along with all membership state
    pub fn clear_all_geofences(&mut self) {
        self.geofences.clear();
        self.membership.clear();
    }
}

fn reject_position(vehicle_id: &VehicleId, error: impl fmt::Display) -> DetectionResult {
    let warning = format!("Ignoring position update for vehicle {}: {}", vehicle_id, error);
    tracing::warn!("{}", warning);
    DetectionResult::rejected(warning)
}

impl Default for GeofenceDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl fmt::Debug for GeofenceDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeofenceDetector")
            .field("config", &self.config)
            .field("geofences", &self.geofences.len())
            .field("membership", &self.membership.len())
            .field("vehicles", &self.tracks.len())
            .finish()
    }
}
