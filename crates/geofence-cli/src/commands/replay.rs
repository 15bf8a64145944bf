//! Replay command implementation

use crate::cli::ReplayArgs;
use crate::input::{load_positions, load_vehicle_names, load_zone_records};
use crate::output::OutputWriter;
use crate::output_types::{ReplayOutput, VehicleStatus};
use crate::sink::NdjsonEventSink;
use anyhow::{Context, Result};
use chrono::Utc;
use geofence_core::config::LayeredConfig;
use geofence_core::models::{EventRecord, VehicleId};
use geofence_core::ports::{EventSink, MemoryEventSink};
use geofence_detector::GeofenceDetector;
use std::collections::BTreeSet;
use tabled::Tabled;

pub fn execute(args: ReplayArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let zone_file = load_zone_records(&args.zones)?;
    let feed = load_positions(&args.positions)?;

    let mut detector = match &args.vehicles {
        Some(path) => GeofenceDetector::with_vehicle_directory(
            config.detector_config(),
            load_vehicle_names(path)?,
        ),
        None => GeofenceDetector::new(config.detector_config()),
    };

    let mut warnings = zone_file.warnings;
    warnings.extend(detector.set_geofences(zone_file.records));
    let zones_rejected = warnings.len();
    let zones_loaded = detector.geofence_count();
    output.info(format!("Loaded {} zone(s) from {}", zones_loaded, args.zones.display()));

    let mut updates_rejected = feed.warnings.len();
    warnings.extend(feed.warnings);

    let mut collected = MemoryEventSink::new();
    let mut file_sink = args
        .output
        .as_deref()
        .map(|path| {
            NdjsonEventSink::create(path)
                .with_context(|| format!("Failed to create event output {}", path.display()))
        })
        .transpose()?;

    let mut events = Vec::new();
    let mut alerts = 0;
    let mut vehicles = BTreeSet::new();
    let updates_processed = feed.updates.len();

    for (line_no, update) in feed.updates {
        let vehicle_id = VehicleId::new(update.vehicle_id);
        vehicles.insert(vehicle_id.clone());

        let timestamp = update.timestamp.unwrap_or_else(Utc::now);
        let result = detector.update_vehicle_json(vehicle_id, &update.position, timestamp);

        if result.rejected {
            updates_rejected += 1;
        }

        if result.triggered_alert {
            alerts += 1;
        }
        warnings.extend(result.warnings.into_iter().map(|w| format!("Line {}: {}", line_no, w)));

        let records: Vec<EventRecord> = result.events.iter().map(|e| e.to_record()).collect();
        collected.deliver(&records)?;
        if let Some(sink) = file_sink.as_mut() {
            sink.deliver(&records)?;
        }

        for event in &result.events {
            let message = format!(
                "{} {} {} ({}) at {}",
                event.vehicle_name,
                event.event_type,
                event.geofence_name,
                event.rule_type,
                event.position
            );
            if event.event_type.is_violation() {
                output.alert(message);
            } else {
                output.info(message);
            }
        }
        events.extend(result.events);
    }

    if let (Some(sink), Some(path)) = (file_sink, args.output.as_deref()) {
        let written = sink.written();
        sink.finish()?;
        output.success(format!("Wrote {} event record(s) to {}", written, path.display()));
    }

    let final_status: Vec<VehicleStatus> = vehicles
        .iter()
        .map(|vehicle_id| VehicleStatus {
            vehicle_id: vehicle_id.to_string(),
            inside: detector
                .get_vehicle_geofence_status(vehicle_id)
                .into_iter()
                .filter(|(_, inside)| *inside)
                .map(|(id, _)| id.0)
                .collect(),
            last_position: detector.vehicle_track(vehicle_id).map(|t| t.last_position.to_pair()),
        })
        .collect();

    if output.is_json() {
        output.result(ReplayOutput {
            zones_loaded,
            zones_rejected,
            updates_processed,
            updates_rejected,
            alerts,
            events,
            records: collected.records().to_vec(),
            warnings,
            final_status,
        })?;
        return Ok(());
    }

    for warning in &warnings {
        output.warning(warning);
    }

    output.section("Vehicle Status");

    #[derive(Tabled)]
    struct StatusRow {
        #[tabled(rename = "Vehicle")]
        vehicle: String,
        #[tabled(rename = "Inside zones")]
        inside: String,
        #[tabled(rename = "Last position")]
        last_position: String,
    }

    output.table(
        final_status
            .into_iter()
            .map(|s| StatusRow {
                vehicle: s.vehicle_id,
                inside: if s.inside.is_empty() {
                    "-".to_string()
                } else {
                    s.inside.iter().map(u64::to_string).collect::<Vec<_>>().join(", ")
                },
                last_position: s
                    .last_position
                    .map(|[lng, lat]| format!("[{}, {}]", lng, lat))
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect(),
    );

    output.success(format!(
        "Replayed {} update(s): {} event(s), {} alert(s)",
        updates_processed,
        collected.len(),
        alerts
    ));

    Ok(())
}
