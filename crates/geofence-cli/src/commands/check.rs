//! Check command implementation

use crate::cli::CheckArgs;
use crate::input::load_zone_records;
use crate::output::OutputWriter;
use crate::output_types::{CheckOutput, ZoneCheck};
use anyhow::Result;
use geofence_core::config::LayeredConfig;
use geofence_geo::models::shape_center;
use geofence_geo::{coordinate_from_pair, geofence_from_record, haversine_distance, ZoneShapeExt};
use tabled::Tabled;

pub fn execute(args: CheckArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let position = coordinate_from_pair([args.lng, args.lat])?;
    let zone_file = load_zone_records(&args.zones)?;

    let mut warnings = zone_file.warnings;
    let mut zones = Vec::new();

    for record in &zone_file.records {
        let geofence = match geofence_from_record(record, config.zone_validity.value) {
            Ok(geofence) => geofence,
            Err(e) => {
                warnings.push(e.to_string());
                continue;
            }
        };

        let inside = match geofence.shape.contains_point(position) {
            Ok(inside) => Some(inside),
            Err(e) => {
                warnings.push(format!("Geofence {}: {}", geofence.id, e));
                None
            }
        };

        zones.push(ZoneCheck {
            geofence_id: geofence.id.0,
            name: geofence.name.clone(),
            rule_type: geofence.rule_type.to_string(),
            active: geofence.is_active(),
            inside,
            distance_to_center_m: shape_center(&geofence.shape)
                .map(|center| haversine_distance(position, center)),
        });
    }

    if output.is_json() {
        output.result(CheckOutput { position: position.to_pair(), zones, warnings })?;
        return Ok(());
    }

    for warning in &warnings {
        output.warning(warning);
    }

    output.section(format!("Zones around {}", position));

    #[derive(Tabled)]
    struct CheckRow {
        #[tabled(rename = "ID")]
        id: u64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Rule")]
        rule_type: String,
        #[tabled(rename = "Inside")]
        inside: String,
        #[tabled(rename = "Distance to center")]
        distance: String,
    }

    let inside_count = zones.iter().filter(|z| z.active && z.inside == Some(true)).count();
    let rows: Vec<CheckRow> = zones
        .into_iter()
        .map(|z| CheckRow {
            id: z.geofence_id,
            name: z.name,
            rule_type: z.rule_type,
            inside: match (z.inside, z.active) {
                (None, _) => "invalid".to_string(),
                (Some(inside), true) => yes_no(inside).to_string(),
                (Some(inside), false) => format!("{} (inactive)", yes_no(inside)),
            },
            distance: z
                .distance_to_center_m
                .map(|d| format!("{:.1} m", d))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    output.table(rows);
    output.info(format!("Inside {} active zone(s)", inside_count));

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
