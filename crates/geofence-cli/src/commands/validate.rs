//! Validate command implementation

use crate::cli::ValidateArgs;
use crate::input::load_zone_records;
use crate::output::OutputWriter;
use crate::output_types::{AcceptedZone, RejectedZone, ValidateOutput};
use anyhow::Result;
use geofence_core::config::LayeredConfig;
use geofence_core::models::ZoneStatus;
use geofence_geo::geofence_from_record;
use tabled::Tabled;

pub fn execute(args: ValidateArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let validity = config.zone_validity.value;
    let zone_file = load_zone_records(&args.zones)?;

    let mut accepted = Vec::new();
    let mut rejected: Vec<RejectedZone> = zone_file
        .warnings
        .into_iter()
        .map(|reason| RejectedZone { entry: "-".to_string(), reason })
        .collect();

    for record in &zone_file.records {
        match geofence_from_record(record, validity) {
            Ok(geofence) => accepted.push(AcceptedZone {
                geofence_id: geofence.id.0,
                name: geofence.name,
                kind: geofence.shape.kind_name().to_string(),
                rule_type: geofence.rule_type.to_string(),
                status: match geofence.status {
                    ZoneStatus::Active => "active".to_string(),
                    ZoneStatus::Inactive => "inactive".to_string(),
                },
            }),
            Err(e) => rejected.push(RejectedZone { entry: record.id_label(), reason: e.to_string() }),
        }
    }

    if output.is_json() {
        output.result(ValidateOutput { accepted, rejected })?;
        return Ok(());
    }

    output.section(format!("Zones ({:?} validation)", validity));

    #[derive(Tabled)]
    struct ZoneRow {
        #[tabled(rename = "ID")]
        id: u64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        kind: String,
        #[tabled(rename = "Rule")]
        rule_type: String,
        #[tabled(rename = "Status")]
        status: String,
    }

    let accepted_count = accepted.len();
    output.table(
        accepted
            .into_iter()
            .map(|z| ZoneRow {
                id: z.geofence_id,
                name: z.name,
                kind: z.kind,
                rule_type: z.rule_type,
                status: z.status,
            })
            .collect(),
    );

    for zone in &rejected {
        output.warning(format!("Zone {} rejected: {}", zone.entry, zone.reason));
    }

    if rejected.is_empty() {
        output.success(format!("All {} zones are valid", accepted_count));
    } else {
        output.info(format!("{} accepted, {} rejected", accepted_count, rejected.len()));
    }

    Ok(())
}
