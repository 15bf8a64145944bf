//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use geofence_core::config::{ConfigSource, LayeredConfig};
use tabled::Tabled;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let inspection_map = config.to_inspection_map();

    if output.is_json() {
        let entry = |key: &str| {
            inspection_map
                .get(key)
                .map(|(value, source)| ConfigEntry {
                    value: value.clone(),
                    source: format!("{:?}", source),
                })
                .unwrap_or_else(|| ConfigEntry {
                    value: String::new(),
                    source: format!("{:?}", ConfigSource::Default),
                })
        };

        output.result(ConfigOutput {
            fallback_vehicle_name: entry("fallback_vehicle_name"),
            zone_validity: entry("zone_validity"),
        })?;
    } else {
        output.section("Configuration Values");

        #[derive(Tabled)]
        struct ConfigRow {
            #[tabled(rename = "Key")]
            key: String,
            #[tabled(rename = "Value")]
            value: String,
            #[tabled(rename = "Source")]
            source: String,
        }

        let mut rows: Vec<ConfigRow> = inspection_map
            .into_iter()
            .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));

        output.table(rows);

        output.section("Configuration Precedence");
        output.info("CLI arguments > Environment variables > Config file > Defaults");
    }

    Ok(())
}
