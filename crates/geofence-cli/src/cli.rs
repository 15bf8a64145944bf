use clap::{Parser, Subcommand};
use geofence_core::models::ValidityMode;
use std::path::PathBuf;

/// Geofence - Vehicle geofence detection engine
#[derive(Parser, Debug)]
#[command(name = "geofence")]
#[command(about = "Vehicle geofence detection engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./geofence.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Label for vehicles without a known name
    #[arg(long, global = true, value_name = "NAME")]
    pub fallback_vehicle_name: Option<String>,

    /// How strictly zone definitions are validated
    #[arg(long, global = true, value_name = "MODE")]
    pub zone_validity: Option<ValidityArg>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Zone validation mode selection
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ValidityArg {
    /// Reject zones with any malformed coordinate
    Strict,
    /// Drop malformed polygon vertices when enough remain
    Lenient,
}

impl From<ValidityArg> for ValidityMode {
    fn from(arg: ValidityArg) -> Self {
        match arg {
            ValidityArg::Strict => ValidityMode::Strict,
            ValidityArg::Lenient => ValidityMode::Lenient,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a position feed through the detector
    Replay(ReplayArgs),

    /// Show which zones contain a point
    Check(CheckArgs),

    /// Validate zone records without running the detector
    Validate(ValidateArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Zone records (JSON array, or an object with a "geofences" or "data" array)
    #[arg(long, value_name = "FILE")]
    pub zones: PathBuf,

    /// Position updates, one JSON object per line:
    /// {"vehicle_id": "V1", "position": [lng, lat], "timestamp": "2024-05-01T08:00:00Z"}
    #[arg(long, value_name = "FILE")]
    pub positions: PathBuf,

    /// Vehicle names as a JSON object mapping vehicle id to name
    #[arg(long, value_name = "FILE")]
    pub vehicles: Option<PathBuf>,

    /// Write outbound event records as NDJSON to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Zone records file
    #[arg(long, value_name = "FILE")]
    pub zones: PathBuf,

    /// Longitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub lng: f64,

    /// Latitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Zone records file
    #[arg(long, value_name = "FILE")]
    pub zones: PathBuf,
}
