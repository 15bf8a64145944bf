//! Geofence CLI - Offline harness for the detection engine
//!
//! Loads zone records and replays position feeds through the detector the
//! way the tracking application's refresh loop would.

mod cli;
mod commands;
mod config_loader;
mod input;
mod output;
mod output_types;
mod sink;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Initialize tracing. Detector warnings already reach the terminal through
    // OutputWriter, so library logs stay quiet unless RUST_LOG asks for them.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    commands::execute(cli)
}
