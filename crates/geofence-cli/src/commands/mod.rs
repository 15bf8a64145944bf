//! Command implementations

mod check;
mod config;
mod replay;
mod validate;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Replay(args) => replay::execute(args, &config, &output),
        Commands::Check(args) => check::execute(args, &config, &output),
        Commands::Validate(args) => validate::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}
