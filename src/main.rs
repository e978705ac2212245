//! ClipNinja CLI
//!
//! # Usage
//!
//! ```bash
//! clipninja check --start 1:30 --end 2:15
//! clipninja clip --url "https://youtu.be/dQw4w9WgXcQ" --start 00:00:10 --end 00:00:40
//! clipninja fetch clip-<id>.mp4 --dest ./clips
//! clipninja purge --older-than-secs 600
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use clipninja::adapters::init_logging;
use clipninja::cli::{commands, Cli};
use clipninja::config_initialization::initialize_configuration_hierarchy;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;
    init_logging(&config.log_level, config.log_format)?;

    info!("Starting ClipNinja");
    info!(
        storage_dir = %config.storage_dir.display(),
        retention_secs = config.retention_secs,
        "Configuration loaded"
    );

    Ok(commands::dispatch(cli.command, &config).await)
}
