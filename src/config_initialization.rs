//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::{AppConfig, TomlConfigAdapter};
use crate::cli::{Cli, Commands};

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<AppConfig> {
    // Steps 1 and 2: defaults, then file
    let mut config =
        TomlConfigAdapter::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Step 3: environment
    let env_overrides =
        TomlConfigAdapter::apply_env_overrides(&mut config, |key| std::env::var(key).ok())
            .context("Invalid environment configuration")?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    // Step 4: command line
    let cli_overrides = apply_cli_configuration_overrides(&mut config, cli);
    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }

    TomlConfigAdapter::validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_configuration_overrides(config: &mut AppConfig, cli: &Cli) -> usize {
    let mut cli_overrides = 0;

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
        cli_overrides += 1;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
        cli_overrides += 1;
    }
    if let Some(dir) = &cli.storage_dir {
        config.storage_dir = dir.clone();
        cli_overrides += 1;
    }

    if let Commands::Clip(args) = &cli.command {
        if let Some(timeout) = args.timeout_secs {
            config.transcode_timeout_secs = timeout;
            cli_overrides += 1;
        }
    }

    cli_overrides
}
