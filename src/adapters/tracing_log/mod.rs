// Tracing log adapter - Structured logging using tracing crate

use tracing_subscriber::EnvFilter;

use crate::adapters::toml_config::LogFormat;
use crate::error::{ClipNinjaError, ClipNinjaResult};

/// Build the event filter: `RUST_LOG` wins, otherwise the configured level
pub fn build_filter(default_level: &str) -> ClipNinjaResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| ClipNinjaError::LoggingInit {
            message: format!("invalid log level '{}': {}", default_level, e),
        }),
    }
}

/// Install the global subscriber. Events go to stderr so stdout stays clean for `--json`.
pub fn init_logging(default_level: &str, format: LogFormat) -> ClipNinjaResult<()> {
    let filter = build_filter(default_level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| ClipNinjaError::LoggingInit {
        message: e.to_string(),
    })
}
