// TOML config adapter - Typed configuration loaded from TOML files and the environment

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::{ClipNinjaError, ClipNinjaResult};

/// Files searched when no explicit config path is given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["clipninja.toml", "config/clipninja.toml"];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text
    Pretty,
    /// Single-line text
    Compact,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = ClipNinjaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(ClipNinjaError::InvalidConfigValue {
                key: "log_format".to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
    /// Where finished clips are kept until purged
    pub storage_dir: PathBuf,
    /// Age after which `purge` removes a clip
    pub retention_secs: u64,
    /// Upper bound for a single fetch-and-cut run
    pub transcode_timeout_secs: u64,
    pub ytdlp_path: String,
    pub ffmpeg_path: String,
    /// yt-dlp format selector for the source stream
    pub video_format: String,
    pub ffmpeg_threads: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            storage_dir: std::env::temp_dir().join("clipninja-clips"),
            retention_secs: 3600,
            transcode_timeout_secs: 600,
            ytdlp_path: "yt-dlp".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            video_format: "best[ext=mp4][vcodec!=none][acodec!=none]/best".to_string(),
            ffmpeg_threads: num_cpus::get(),
        }
    }
}

/// On-disk layout: everything lives under a `[clipninja]` table
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    clipninja: AppConfig,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str, origin: &Path) -> ClipNinjaResult<AppConfig> {
        let parsed: ConfigFile =
            toml::from_str(content).map_err(|e| ClipNinjaError::ConfigParse {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(parsed.clipninja)
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> ClipNinjaResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|source| ClipNinjaError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Load from an explicit path, or the first default path that exists, or defaults
    pub fn load(explicit: Option<&Path>) -> ClipNinjaResult<AppConfig> {
        if let Some(path) = explicit {
            info!(path = %path.display(), "Loading configuration");
            return Self::load_file(path);
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let path = Path::new(candidate);
            if path.exists() {
                info!(path = %path.display(), "Loading configuration");
                return Self::load_file(path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(AppConfig::default())
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> ClipNinjaResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        if let Some(value) = lookup("CLIPNINJA_LOG_LEVEL") {
            config.log_level = value;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPNINJA_LOG_FORMAT") {
            config.log_format = value.parse()?;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPNINJA_STORAGE_DIR") {
            config.storage_dir = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = lookup("CLIPNINJA_RETENTION_SECS") {
            config.retention_secs = parse_number("retention_secs", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPNINJA_TRANSCODE_TIMEOUT_SECS") {
            config.transcode_timeout_secs = parse_number("transcode_timeout_secs", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPNINJA_VIDEO_FORMAT") {
            config.video_format = value;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPNINJA_FFMPEG_THREADS") {
            config.ffmpeg_threads = parse_number("ffmpeg_threads", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPNINJA_YTDLP_PATH").or_else(|| lookup("YTDLP_PATH")) {
            config.ytdlp_path = value;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPNINJA_FFMPEG_PATH").or_else(|| lookup("FFMPEG_PATH")) {
            config.ffmpeg_path = value;
            applied += 1;
        }

        Ok(applied)
    }

    /// Validate configuration
    pub fn validate(config: &AppConfig) -> ClipNinjaResult<()> {
        // Same syntax as RUST_LOG: a bare level or per-target directives
        EnvFilter::try_new(&config.log_level).map_err(|_| ClipNinjaError::InvalidConfigValue {
            key: "log_level".to_string(),
            value: config.log_level.clone(),
        })?;

        if config.transcode_timeout_secs == 0 {
            return Err(ClipNinjaError::InvalidConfigValue {
                key: "transcode_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }

        if config.ffmpeg_threads == 0 {
            return Err(ClipNinjaError::InvalidConfigValue {
                key: "ffmpeg_threads".to_string(),
                value: "0".to_string(),
            });
        }

        for (key, value) in [
            ("ytdlp_path", &config.ytdlp_path),
            ("ffmpeg_path", &config.ffmpeg_path),
            ("video_format", &config.video_format),
        ] {
            if value.trim().is_empty() {
                return Err(ClipNinjaError::InvalidConfigValue {
                    key: key.to_string(),
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> ClipNinjaResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ClipNinjaError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}
