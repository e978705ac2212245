// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_store;
pub mod probe_ytdlp;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FfmpegTranscodeAdapter;
pub use fs_store::FsArtifactStore;
pub use probe_ytdlp::YtDlpMetadataAdapter;
pub use toml_config::{AppConfig, LogFormat, TomlConfigAdapter};
pub use tracing_log::init_logging;
