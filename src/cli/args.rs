//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Longest transcode timeout accepted on the command line (one hour)
const MAX_TIMEOUT_SECS: u64 = 3600;

fn timeout_secs(value: &str) -> Result<u64, String> {
    clap_num::number_range(value, 1, MAX_TIMEOUT_SECS)
}

/// Arguments for the clip command
#[derive(Args, Debug, Clone)]
pub struct ClipArgs {
    /// Public YouTube video URL
    #[arg(short, long)]
    pub url: String,

    /// Start time (HH:MM:SS, HH:MM, or total seconds)
    #[arg(short, long, allow_hyphen_values = true)]
    pub start: String,

    /// End time (HH:MM:SS, HH:MM, or total seconds)
    #[arg(short, long, allow_hyphen_values = true)]
    pub end: String,

    /// Also copy the finished clip to this file or directory
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Give up on processing after this many seconds
    #[arg(long, value_parser = timeout_secs)]
    pub timeout_secs: Option<u64>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Start time (HH:MM:SS, HH:MM, or total seconds)
    #[arg(short, long, allow_hyphen_values = true)]
    pub start: String,

    /// End time (HH:MM:SS, HH:MM, or total seconds)
    #[arg(short, long, allow_hyphen_values = true)]
    pub end: String,

    /// Length of the source video, if known (same formats as start/end)
    #[arg(long)]
    pub source_duration: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the fetch command
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Clip name printed by the clip command (clip-<id>.mp4)
    pub token: String,

    /// Destination file or directory
    #[arg(short, long, default_value = ".")]
    pub dest: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the purge command
#[derive(Args, Debug, Clone)]
pub struct PurgeArgs {
    /// Remove clips older than this many seconds (default: configured retention)
    #[arg(long)]
    pub older_than_secs: Option<u64>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
