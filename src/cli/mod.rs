//! CLI module for ClipNinja
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapters::LogFormat;

pub mod args;
pub mod commands;

/// ClipNinja
///
/// Cut a short clip (up to five minutes) out of a public YouTube video.
#[derive(Parser, Debug)]
#[command(name = "clipninja")]
#[command(about = "ClipNinja - Trim short clips from online videos")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overrides config and CLIPNINJA_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Configuration file
    #[arg(long, global = true, env = "CLIPNINJA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory where finished clips are stored
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a video and cut a clip out of it
    Clip(args::ClipArgs),
    /// Validate start/end times without fetching anything
    Check(args::CheckArgs),
    /// Copy a stored clip out of temporary storage
    Fetch(args::FetchArgs),
    /// Delete stored clips past the retention period
    Purge(args::PurgeArgs),
}

impl Commands {
    /// Whether the command was asked for JSON output
    pub fn json(&self) -> bool {
        match self {
            Commands::Clip(args) => args.json,
            Commands::Check(args) => args.json,
            Commands::Fetch(args) => args.json,
            Commands::Purge(args) => args.json,
        }
    }
}
