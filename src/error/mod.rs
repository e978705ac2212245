//! Error handling module for ClipNinja infrastructure

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting the application up, outside a clip request
#[derive(Error, Debug)]
pub enum ClipNinjaError {
    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or has wrong types
    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A configuration value is out of range
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfigValue { key: String, value: String },

    /// Logging subscriber setup failed
    #[error("Failed to initialize logging: {message}")]
    LoggingInit { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for ClipNinja infrastructure operations
pub type ClipNinjaResult<T> = std::result::Result<T, ClipNinjaError>;
