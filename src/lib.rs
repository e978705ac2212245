//! ClipNinja library
//!
//! Cuts short clips (at most five minutes) out of public YouTube videos.
//! Time parsing and range validation live in [`domain`]; fetching and
//! transcoding sit behind the traits in [`ports`] and are implemented by the
//! external-tool adapters in [`adapters`].

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{ClipError, ErrorClass, FormatIssue, TimeField};
pub use domain::model::{ClipRange, ClipToken, MediaRef, TimeSpec};
pub use domain::rules::{ClipRangeValidator, MAX_CLIP_SECONDS};
pub use domain::time::{format_hms, parse_time_to_seconds};
pub use error::{ClipNinjaError, ClipNinjaResult};
