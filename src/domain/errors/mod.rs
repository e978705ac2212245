// Domain errors - Error taxonomy for clip requests

use thiserror::Error;

/// Which user-entered time field a format error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
    SourceDuration,
}

impl std::fmt::Display for TimeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeField::Start => write!(f, "start time"),
            TimeField::End => write!(f, "end time"),
            TimeField::SourceDuration => write!(f, "source duration"),
        }
    }
}

/// Why a time string was rejected by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatIssue {
    /// A component is empty or contains something other than ASCII digits
    NonNumeric,
    /// A component is written as a negative integer
    Negative,
    /// Minutes or seconds of a multi-part time are 60 or more
    MinuteSecondOverflow,
    /// Not one, two or three components
    InvalidStructure,
    /// The total does not fit in a second counter
    TooLarge,
}

impl FormatIssue {
    /// Plain-language explanation shown to the user
    pub fn describe(&self) -> &'static str {
        match self {
            FormatIssue::NonNumeric => "Time parts must be numbers.",
            FormatIssue::Negative => "Time parts cannot be negative.",
            FormatIssue::MinuteSecondOverflow => {
                "Minutes and seconds must be less than 60 for HH:MM and HH:MM:SS formats."
            }
            FormatIssue::InvalidStructure => {
                "Invalid time format. Use HH:MM:SS, HH:MM (for hours and minutes), or SS (for total seconds)."
            }
            FormatIssue::TooLarge => "Time value is too large.",
        }
    }
}

/// Coarse classification used to pick a response or exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The user has to change the input (4xx-equivalent)
    BadInput,
    /// The referenced media cannot be reached or used
    SourceUnavailable,
    /// Something failed after the request was accepted (5xx-equivalent)
    ProcessingFailure,
}

impl ErrorClass {
    /// Process exit code for the command-line surface
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorClass::BadInput => 2,
            ErrorClass::SourceUnavailable => 3,
            ErrorClass::ProcessingFailure => 1,
        }
    }
}

/// Flat error taxonomy for a single clip request.
///
/// Every variant is terminal for the request that produced it; nothing here
/// is retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    /// Malformed time string
    #[error("Invalid {field} '{input}': {}", .issue.describe())]
    Format {
        field: TimeField,
        input: String,
        issue: FormatIssue,
    },

    /// End is not after start
    #[error("End time must be after start time.")]
    Ordering,

    /// End lies beyond the source media
    #[error("End time exceeds video duration ({source_duration}).")]
    RangeExceeded { source_duration: String },

    /// Requested span is longer than the policy cap
    #[error("Clip duration cannot exceed {cap} seconds (requested {duration}s).")]
    DurationExceeded { duration: u64, cap: u64 },

    /// Media reference is not something we can fetch
    #[error("Invalid YouTube URL: {0}")]
    InvalidMediaRef(String),

    /// Metadata lookup reported the media as private, removed or restricted
    #[error("Video unavailable: {0}")]
    SourceUnavailable(String),

    /// Metadata lookup failed for a reason we do not recognise
    #[error("Video lookup failed: {0}")]
    LookupFailed(String),

    /// Cut/encode failed after validation passed
    #[error("Clip processing failed: {0}")]
    Transcode(String),

    /// A required external tool is not installed
    #[error("{tool} not found. Please ensure {tool} is installed and in your system's PATH.")]
    ToolMissing { tool: String },

    /// No stored artifact for the given token
    #[error("Clip not found: {0}")]
    ArtifactNotFound(String),

    /// Temporary artifact storage failed
    #[error("Clip storage error: {0}")]
    Storage(String),
}

impl ClipError {
    /// Build a format error for a given field
    pub fn format(field: TimeField, input: &str, issue: FormatIssue) -> Self {
        ClipError::Format {
            field,
            input: input.to_string(),
            issue,
        }
    }

    /// Classify the error for the presentation layer
    pub fn class(&self) -> ErrorClass {
        match self {
            ClipError::Format { .. }
            | ClipError::Ordering
            | ClipError::RangeExceeded { .. }
            | ClipError::DurationExceeded { .. }
            | ClipError::InvalidMediaRef(_)
            | ClipError::ArtifactNotFound(_) => ErrorClass::BadInput,
            ClipError::SourceUnavailable(_) => ErrorClass::SourceUnavailable,
            ClipError::LookupFailed(_)
            | ClipError::Transcode(_)
            | ClipError::ToolMissing { .. }
            | ClipError::Storage(_) => ErrorClass::ProcessingFailure,
        }
    }

    /// Message shown to the user verbatim
    pub fn user_message(&self) -> String {
        match self {
            ClipError::SourceUnavailable(_) => "Failed to process the video. It might be private, \
                age-restricted, region-locked, deleted, require login, or use an unsupported \
                format. Please check the URL or try a different video."
                .to_string(),
            ClipError::InvalidMediaRef(_) => "Invalid YouTube URL.".to_string(),
            other => other.to_string(),
        }
    }

    /// Short machine-readable kind, used in JSON output and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ClipError::Format { .. } => "format",
            ClipError::Ordering => "ordering",
            ClipError::RangeExceeded { .. } => "range_exceeded",
            ClipError::DurationExceeded { .. } => "duration_exceeded",
            ClipError::InvalidMediaRef(_) => "invalid_media_ref",
            ClipError::SourceUnavailable(_) => "source_unavailable",
            ClipError::LookupFailed(_) => "lookup_failed",
            ClipError::Transcode(_) => "transcode",
            ClipError::ToolMissing { .. } => "tool_missing",
            ClipError::ArtifactNotFound(_) => "artifact_not_found",
            ClipError::Storage(_) => "storage",
        }
    }
}
