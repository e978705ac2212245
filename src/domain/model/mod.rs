// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::domain::errors::{ClipError, FormatIssue};
use crate::domain::rules::MAX_CLIP_SECONDS;
use crate::domain::time::{format_hms, parse_time_to_seconds};

/// An instant relative to the start of the source media, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimeSpec {
    pub seconds: u64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: u64) -> Self {
        Self { seconds }
    }

    /// Parse a user-entered time string (`SS`, `HH:MM` or `HH:MM:SS`)
    pub fn parse(time_str: &str) -> Result<Self, FormatIssue> {
        parse_time_to_seconds(time_str).map(Self::from_seconds)
    }

    /// Format as HH:MM:SS
    pub fn format_hms(&self) -> String {
        format_hms(self.seconds)
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// A validated clip interval.
///
/// Stored as start plus duration because the transcode step cuts
/// "from start for duration seconds". Always `0 < duration <= MAX_CLIP_SECONDS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClipRange {
    start: TimeSpec,
    duration: u64,
}

impl ClipRange {
    /// Create a clip range from start and end, checking ordering and the duration cap
    pub fn from_bounds(start: TimeSpec, end: TimeSpec) -> Result<Self, ClipError> {
        if start >= end {
            return Err(ClipError::Ordering);
        }

        let duration = end.seconds - start.seconds;
        if duration > MAX_CLIP_SECONDS {
            return Err(ClipError::DurationExceeded {
                duration,
                cap: MAX_CLIP_SECONDS,
            });
        }

        Ok(Self { start, duration })
    }

    pub fn start(&self) -> TimeSpec {
        self.start
    }

    /// Clip length in seconds
    pub fn duration_seconds(&self) -> u64 {
        self.duration
    }

    pub fn end(&self) -> TimeSpec {
        TimeSpec::from_seconds(self.start.seconds + self.duration)
    }
}

impl fmt::Display for ClipRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({}s)", self.start, self.end(), self.duration)
    }
}

const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
];

const SHORT_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];

const PATH_PREFIXES: &[&str] = &["shorts", "embed", "live", "v"];

/// A reference to a public online video, validated before any lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRef {
    url: String,
    video_id: String,
}

impl MediaRef {
    /// Parse and validate a YouTube video URL
    pub fn parse(raw: &str) -> Result<Self, ClipError> {
        let trimmed = raw.trim();
        let invalid = || ClipError::InvalidMediaRef(trimmed.to_string());

        let url = Url::parse(trimmed).map_err(|_| invalid())?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid());
        }

        let host = url.host_str().ok_or_else(invalid)?.to_ascii_lowercase();
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let candidate = if SHORT_HOSTS.contains(&host.as_str()) {
            segments.first().map(|s| s.to_string())
        } else if YOUTUBE_HOSTS.contains(&host.as_str()) {
            match segments.as_slice() {
                ["watch"] => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                [prefix, id, ..] if PATH_PREFIXES.contains(prefix) => Some(id.to_string()),
                _ => None,
            }
        } else {
            None
        };

        match candidate {
            Some(video_id) if is_video_id(&video_id) => Ok(Self {
                url: trimmed.to_string(),
                video_id,
            }),
            _ => Err(invalid()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Thumbnail used when the metadata lookup does not report one
    pub fn fallback_thumbnail_url(&self) -> String {
        format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", self.video_id)
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == 11
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// What the metadata lookup reports about a source video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub duration_seconds: u64,
    pub thumbnail_url: String,
    pub is_accessible: bool,
    pub title: Option<String>,
}

const TOKEN_PREFIX: &str = "clip-";
const TOKEN_SUFFIX: &str = ".mp4";

/// Opaque key of a stored clip artifact, e.g. `clip-<uuid>.mp4`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClipToken(String);

impl ClipToken {
    /// Generate a fresh random token
    pub fn generate() -> Self {
        Self(format!("{}{}{}", TOKEN_PREFIX, Uuid::new_v4(), TOKEN_SUFFIX))
    }

    /// Accept only tokens of the generated shape, which also rules out path traversal
    pub fn parse(raw: &str) -> Result<Self, ClipError> {
        let body = raw
            .strip_prefix(TOKEN_PREFIX)
            .and_then(|rest| rest.strip_suffix(TOKEN_SUFFIX));

        match body {
            Some(body)
                if !body.is_empty()
                    && body.bytes().all(|b| b.is_ascii_hexdigit() || b == b'-') =>
            {
                Ok(Self(raw.to_string()))
            }
            _ => Err(ClipError::ArtifactNotFound(format!(
                "invalid clip name: {}",
                raw
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A finished clip sitting in temporary storage
#[derive(Debug, Clone, Serialize)]
pub struct ClipArtifact {
    pub token: ClipToken,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub content_type: &'static str,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful transcode
#[derive(Debug, Clone)]
pub struct TranscodeReport {
    pub output_path: PathBuf,
    pub processing_time: std::time::Duration,
}

#[cfg(test)]
mod tests;
