//! yt-dlp metadata adapter
//!
//! Resolves duration, thumbnail and accessibility of a video by running
//! `yt-dlp --dump-json` and reading the single JSON document it prints.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Substrings in yt-dlp error output that mean the video cannot be used
const UNAVAILABLE_MARKERS: &[&str] = &[
    "private video",
    "video unavailable",
    "video is unavailable",
    "unavailable video",
    "login required",
    "sign in",
    "age restricted",
    "age-restricted",
    "region-locked",
    "not available in your country",
    "copyright",
    "no formats found",
    "members-only",
    "has been removed",
    "could not extract functions",
    "failed to find animation function",
];

/// `availability` values that still let us fetch the stream
const ACCESSIBLE_AVAILABILITY: &[&str] = &["public", "unlisted"];

#[derive(Debug, Deserialize)]
struct YtDlpThumbnail {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YtDlpVideo {
    title: Option<String>,
    duration: Option<f64>,
    thumbnail: Option<String>,
    #[serde(default)]
    thumbnails: Vec<YtDlpThumbnail>,
    availability: Option<String>,
    is_live: Option<bool>,
}

/// yt-dlp based metadata adapter
pub struct YtDlpMetadataAdapter {
    ytdlp_path: String,
    lookup_timeout: Duration,
}

impl YtDlpMetadataAdapter {
    /// Create new yt-dlp metadata adapter
    pub fn new(ytdlp_path: impl Into<String>, lookup_timeout: Duration) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
            lookup_timeout,
        }
    }

    /// Turn a `--dump-json` document into source info
    pub fn parse_video_json(media: &MediaRef, json: &str) -> Result<SourceInfo, ClipError> {
        let video: YtDlpVideo = serde_json::from_str(json).map_err(|e| {
            ClipError::LookupFailed(format!("unreadable metadata for {}: {}", media, e))
        })?;

        let is_live = video.is_live.unwrap_or(false);
        let duration_seconds = match video.duration {
            Some(duration) if duration.is_finite() && duration >= 0.0 => duration.floor() as u64,
            _ => {
                return Err(ClipError::SourceUnavailable(format!(
                    "{} has no known duration",
                    media.video_id()
                )))
            }
        };

        let is_accessible = !is_live
            && video
                .availability
                .as_deref()
                .map(|availability| ACCESSIBLE_AVAILABILITY.contains(&availability))
                .unwrap_or(true);

        // yt-dlp lists thumbnails smallest first
        let thumbnail_url = video
            .thumbnails
            .iter()
            .rev()
            .find_map(|thumbnail| thumbnail.url.clone())
            .or(video.thumbnail)
            .unwrap_or_else(|| media.fallback_thumbnail_url());

        Ok(SourceInfo {
            duration_seconds,
            thumbnail_url,
            is_accessible,
            title: video.title,
        })
    }

    /// Map yt-dlp error output to a domain error.
    ///
    /// Known "this video cannot be used" reports become `SourceUnavailable`;
    /// anything else keeps yt-dlp's own message so network trouble is not
    /// mistaken for a private video.
    pub fn classify_failure(stderr: &str) -> ClipError {
        let lowered = stderr.to_lowercase();
        let detail = last_error_line(stderr);

        if UNAVAILABLE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            debug!(detail = %detail, "yt-dlp reported an unavailable video");
            ClipError::SourceUnavailable(detail)
        } else {
            warn!(detail = %detail, "yt-dlp failed for an unrecognised reason");
            ClipError::LookupFailed(detail)
        }
    }
}

/// Last non-empty line, which is where yt-dlp and ffmpeg put the actual error
pub(crate) fn last_error_line(output: &str) -> String {
    output
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no error output")
        .to_string()
}

#[async_trait]
impl MetadataPort for YtDlpMetadataAdapter {
    async fn lookup_source(&self, media: &MediaRef) -> Result<SourceInfo, ClipError> {
        info!(video_id = media.video_id(), "Looking up source metadata");

        let mut command = Command::new(&self.ytdlp_path);
        command
            .arg("--dump-json")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("--skip-download")
            .arg(media.url())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(command = ?command, "Executing yt-dlp");

        let output = match tokio::time::timeout(self.lookup_timeout, command.output()).await {
            Err(_) => {
                return Err(ClipError::LookupFailed(format!(
                    "metadata lookup timed out after {}s",
                    self.lookup_timeout.as_secs()
                )))
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ClipError::ToolMissing {
                    tool: "yt-dlp".to_string(),
                })
            }
            Ok(Err(e)) => {
                return Err(ClipError::LookupFailed(format!(
                    "failed to run yt-dlp: {}",
                    e
                )))
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(Self::classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let info = Self::parse_video_json(media, &stdout)?;
        info!(
            video_id = media.video_id(),
            duration_seconds = info.duration_seconds,
            accessible = info.is_accessible,
            "Source metadata resolved"
        );
        Ok(info)
    }
}
