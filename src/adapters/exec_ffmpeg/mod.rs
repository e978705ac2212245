//! FFmpeg execution adapter
//!
//! Streams the source through `yt-dlp -o -` straight into ffmpeg, which cuts
//! `[start, start + duration]` and writes a fast-start MP4. Both children are
//! spawned with `kill_on_drop`, so dropping the transcode future cancels it.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::adapters::probe_ytdlp::last_error_line;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

const PREMATURE_END_MESSAGE: &str = "The video stream ended unexpectedly during processing. \
    This can occur with live streams or certain protected content.";

/// FFmpeg-based transcode adapter
pub struct FfmpegTranscodeAdapter {
    ytdlp_path: String,
    ffmpeg_path: String,
    video_format: String,
    threads: usize,
}

impl FfmpegTranscodeAdapter {
    /// Create new FFmpeg adapter
    pub fn new(
        ytdlp_path: impl Into<String>,
        ffmpeg_path: impl Into<String>,
        video_format: impl Into<String>,
        threads: usize,
    ) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
            ffmpeg_path: ffmpeg_path.into(),
            video_format: video_format.into(),
            threads,
        }
    }

    /// Arguments for the source download, writing the stream to stdout
    pub fn source_args(&self, media: &MediaRef) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.video_format.clone(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--quiet".to_string(),
            "-o".to_string(),
            "-".to_string(),
            media.url().to_string(),
        ]
    }

    /// Arguments for the cut, reading the source from stdin
    pub fn ffmpeg_args(&self, range: &ClipRange, dest: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
            "-ss".to_string(),
            range.start().seconds.to_string(),
            "-i".to_string(),
            "pipe:0".to_string(),
            "-t".to_string(),
            range.duration_seconds().to_string(),
            "-threads".to_string(),
            self.threads.to_string(),
            "-movflags".to_string(),
            "faststart".to_string(),
            "-f".to_string(),
            "mp4".to_string(),
            dest.to_string_lossy().to_string(),
        ]
    }

    /// Map ffmpeg error output to a domain error
    pub fn classify_ffmpeg_failure(stderr: &str) -> ClipError {
        if stderr.to_lowercase().contains("premature end of stream") {
            ClipError::Transcode(PREMATURE_END_MESSAGE.to_string())
        } else {
            ClipError::Transcode(last_error_line(stderr))
        }
    }
}

/// Whether the source only failed because ffmpeg stopped reading early
fn is_broken_pipe(stderr: &str) -> bool {
    let lowered = stderr.to_lowercase();
    lowered.contains("broken pipe") || lowered.contains("errno 32")
}

/// Decide the transcode outcome from both exit statuses.
///
/// ffmpeg closes its input once `-t` is satisfied, so the source normally
/// dies with a broken pipe on any clip that ends before the video does. Its
/// status only matters when ffmpeg itself failed.
fn settle_exit(
    ffmpeg_ok: bool,
    ffmpeg_stderr: &str,
    source_failure: Option<&str>,
) -> Result<(), ClipError> {
    if ffmpeg_ok {
        if let Some(stderr) = source_failure.filter(|stderr| !is_broken_pipe(stderr)) {
            warn!(detail = %last_error_line(stderr), "Source stream failed after ffmpeg finished");
        }
        return Ok(());
    }

    error!(detail = %last_error_line(ffmpeg_stderr), "ffmpeg failed");
    if ffmpeg_stderr.to_lowercase().contains("premature end of stream") {
        return Err(FfmpegTranscodeAdapter::classify_ffmpeg_failure(ffmpeg_stderr));
    }

    match source_failure.filter(|stderr| !is_broken_pipe(stderr)) {
        Some(stderr) => {
            error!(detail = %last_error_line(stderr), "Source stream failed");
            Err(ClipError::Transcode(last_error_line(stderr)))
        }
        None => Err(FfmpegTranscodeAdapter::classify_ffmpeg_failure(ffmpeg_stderr)),
    }
}

fn spawn_error(tool: &str, e: std::io::Error) -> ClipError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ClipError::ToolMissing {
            tool: tool.to_string(),
        }
    } else {
        ClipError::Transcode(format!("failed to start {}: {}", tool, e))
    }
}

#[async_trait]
impl TranscodePort for FfmpegTranscodeAdapter {
    async fn transcode(
        &self,
        media: &MediaRef,
        range: &ClipRange,
        dest: &Path,
    ) -> Result<TranscodeReport, ClipError> {
        let started = Instant::now();
        info!(
            video_id = media.video_id(),
            start = range.start().seconds,
            duration = range.duration_seconds(),
            "Starting transcode"
        );

        let mut source = Command::new(&self.ytdlp_path)
            .args(self.source_args(media))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error("yt-dlp", e))?;

        let source_stdout: Stdio = source
            .stdout
            .take()
            .ok_or_else(|| ClipError::Transcode("source stream was not captured".to_string()))?
            .try_into()
            .map_err(|e: std::io::Error| ClipError::Transcode(e.to_string()))?;

        let ffmpeg_args = self.ffmpeg_args(range, dest);
        debug!(args = ?ffmpeg_args, "Executing ffmpeg");

        let ffmpeg = Command::new(&self.ffmpeg_path)
            .args(&ffmpeg_args)
            .stdin(source_stdout)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error("ffmpeg", e))?;

        let (ffmpeg_output, source_output) =
            tokio::join!(ffmpeg.wait_with_output(), source.wait_with_output());

        let ffmpeg_output =
            ffmpeg_output.map_err(|e| ClipError::Transcode(format!("ffmpeg did not finish: {}", e)))?;
        let source_failure = match &source_output {
            Ok(output) if output.status.success() => None,
            Ok(output) => Some(String::from_utf8_lossy(&output.stderr).into_owned()),
            Err(e) => Some(format!("source stream did not finish: {}", e)),
        };

        settle_exit(
            ffmpeg_output.status.success(),
            &String::from_utf8_lossy(&ffmpeg_output.stderr),
            source_failure.as_deref(),
        )?;

        let written = tokio::fs::metadata(dest).await.map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(ClipError::Transcode("ffmpeg produced no output".to_string()));
        }

        let processing_time = started.elapsed();
        info!(
            bytes = written,
            elapsed_ms = processing_time.as_millis() as u64,
            "Transcode finished"
        );

        Ok(TranscodeReport {
            output_path: dest.to_path_buf(),
            processing_time,
        })
    }
}
