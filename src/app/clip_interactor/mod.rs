// Clip interactor - Orchestrates the clip request use case

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for the clip request use case
pub struct ClipInteractor {
    metadata_port: Arc<dyn MetadataPort>,
    transcode_port: Arc<dyn TranscodePort>,
    store_port: Arc<dyn ArtifactStorePort>,
    transcode_timeout: Duration,
}

impl ClipInteractor {
    /// Create new clip interactor with injected ports
    pub fn new(
        metadata_port: Arc<dyn MetadataPort>,
        transcode_port: Arc<dyn TranscodePort>,
        store_port: Arc<dyn ArtifactStorePort>,
        transcode_timeout: Duration,
    ) -> Self {
        Self {
            metadata_port,
            transcode_port,
            store_port,
            transcode_timeout,
        }
    }

    /// Execute a clip request end to end.
    ///
    /// Input that can be rejected without touching the network is rejected
    /// first; the range is then re-validated against the real source length.
    #[tracing::instrument(skip_all, fields(url = %request.url))]
    pub async fn execute(&self, request: ClipRequest) -> Result<ClipResponse, ClipError> {
        let media = MediaRef::parse(&request.url)?;
        ClipRangeValidator::precheck(&request.start_time, &request.end_time)?;

        let source = self.metadata_port.lookup_source(&media).await?;
        SourcePolicy::ensure_accessible(&media, &source)?;

        let range =
            ClipRangeValidator::validate(&request.start_time, &request.end_time, source.duration_seconds)?;
        info!(
            video_id = media.video_id(),
            range = %range,
            source_duration = source.duration_seconds,
            "Clip range accepted"
        );

        let (token, staging_path) = self.store_port.allocate().await?;

        let outcome = tokio::time::timeout(
            self.transcode_timeout,
            self.transcode_port.transcode(&media, &range, &staging_path),
        )
        .await;

        let report = match outcome {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                error!(token = %token, kind = e.kind(), error = %e, "Transcode failed");
                self.discard_quietly(&token).await;
                return Err(e);
            }
            Err(_) => {
                error!(token = %token, timeout_secs = self.transcode_timeout.as_secs(), "Transcode timed out");
                self.discard_quietly(&token).await;
                return Err(ClipError::Transcode(format!(
                    "processing timed out after {} seconds",
                    self.transcode_timeout.as_secs()
                )));
            }
        };

        let artifact = match self.store_port.commit(&token).await {
            Ok(artifact) => artifact,
            Err(e) => {
                error!(token = %token, error = %e, "Failed to store finished clip");
                self.discard_quietly(&token).await;
                return Err(e);
            }
        };
        info!(
            token = %artifact.token,
            bytes = artifact.size_bytes,
            elapsed_ms = report.processing_time.as_millis() as u64,
            "Clip ready"
        );

        Ok(ClipResponse {
            token: artifact.token.clone(),
            artifact,
            range,
            thumbnail_url: source.thumbnail_url,
            title: source.title,
            processing_time_ms: report.processing_time.as_millis() as u64,
        })
    }

    async fn discard_quietly(&self, token: &ClipToken) {
        if let Err(e) = self.store_port.discard(token).await {
            warn!(token = %token, error = %e, "Failed to discard unfinished clip");
        }
    }
}

/// Request for a clip: the three strings a user types in
#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub url: String,
    pub start_time: String,
    pub end_time: String,
}

impl ClipRequest {
    pub fn new(
        url: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// Response for a finished clip
#[derive(Debug, Clone, Serialize)]
pub struct ClipResponse {
    pub token: ClipToken,
    pub artifact: ClipArtifact,
    pub range: ClipRange,
    pub thumbnail_url: String,
    pub title: Option<String>,
    pub processing_time_ms: u64,
}
