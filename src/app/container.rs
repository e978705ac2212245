use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{AppConfig, FfmpegTranscodeAdapter, FsArtifactStore, YtDlpMetadataAdapter};
use crate::app::{artifact_interactor::ArtifactInteractor, clip_interactor::ClipInteractor};
use crate::domain::errors::ClipError;
use crate::ports::{ArtifactStorePort, MetadataPort, TranscodePort};

/// Metadata lookups are short; they only read the video page
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(60);

pub trait AppContainer: Send + Sync {
    fn clip_interactor(&self) -> Arc<ClipInteractor>;
    fn artifact_interactor(&self) -> Arc<ArtifactInteractor>;
}

pub struct DefaultAppContainer {
    clip_interactor: Arc<ClipInteractor>,
    artifact_interactor: Arc<ArtifactInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Result<Self, ClipError> {
        let metadata_port = Arc::new(YtDlpMetadataAdapter::new(
            config.ytdlp_path.clone(),
            LOOKUP_TIMEOUT,
        ));
        let transcode_port = Arc::new(FfmpegTranscodeAdapter::new(
            config.ytdlp_path.clone(),
            config.ffmpeg_path.clone(),
            config.video_format.clone(),
            config.ffmpeg_threads,
        ));
        let store_port = Arc::new(FsArtifactStore::new(config.storage_dir.clone())?);

        Ok(Self::with_ports(
            metadata_port,
            transcode_port,
            store_port,
            Duration::from_secs(config.transcode_timeout_secs),
        ))
    }

    /// Wire interactors around arbitrary port implementations
    pub fn with_ports(
        metadata_port: Arc<dyn MetadataPort>,
        transcode_port: Arc<dyn TranscodePort>,
        store_port: Arc<dyn ArtifactStorePort>,
        transcode_timeout: Duration,
    ) -> Self {
        let clip_interactor = Arc::new(ClipInteractor::new(
            metadata_port,
            transcode_port,
            Arc::clone(&store_port),
            transcode_timeout,
        ));

        let artifact_interactor = Arc::new(ArtifactInteractor::new(store_port));

        Self {
            clip_interactor,
            artifact_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn clip_interactor(&self) -> Arc<ClipInteractor> {
        Arc::clone(&self.clip_interactor)
    }

    fn artifact_interactor(&self) -> Arc<ArtifactInteractor> {
        Arc::clone(&self.artifact_interactor)
    }
}
