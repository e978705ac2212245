// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for looking up source media metadata
#[async_trait]
pub trait MetadataPort: Send + Sync {
    /// Resolve duration, thumbnail and accessibility of a video.
    ///
    /// Private, deleted, region-locked or login-gated media must come back as
    /// `ClipError::SourceUnavailable`; failures the lookup cannot explain come
    /// back as `ClipError::LookupFailed` with the tool's own message.
    async fn lookup_source(&self, media: &MediaRef) -> Result<SourceInfo, ClipError>;
}

/// Port for cutting a remote source into a standalone clip
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Cut `range` out of `media` and write an MP4 to `dest`.
    ///
    /// Dropping the returned future must stop the work.
    async fn transcode(
        &self,
        media: &MediaRef,
        range: &ClipRange,
        dest: &Path,
    ) -> Result<TranscodeReport, ClipError>;
}

/// Port for ephemeral clip storage, keyed by generated tokens
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// Reserve a fresh token and return where the clip should be written
    async fn allocate(&self) -> Result<(ClipToken, PathBuf), ClipError>;

    /// Publish a written clip under its token
    async fn commit(&self, token: &ClipToken) -> Result<ClipArtifact, ClipError>;

    /// Drop a reservation whose clip was never finished
    async fn discard(&self, token: &ClipToken) -> Result<(), ClipError>;

    /// Look up a published clip
    async fn open(&self, token: &ClipToken) -> Result<ClipArtifact, ClipError>;

    /// Remove published clips older than `max_age`, returning how many went
    async fn purge_older_than(&self, max_age: Duration) -> Result<usize, ClipError>;
}
