// Filesystem artifact store - Finished clips kept in a temp directory, keyed by token

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

const STAGING_SUFFIX: &str = ".part";
const CONTENT_TYPE: &str = "video/mp4";

/// Filesystem-backed artifact store
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Create the store, making sure its directory exists
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ClipError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            ClipError::Storage(format!(
                "Failed to create clip directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn published_path(&self, token: &ClipToken) -> PathBuf {
        self.root.join(token.as_str())
    }

    fn staging_path(&self, token: &ClipToken) -> PathBuf {
        self.root
            .join(format!("{}{}", token.as_str(), STAGING_SUFFIX))
    }

    fn artifact_from_metadata(
        token: &ClipToken,
        path: PathBuf,
        metadata: &std::fs::Metadata,
    ) -> ClipArtifact {
        let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
        ClipArtifact {
            token: token.clone(),
            path,
            size_bytes: metadata.len(),
            content_type: CONTENT_TYPE,
            created_at: DateTime::<Utc>::from(modified),
        }
    }
}

/// Whether a directory entry is something the store owns
fn is_store_file(name: &str) -> bool {
    let published = name.strip_suffix(STAGING_SUFFIX).unwrap_or(name);
    ClipToken::parse(published).is_ok()
}

fn purge_dir(root: &Path, max_age: Duration) -> Result<usize, ClipError> {
    let max_age = chrono::Duration::from_std(max_age)
        .map_err(|e| ClipError::Storage(format!("Retention period out of range: {}", e)))?;
    let now = Utc::now();
    let mut removed = 0;

    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry during purge");
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy();
        if !entry.file_type().is_file() || !is_store_file(&name) {
            continue;
        }

        let modified = match entry.metadata().ok().and_then(|m| m.modified().ok()) {
            Some(modified) => DateTime::<Utc>::from(modified),
            None => continue,
        };

        if now.signed_duration_since(modified) > max_age {
            match std::fs::remove_file(entry.path()) {
                Ok(()) => {
                    debug!(file = %name, "Purged expired clip");
                    removed += 1;
                }
                Err(e) => warn!(file = %name, error = %e, "Failed to purge clip"),
            }
        }
    }

    Ok(removed)
}

#[async_trait]
impl ArtifactStorePort for FsArtifactStore {
    async fn allocate(&self) -> Result<(ClipToken, PathBuf), ClipError> {
        let token = ClipToken::generate();
        let staging = self.staging_path(&token);
        debug!(token = %token, path = %staging.display(), "Allocated clip slot");
        Ok((token, staging))
    }

    async fn commit(&self, token: &ClipToken) -> Result<ClipArtifact, ClipError> {
        let staging = self.staging_path(token);
        let published = self.published_path(token);

        tokio::fs::rename(&staging, &published).await.map_err(|e| {
            ClipError::Storage(format!("Failed to publish clip {}: {}", token, e))
        })?;

        let metadata = tokio::fs::metadata(&published)
            .await
            .map_err(|e| ClipError::Storage(format!("Failed to stat clip {}: {}", token, e)))?;

        info!(token = %token, bytes = metadata.len(), "Clip stored");
        Ok(Self::artifact_from_metadata(token, published, &metadata))
    }

    async fn discard(&self, token: &ClipToken) -> Result<(), ClipError> {
        match tokio::fs::remove_file(self.staging_path(token)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClipError::Storage(format!(
                "Failed to discard clip {}: {}",
                token, e
            ))),
        }
    }

    async fn open(&self, token: &ClipToken) -> Result<ClipArtifact, ClipError> {
        let path = self.published_path(token);
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {
                Ok(Self::artifact_from_metadata(token, path, &metadata))
            }
            Ok(_) => Err(ClipError::ArtifactNotFound(token.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ClipError::ArtifactNotFound(token.to_string()))
            }
            Err(e) => Err(ClipError::Storage(format!(
                "Failed to read clip {}: {}",
                token, e
            ))),
        }
    }

    async fn purge_older_than(&self, max_age: Duration) -> Result<usize, ClipError> {
        let root = self.root.clone();
        let removed = tokio::task::spawn_blocking(move || purge_dir(&root, max_age))
            .await
            .map_err(|e| ClipError::Storage(format!("Purge task failed: {}", e)))??;

        info!(removed, "Purged expired clips");
        Ok(removed)
    }
}
