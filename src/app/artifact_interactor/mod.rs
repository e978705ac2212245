// Artifact interactor - Serving and expiring stored clips

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Interactor for stored clip retrieval and retention
pub struct ArtifactInteractor {
    store_port: Arc<dyn ArtifactStorePort>,
}

impl ArtifactInteractor {
    /// Create new artifact interactor with injected store
    pub fn new(store_port: Arc<dyn ArtifactStorePort>) -> Self {
        Self { store_port }
    }

    /// Look up a stored clip by the name handed out when it was made
    pub async fn describe(&self, raw_token: &str) -> Result<ClipArtifact, ClipError> {
        let token = ClipToken::parse(raw_token)?;
        self.store_port.open(&token).await
    }

    /// Copy a stored clip to `dest`. A directory destination keeps the clip's name.
    pub async fn fetch(&self, raw_token: &str, dest: &Path) -> Result<PathBuf, ClipError> {
        let artifact = self.describe(raw_token).await?;

        let target = if dest.is_dir() {
            dest.join(artifact.token.as_str())
        } else {
            dest.to_path_buf()
        };

        tokio::fs::copy(&artifact.path, &target).await.map_err(|e| {
            ClipError::Storage(format!(
                "Failed to copy clip to {}: {}",
                target.display(),
                e
            ))
        })?;

        info!(token = %artifact.token, dest = %target.display(), bytes = artifact.size_bytes, "Clip delivered");
        Ok(target)
    }

    /// Apply the retention policy
    pub async fn purge(&self, max_age: Duration) -> Result<usize, ClipError> {
        self.store_port.purge_older_than(max_age).await
    }
}
