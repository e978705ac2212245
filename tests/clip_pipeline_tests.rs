use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clipninja::adapters::FsArtifactStore;
use clipninja::app::{AppContainer, ClipRequest, DefaultAppContainer};
use clipninja::cli::args::ClipArgs;
use clipninja::cli::commands;
use clipninja::domain::model::{ClipArtifact, SourceInfo, TranscodeReport};
use clipninja::ports::{ArtifactStorePort, MetadataPort, TranscodePort};
use clipninja::*;
use tempfile::TempDir;

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

/// Test doubles standing in for yt-dlp and ffmpeg
mod test_utils {
    use super::*;

    pub struct FakeMetadata {
        pub result: Result<SourceInfo, ClipError>,
        pub calls: AtomicUsize,
    }

    impl FakeMetadata {
        pub fn video(duration_seconds: u64) -> Self {
            Self {
                result: Ok(SourceInfo {
                    duration_seconds,
                    thumbnail_url: "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string(),
                    is_accessible: true,
                    title: Some("Test video".to_string()),
                }),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn private_video() -> Self {
            let mut fake = Self::video(212);
            if let Ok(info) = &mut fake.result {
                info.is_accessible = false;
            }
            fake
        }

        pub fn failing(err: ClipError) -> Self {
            Self {
                result: Err(err),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MetadataPort for FakeMetadata {
        async fn lookup_source(&self, _media: &MediaRef) -> Result<SourceInfo, ClipError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    pub enum TranscodeBehavior {
        Write(&'static [u8]),
        FailAfterPartialWrite,
        Hang,
    }

    pub struct FakeTranscode {
        pub behavior: TranscodeBehavior,
        pub calls: AtomicUsize,
    }

    impl FakeTranscode {
        pub fn new(behavior: TranscodeBehavior) -> Self {
            Self {
                behavior,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TranscodePort for FakeTranscode {
        async fn transcode(
            &self,
            _media: &MediaRef,
            _range: &ClipRange,
            dest: &Path,
        ) -> Result<TranscodeReport, ClipError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                TranscodeBehavior::Write(bytes) => {
                    tokio::fs::write(dest, bytes).await.unwrap();
                    Ok(TranscodeReport {
                        output_path: dest.to_path_buf(),
                        processing_time: Duration::from_millis(5),
                    })
                }
                TranscodeBehavior::FailAfterPartialWrite => {
                    tokio::fs::write(dest, b"half").await.unwrap();
                    Err(ClipError::Transcode("ffmpeg exited with status 1".to_string()))
                }
                TranscodeBehavior::Hang => {
                    tokio::fs::write(dest, b"partial").await.unwrap();
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    unreachable!("transcode should have been cancelled");
                }
            }
        }
    }

    /// Filesystem store whose publish step always fails
    pub struct UnpublishableStore {
        pub inner: FsArtifactStore,
    }

    #[async_trait]
    impl ArtifactStorePort for UnpublishableStore {
        async fn allocate(&self) -> Result<(ClipToken, std::path::PathBuf), ClipError> {
            self.inner.allocate().await
        }

        async fn commit(&self, _token: &ClipToken) -> Result<ClipArtifact, ClipError> {
            Err(ClipError::Storage("disk full".to_string()))
        }

        async fn discard(&self, token: &ClipToken) -> Result<(), ClipError> {
            self.inner.discard(token).await
        }

        async fn open(&self, token: &ClipToken) -> Result<ClipArtifact, ClipError> {
            self.inner.open(token).await
        }

        async fn purge_older_than(&self, max_age: Duration) -> Result<usize, ClipError> {
            self.inner.purge_older_than(max_age).await
        }
    }

    pub fn container(
        dir: &TempDir,
        metadata: Arc<FakeMetadata>,
        transcode: Arc<FakeTranscode>,
        timeout: Duration,
    ) -> DefaultAppContainer {
        let store = Arc::new(FsArtifactStore::new(dir.path().join("clips")).unwrap());
        DefaultAppContainer::with_ports(metadata, transcode, store, timeout)
    }

    pub fn stored_files(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.path().join("clips"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

use test_utils::*;

#[tokio::test]
async fn test_successful_clip_is_stored_under_token() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"mp4 data")));
    let container = container(&dir, metadata.clone(), transcode.clone(), Duration::from_secs(5));

    let response = container
        .clip_interactor()
        .execute(ClipRequest::new(VIDEO_URL, "00:00:10", "1:40"))
        .await
        .unwrap();

    assert!(response.token.as_str().starts_with("clip-"));
    assert!(response.token.as_str().ends_with(".mp4"));
    assert_eq!(response.range.start().seconds, 10);
    assert_eq!(response.range.duration_seconds(), 90);
    assert_eq!(response.artifact.size_bytes, 8);
    assert_eq!(response.title.as_deref(), Some("Test video"));
    assert_eq!(stored_files(&dir), vec![response.token.to_string()]);

    let described = container
        .artifact_interactor()
        .describe(response.token.as_str())
        .await
        .unwrap();
    assert_eq!(described.path, response.artifact.path);
}

#[tokio::test]
async fn test_fetch_copies_into_directory() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"mp4 data")));
    let container = container(&dir, metadata, transcode, Duration::from_secs(5));

    let response = container
        .clip_interactor()
        .execute(ClipRequest::new(VIDEO_URL, "0", "30"))
        .await
        .unwrap();

    let saved = container
        .artifact_interactor()
        .fetch(response.token.as_str(), out.path())
        .await
        .unwrap();

    assert_eq!(saved, out.path().join(response.token.as_str()));
    assert_eq!(std::fs::read(&saved).unwrap(), b"mp4 data");
}

#[tokio::test]
async fn test_end_past_source_is_rejected_before_transcode() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"x")));
    let container = container(&dir, metadata.clone(), transcode.clone(), Duration::from_secs(5));

    let err = container
        .clip_interactor()
        .execute(ClipRequest::new(VIDEO_URL, "3:00", "3:40"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClipError::RangeExceeded {
            source_duration: "00:03:32".to_string()
        }
    );
    assert_eq!(err.user_message(), "End time exceeds video duration (00:03:32).");
    assert_eq!(metadata.calls.load(Ordering::SeqCst), 1);
    assert_eq!(transcode.calls.load(Ordering::SeqCst), 0);
    assert!(stored_files(&dir).is_empty());
}

#[tokio::test]
async fn test_bad_times_fail_without_lookup() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"x")));
    let container = container(&dir, metadata.clone(), transcode, Duration::from_secs(5));
    let interactor = container.clip_interactor();

    let err = interactor
        .execute(ClipRequest::new(VIDEO_URL, "00:01:00", "00:00:30"))
        .await
        .unwrap_err();
    assert_eq!(err, ClipError::Ordering);

    let err = interactor
        .execute(ClipRequest::new(VIDEO_URL, "0", "301"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClipError::DurationExceeded { duration: 301, .. }));

    let err = interactor
        .execute(ClipRequest::new(VIDEO_URL, "1:60", "2:30"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClipError::Format {
            field: TimeField::Start,
            issue: FormatIssue::MinuteSecondOverflow,
            ..
        }
    ));

    assert_eq!(metadata.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_url_is_bad_input() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"x")));
    let container = container(&dir, metadata.clone(), transcode, Duration::from_secs(5));

    let err = container
        .clip_interactor()
        .execute(ClipRequest::new("https://vimeo.com/12345", "0", "10"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClipError::InvalidMediaRef(_)));
    assert_eq!(err.class(), ErrorClass::BadInput);
    assert_eq!(metadata.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_inaccessible_source_is_reported() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::private_video());
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"x")));
    let container = container(&dir, metadata, transcode.clone(), Duration::from_secs(5));

    let err = container
        .clip_interactor()
        .execute(ClipRequest::new(VIDEO_URL, "0", "10"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClipError::SourceUnavailable(_)));
    assert_eq!(err.class().exit_code(), 3);
    assert_eq!(transcode.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_lookup_failure_propagates() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::failing(ClipError::ToolMissing {
        tool: "yt-dlp".to_string(),
    }));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"x")));
    let container = container(&dir, metadata, transcode, Duration::from_secs(5));

    let err = container
        .clip_interactor()
        .execute(ClipRequest::new(VIDEO_URL, "0", "10"))
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::ProcessingFailure);
    assert!(err.to_string().contains("yt-dlp not found"));
}

#[tokio::test]
async fn test_failed_transcode_leaves_nothing_behind() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::FailAfterPartialWrite));
    let container = container(&dir, metadata, transcode.clone(), Duration::from_secs(5));

    let err = container
        .clip_interactor()
        .execute(ClipRequest::new(VIDEO_URL, "0", "10"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClipError::Transcode(_)));
    assert_eq!(transcode.calls.load(Ordering::SeqCst), 1);
    assert!(stored_files(&dir).is_empty());
}

#[tokio::test]
async fn test_transcode_timeout_is_processing_failure() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Hang));
    let container = container(&dir, metadata, transcode, Duration::from_millis(200));

    let err = container
        .clip_interactor()
        .execute(ClipRequest::new(VIDEO_URL, "0", "10"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClipError::Transcode(ref msg) if msg.contains("timed out")));
    assert_eq!(err.class(), ErrorClass::ProcessingFailure);
    assert!(stored_files(&dir).is_empty());
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"x")));
    let container = container(&dir, metadata, transcode, Duration::from_secs(5));
    let artifacts = container.artifact_interactor();

    let missing = ClipToken::generate();
    let err = artifacts.describe(missing.as_str()).await.unwrap_err();
    assert!(matches!(err, ClipError::ArtifactNotFound(_)));

    let err = artifacts.describe("../../etc/passwd").await.unwrap_err();
    assert!(matches!(err, ClipError::ArtifactNotFound(_)));
}

#[tokio::test]
async fn test_purge_with_zero_age_removes_clips() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"mp4 data")));
    let container = container(&dir, metadata, transcode, Duration::from_secs(5));

    container
        .clip_interactor()
        .execute(ClipRequest::new(VIDEO_URL, "0", "10"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let removed = container
        .artifact_interactor()
        .purge(Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert!(stored_files(&dir).is_empty());
}

#[tokio::test]
async fn test_failed_commit_leaves_nothing_behind() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(UnpublishableStore {
        inner: FsArtifactStore::new(dir.path().join("clips")).unwrap(),
    });
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"mp4 data")));
    let container = DefaultAppContainer::with_ports(metadata, transcode.clone(), store, Duration::from_secs(5));

    let err = container
        .clip_interactor()
        .execute(ClipRequest::new(VIDEO_URL, "0", "10"))
        .await
        .unwrap_err();

    assert_eq!(err, ClipError::Storage("disk full".to_string()));
    assert_eq!(transcode.calls.load(Ordering::SeqCst), 1);
    assert!(stored_files(&dir).is_empty());
}

#[tokio::test]
async fn test_failed_copy_still_names_stored_clip() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::video(212));
    let transcode = Arc::new(FakeTranscode::new(TranscodeBehavior::Write(b"mp4 data")));
    let container = container(&dir, metadata, transcode, Duration::from_secs(5));

    let args = ClipArgs {
        url: VIDEO_URL.to_string(),
        start: "0".to_string(),
        end: "10".to_string(),
        dest: Some(dir.path().join("no-such-dir").join("out.mp4")),
        timeout_secs: None,
        json: false,
    };
    let err = commands::clip(&container, args).await.unwrap_err();

    let stored = stored_files(&dir);
    assert_eq!(stored.len(), 1);
    assert!(matches!(err, ClipError::Storage(_)));
    assert!(err.user_message().contains(&stored[0]));
}

