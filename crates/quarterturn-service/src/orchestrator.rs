//! Rotation request orchestration.
//!
//! [`Rotator::submit`] accepts a source locator and an angle, returns
//! immediately, and runs the request on the Tokio runtime: resolve the
//! source (fetch or file read), normalize the angle, rotate on the blocking
//! pool, persist into the artifact store. The outcome, a fresh [`Locator`]
//! or a [`RotateError`], is delivered exactly once through the returned
//! [`RotationTicket`].
//!
//! Requests are independent: submitting the same parameters twice performs
//! two transforms and yields two artifacts under distinct locators, and no
//! completion ordering is guaranteed across in-flight requests. A failed
//! request never leaves a partial artifact in the store.

use std::sync::Arc;

use quarterturn_core::{decode_image, normalize, rotate};
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::RotatorConfig;
use crate::error::{RotateError, RotateResult};
use crate::fetch::{FetchError, SourceFetcher};
use crate::source::SourceKind;
use crate::store::{ArtifactStore, Locator};

/// One-shot completion handle for a submitted rotation.
///
/// Await [`RotationTicket::outcome`] for the result. Dropping the ticket
/// detaches the caller: the request still runs to completion, and its
/// artifact, if any, sits in the store under a locator nobody holds.
#[derive(Debug)]
pub struct RotationTicket {
    receiver: oneshot::Receiver<RotateResult<Locator>>,
}

impl RotationTicket {
    /// Wait for the request to finish.
    pub async fn outcome(self) -> RotateResult<Locator> {
        match self.receiver.await {
            Ok(result) => result,
            // The worker sends exactly once before exiting; a lost sender
            // means the runtime tore the task down mid-flight
            Err(_) => Err(RotateError::SourceUnavailable {
                reason: "rotation task ended without reporting".to_string(),
            }),
        }
    }
}

/// Asynchronous rotation orchestrator.
///
/// Collaborators are injected at construction: a [`SourceFetcher`] for
/// remote locators and an [`ArtifactStore`] for results. Tests substitute
/// doubles for either.
pub struct Rotator {
    fetcher: Arc<dyn SourceFetcher>,
    store: Arc<dyn ArtifactStore>,
    config: RotatorConfig,
}

impl Rotator {
    /// Create an orchestrator with default configuration.
    pub fn new(fetcher: Arc<dyn SourceFetcher>, store: Arc<dyn ArtifactStore>) -> Self {
        Self::with_config(fetcher, store, RotatorConfig::default())
    }

    /// Create an orchestrator with explicit configuration.
    pub fn with_config(
        fetcher: Arc<dyn SourceFetcher>,
        store: Arc<dyn ArtifactStore>,
        config: RotatorConfig,
    ) -> Self {
        Self {
            fetcher,
            store,
            config,
        }
    }

    /// The artifact store backing this orchestrator.
    ///
    /// Callers retrieve and delete their rotated artifacts through it.
    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Submit a rotation request.
    ///
    /// Returns immediately; the request runs on the runtime. `angle_degrees`
    /// may be any signed multiple of 90; negative values rotate
    /// counter-clockwise. Off-multiple angles fail the request with an
    /// invalid-angle error rather than being rounded.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self, source_locator: impl Into<String>, angle_degrees: i32) -> RotationTicket {
        let source = source_locator.into();
        let (sender, receiver) = oneshot::channel();

        let fetcher = Arc::clone(&self.fetcher);
        let store = Arc::clone(&self.store);
        let config = self.config.clone();

        info!(source = %source, angle_degrees, "rotation request accepted");
        tokio::spawn(async move {
            let result = run_request(fetcher, store, &config, &source, angle_degrees).await;
            match &result {
                Ok(locator) => info!(source = %source, %locator, "rotation complete"),
                Err(error) => {
                    warn!(source = %source, kind = %error.kind(), %error, "rotation failed");
                }
            }
            // The caller may have dropped its ticket; the outcome stands either way
            let _ = sender.send(result);
        });

        RotationTicket { receiver }
    }
}

async fn run_request(
    fetcher: Arc<dyn SourceFetcher>,
    store: Arc<dyn ArtifactStore>,
    config: &RotatorConfig,
    source: &str,
    angle_degrees: i32,
) -> RotateResult<Locator> {
    let bytes = resolve_source(fetcher.as_ref(), config, source).await?;
    debug!(source, len = bytes.len(), "source resolved");

    // Decode, rotate and persist on the blocking pool; the transform is
    // CPU-bound and must not stall request intake
    let joined = tokio::task::spawn_blocking(move || -> RotateResult<Locator> {
        let raster = decode_image(&bytes).map_err(|e| RotateError::SourceUnavailable {
            reason: e.to_string(),
        })?;
        let step = normalize(angle_degrees)?;
        let rotated = rotate(&raster, step);
        let locator = store.put(rotated)?;
        Ok(locator)
    })
    .await;

    match joined {
        Ok(result) => result,
        // A panicking transform still resolves the request with a failure
        Err(e) => Err(RotateError::SourceUnavailable {
            reason: format!("transform worker aborted: {e}"),
        }),
    }
}

async fn resolve_source(
    fetcher: &dyn SourceFetcher,
    config: &RotatorConfig,
    source: &str,
) -> RotateResult<Vec<u8>> {
    match SourceKind::parse(source) {
        SourceKind::Remote(url) => match timeout(config.fetch_timeout, fetcher.fetch(&url)).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(error)) => Err(RotateError::FetchFailure(error)),
            Err(_) => Err(RotateError::FetchFailure(FetchError::TimedOut {
                url,
                seconds: config.fetch_timeout.as_secs(),
            })),
        },
        SourceKind::Local(path) => {
            tokio::fs::read(&path)
                .await
                .map_err(|e| RotateError::SourceUnavailable {
                    reason: format!("{}: {e}", path.display()),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use quarterturn_core::encode_png;
    use std::io::Write;
    use std::time::Duration;

    /// Fetch double serving fixed bytes for any URL.
    struct StaticFetcher {
        bytes: Vec<u8>,
    }

    #[async_trait]
    impl SourceFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Ok(self.bytes.clone())
        }
    }

    /// Fetch double that always fails at the transport level.
    struct UnreachableFetcher;

    #[async_trait]
    impl SourceFetcher for UnreachableFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::Transport {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    /// Fetch double that never completes in time.
    struct StallingFetcher;

    #[async_trait]
    impl SourceFetcher for StallingFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    /// PNG bytes for a gradient image of the given size.
    fn png_source(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        encode_png(&pixels, width, height).unwrap()
    }

    fn rotator_serving(bytes: Vec<u8>) -> (Rotator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let rotator = Rotator::new(
            Arc::new(StaticFetcher { bytes }),
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
        );
        (rotator, store)
    }

    const REMOTE: &str = "https://example.com/poster.png";

    #[tokio::test]
    async fn test_quarter_turn_swaps_stored_dimensions() {
        let (rotator, store) = rotator_serving(png_source(150, 240));

        let locator = rotator.submit(REMOTE, 90).outcome().await.unwrap();
        let artifact = store.get(&locator).unwrap();
        assert_eq!(artifact.raster.width, 240);
        assert_eq!(artifact.raster.height, 150);
    }

    #[tokio::test]
    async fn test_counter_clockwise_also_swaps() {
        let (rotator, store) = rotator_serving(png_source(150, 240));

        let locator = rotator.submit(REMOTE, -90).outcome().await.unwrap();
        let artifact = store.get(&locator).unwrap();
        assert_eq!(artifact.raster.width, 240);
        assert_eq!(artifact.raster.height, 150);
    }

    #[tokio::test]
    async fn test_half_turn_preserves_dimensions() {
        let (rotator, store) = rotator_serving(png_source(150, 240));

        let locator = rotator.submit(REMOTE, 180).outcome().await.unwrap();
        let artifact = store.get(&locator).unwrap();
        assert_eq!(artifact.raster.width, 150);
        assert_eq!(artifact.raster.height, 240);
    }

    #[tokio::test]
    async fn test_zero_angle_still_creates_artifact() {
        let (rotator, store) = rotator_serving(png_source(8, 5));

        let locator = rotator.submit(REMOTE, 0).outcome().await.unwrap();
        assert_eq!(store.len(), 1);
        let artifact = store.get(&locator).unwrap();
        assert_eq!((artifact.raster.width, artifact.raster.height), (8, 5));
    }

    #[tokio::test]
    async fn test_invalid_angle_fails_without_touching_store() {
        let (rotator, store) = rotator_serving(png_source(8, 5));

        let error = rotator.submit(REMOTE, 45).outcome().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidAngle);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_fetch_failure() {
        let store = Arc::new(MemoryStore::new());
        let rotator = Rotator::new(
            Arc::new(UnreachableFetcher),
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
        );

        let error = rotator.submit(REMOTE, 90).outcome().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FetchFailure);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_remote_times_out_as_fetch_failure() {
        let store = Arc::new(MemoryStore::new());
        let rotator = Rotator::with_config(
            Arc::new(StallingFetcher),
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
            RotatorConfig {
                fetch_timeout: Duration::from_secs(5),
            },
        );

        let error = rotator.submit(REMOTE, 90).outcome().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FetchFailure);
        assert!(matches!(
            error,
            RotateError::FetchFailure(FetchError::TimedOut { seconds: 5, .. })
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_source_is_unavailable() {
        let (rotator, store) = rotator_serving(b"not an image at all".to_vec());

        let error = rotator.submit(REMOTE, 90).outcome().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SourceUnavailable);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_local_file_is_unavailable() {
        let (rotator, store) = rotator_serving(Vec::new());

        let ticket = rotator.submit("/definitely/not/here.png", 90);
        let error = ticket.outcome().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SourceUnavailable);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_local_file_rotation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&png_source(6, 4)).unwrap();
        file.flush().unwrap();

        let (rotator, store) = rotator_serving(Vec::new());
        let path = file.path().to_str().unwrap().to_string();

        let locator = rotator.submit(path.clone(), 90).outcome().await.unwrap();
        let artifact = store.get(&locator).unwrap();
        assert_eq!((artifact.raster.width, artifact.raster.height), (4, 6));

        // file:// form resolves to the same file
        let uri = format!("file://{path}");
        let locator = rotator.submit(uri, 180).outcome().await.unwrap();
        let artifact = store.get(&locator).unwrap();
        assert_eq!((artifact.raster.width, artifact.raster.height), (6, 4));
    }

    #[tokio::test]
    async fn test_concurrent_submissions_are_independent() {
        let (rotator, store) = rotator_serving(png_source(10, 20));

        let first = rotator.submit(REMOTE, 90);
        let second = rotator.submit(REMOTE, 90);

        let a = first.outcome().await.unwrap();
        let b = second.outcome().await.unwrap();

        // Same parameters, two fresh artifacts
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);

        // Each is independently deletable
        store.delete(&a);
        assert!(store.get(&a).is_err());
        let artifact = store.get(&b).unwrap();
        assert_eq!((artifact.raster.width, artifact.raster.height), (20, 10));
    }

    #[tokio::test]
    async fn test_store_exhaustion_is_store_failure() {
        let store = Arc::new(MemoryStore::with_capacity(1));
        let rotator = Rotator::new(
            Arc::new(StaticFetcher {
                bytes: png_source(4, 4),
            }),
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
        );

        rotator.submit(REMOTE, 90).outcome().await.unwrap();
        let error = rotator.submit(REMOTE, 90).outcome().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::StoreFailure);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_rotated_pixels_match_direct_rotation() {
        let bytes = png_source(9, 7);
        let (rotator, store) = rotator_serving(bytes.clone());

        let locator = rotator.submit(REMOTE, 270).outcome().await.unwrap();
        let artifact = store.get(&locator).unwrap();

        let expected = rotate(
            &decode_image(&bytes).unwrap(),
            normalize(270).unwrap(),
        );
        assert_eq!(artifact.raster, expected);
    }
}
