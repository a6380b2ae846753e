//! Transient artifact store.
//!
//! Rotated results are handed to a store in exchange for a fresh [`Locator`].
//! Lifecycle is entirely caller-driven: the store performs no eviction and
//! no expiry, so whoever holds the locator must delete it when done. Two
//! backings are provided:
//!
//! - [`MemoryStore`] - in-memory map, the default
//! - [`TempDirStore`] - PNG files in a scratch directory, with a sweep for
//!   files left behind by a crashed process

mod memory;
mod tempdir;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use quarterturn_core::Raster;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use tempdir::TempDirStore;

/// Opaque handle to a stored artifact.
///
/// Fresh per `put`, never reused while the artifact is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator(Uuid);

impl Locator {
    /// Generate a fresh locator.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Locator {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A rotated image held by the store.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    /// The handle under which the artifact is stored.
    pub locator: Locator,
    /// The rotated pixel data.
    pub raster: Raster,
}

/// Errors produced by the artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No artifact exists under the given locator.
    #[error("no artifact for locator {0}")]
    NotFound(Locator),

    /// The configured capacity is reached; the artifact was not inserted.
    #[error("store capacity of {capacity} artifacts exhausted")]
    Exhausted { capacity: usize },

    /// Filesystem failure in a file-backed store.
    #[error("store io failure during {operation}: {reason}")]
    Io {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Underlying error text.
        reason: String,
    },

    /// Artifact bytes could not be encoded or decoded.
    #[error("artifact codec failure: {0}")]
    Codec(String),
}

/// Store contract: insert, retrieve, delete.
///
/// Implementations must be safe to call from concurrently running requests,
/// and `get` must never observe a partially written artifact.
pub trait ArtifactStore: Send + Sync {
    /// Insert a rotated raster, transferring ownership to the store.
    ///
    /// Returns the fresh locator for the new artifact. Fails with
    /// [`StoreError::Exhausted`] if a configured capacity is reached, in
    /// which case nothing was inserted.
    fn put(&self, raster: Raster) -> Result<Locator, StoreError>;

    /// Retrieve the artifact stored under `locator`.
    ///
    /// Fails with [`StoreError::NotFound`] if the locator is absent.
    fn get(&self, locator: &Locator) -> Result<Arc<ImageArtifact>, StoreError>;

    /// Remove the artifact stored under `locator`. No-op if absent.
    fn delete(&self, locator: &Locator);
}
