//! File-backed artifact store.
//!
//! Artifacts are written as PNG files with a recognizable name prefix into a
//! scratch directory. PNG keeps the round-trip lossless, so `get` returns
//! exactly the pixels that were put.
//!
//! Writes go to a `.part` file first and are renamed into place, so a
//! concurrent `get` either misses the artifact or sees it complete.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use quarterturn_core::{decode_image, encode_raster, Raster};
use tracing::warn;

use super::{ArtifactStore, ImageArtifact, Locator, StoreError};

/// Filename prefix for every file this store writes.
const ARTIFACT_PREFIX: &str = "quarterturn_rotated_";

/// Artifact store backed by PNG files in a scratch directory.
#[derive(Debug)]
pub struct TempDirStore {
    dir: PathBuf,
}

impl TempDirStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// Leftover artifacts from an earlier process are swept on open: a
    /// crashed process cannot come back to delete its locators, so its
    /// prefixed files would otherwise accumulate forever.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            operation: "create_dir",
            reason: e.to_string(),
        })?;
        let store = Self { dir };
        store.sweep_stale()?;
        Ok(store)
    }

    /// Remove every prefixed file in the store directory.
    ///
    /// Returns the number of files removed. Files without the store prefix
    /// are never touched.
    pub fn sweep_stale(&self) -> Result<usize, StoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::Io {
            operation: "read_dir",
            reason: e.to_string(),
        })?;

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io {
                operation: "read_dir",
                reason: e.to_string(),
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(ARTIFACT_PREFIX) && fs::remove_file(entry.path()).is_ok() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn path_for(&self, locator: &Locator) -> PathBuf {
        self.dir.join(format!("{ARTIFACT_PREFIX}{locator}.png"))
    }
}

impl ArtifactStore for TempDirStore {
    fn put(&self, raster: Raster) -> Result<Locator, StoreError> {
        let locator = Locator::generate();
        let bytes = encode_raster(&raster).map_err(|e| StoreError::Codec(e.to_string()))?;

        let final_path = self.path_for(&locator);
        let part_path = final_path.with_extension("png.part");

        fs::write(&part_path, &bytes).map_err(|e| StoreError::Io {
            operation: "write",
            reason: e.to_string(),
        })?;
        if let Err(e) = fs::rename(&part_path, &final_path) {
            // Leave no partial artifact behind on a failed insert
            let _ = fs::remove_file(&part_path);
            return Err(StoreError::Io {
                operation: "rename",
                reason: e.to_string(),
            });
        }

        Ok(locator)
    }

    fn get(&self, locator: &Locator) -> Result<Arc<ImageArtifact>, StoreError> {
        let bytes = match fs::read(self.path_for(locator)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*locator));
            }
            Err(e) => {
                return Err(StoreError::Io {
                    operation: "read",
                    reason: e.to_string(),
                });
            }
        };

        let raster = decode_image(&bytes).map_err(|e| StoreError::Codec(e.to_string()))?;
        Ok(Arc::new(ImageArtifact {
            locator: *locator,
            raster,
        }))
    }

    fn delete(&self, locator: &Locator) {
        if let Err(e) = fs::remove_file(self.path_for(locator)) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(%locator, error = %e, "failed to delete artifact file");
            }
        }
    }
}
