//! In-memory artifact store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use quarterturn_core::Raster;

use super::{ArtifactStore, ImageArtifact, Locator, StoreError};

/// Artifact store backed by an in-memory map.
///
/// Artifacts live behind `Arc`, so `get` hands out complete immutable data
/// even while other requests insert or delete concurrently.
#[derive(Debug, Default)]
pub struct MemoryStore {
    capacity: Option<usize>,
    artifacts: RwLock<HashMap<Locator, Arc<ImageArtifact>>>,
}

impl MemoryStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that holds at most `capacity` artifacts.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            artifacts: RwLock::new(HashMap::new()),
        }
    }

    /// Number of artifacts currently held.
    pub fn len(&self) -> usize {
        self.artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if the store holds no artifacts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for MemoryStore {
    fn put(&self, raster: Raster) -> Result<Locator, StoreError> {
        // A poisoned lock still guards a consistent map: writers only ever
        // insert or remove whole entries
        let mut map = self
            .artifacts
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(capacity) = self.capacity {
            if map.len() >= capacity {
                return Err(StoreError::Exhausted { capacity });
            }
        }

        let locator = Locator::generate();
        map.insert(locator, Arc::new(ImageArtifact { locator, raster }));
        Ok(locator)
    }

    fn get(&self, locator: &Locator) -> Result<Arc<ImageArtifact>, StoreError> {
        self.artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locator)
            .cloned()
            .ok_or(StoreError::NotFound(*locator))
    }

    fn delete(&self, locator: &Locator) {
        self.artifacts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(locator);
    }
}
