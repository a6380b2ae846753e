//! Quarterturn Service - asynchronous image rotation
//!
//! This crate orchestrates rotation requests over the primitives in
//! `quarterturn-core`: a request names a source (local path or remote URL)
//! and a signed multiple of 90 degrees; the service resolves the source,
//! rotates the pixels on a worker, stores the result in a transient
//! artifact store, and reports the new locator through a one-shot ticket.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use quarterturn_service::{HttpFetcher, MemoryStore, Rotator};
//!
//! let rotator = Rotator::new(Arc::new(HttpFetcher::new()), Arc::new(MemoryStore::new()));
//!
//! let ticket = rotator.submit("https://example.com/poster.jpg", -90);
//! let locator = ticket.outcome().await?;
//!
//! let artifact = rotator.store().get(&locator)?;
//! // ... render artifact.raster ...
//! rotator.store().delete(&locator);
//! ```
//!
//! Artifacts are transient and caller-managed: the store never deletes on
//! its own, so every locator a caller receives must eventually be passed
//! back to `delete`.

pub mod config;
pub mod error;
pub mod fetch;
pub mod orchestrator;
pub mod source;
pub mod store;

pub use config::RotatorConfig;
pub use error::{ErrorKind, RotateError, RotateResult};
pub use fetch::{FetchError, HttpFetcher, SourceFetcher};
pub use orchestrator::{RotationTicket, Rotator};
pub use source::SourceKind;
pub use store::{ArtifactStore, ImageArtifact, Locator, MemoryStore, StoreError, TempDirStore};
