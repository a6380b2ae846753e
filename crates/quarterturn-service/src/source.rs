//! Source locator classification.
//!
//! A rotation request names its source with an opaque string: a remote URL,
//! a `file://` URI, or a plain filesystem path. The orchestrator only needs
//! to know which collaborator resolves it.

use std::path::PathBuf;

/// A source locator, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A local file, read directly from disk.
    Local(PathBuf),
    /// A remote resource, resolved through the fetch collaborator.
    Remote(String),
}

impl SourceKind {
    /// Classify a locator string.
    ///
    /// `http://` and `https://` locators are remote; everything else is a
    /// local path, with a leading `file://` stripped if present.
    pub fn parse(locator: &str) -> Self {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            return SourceKind::Remote(locator.to_string());
        }
        let path = locator.strip_prefix("file://").unwrap_or(locator);
        SourceKind::Local(PathBuf::from(path))
    }
}
