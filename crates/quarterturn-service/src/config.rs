//! Service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default bound on remote source resolution.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for the rotation orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatorConfig {
    /// How long resolving a remote source may take before the request
    /// fails with a fetch error. Defaults to 30 seconds.
    pub fetch_timeout: Duration,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}
