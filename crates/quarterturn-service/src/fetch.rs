//! Remote source fetching.
//!
//! The orchestrator resolves remote locators through the [`SourceFetcher`]
//! trait so tests can substitute a double; [`HttpFetcher`] is the production
//! implementation.

use async_trait::async_trait;
use thiserror::Error;

/// How many redirects a fetch will follow before giving up.
const MAX_REDIRECTS: usize = 10;

const USER_AGENT: &str = concat!("quarterturn/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while fetching a remote source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the response body not read.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP status {status}")]
    Status { url: String, status: u16 },

    /// The fetch did not complete within the configured deadline.
    #[error("fetching {url} timed out after {seconds}s")]
    TimedOut { url: String, seconds: u64 },
}

/// Collaborator that resolves a remote locator into raw image bytes.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch the resource at `url` and return its body.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP fetcher backed by `reqwest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    /// Create a new HTTP fetcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |reason: String| FetchError::Transport {
            url: url.to_string(),
            reason,
        };

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| transport(e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}
