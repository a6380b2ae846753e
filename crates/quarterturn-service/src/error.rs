//! Request-terminal error taxonomy.
//!
//! Every failure a rotation request can end in is one of four kinds. None
//! are retried internally; retry policy, if any, belongs to the caller via
//! re-submission. Each request surfaces at most one error, through its
//! completion channel, exactly once.

use quarterturn_core::AngleError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetch::FetchError;
use crate::store::StoreError;

/// Result type for rotation requests.
pub type RotateResult<T> = Result<T, RotateError>;

/// Classification of a failed rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The requested angle is not a multiple of 90 degrees.
    InvalidAngle,
    /// The local source is missing or its bytes are not a decodable image.
    SourceUnavailable,
    /// The remote source could not be retrieved, including timeouts.
    FetchFailure,
    /// The rotated artifact could not be persisted.
    StoreFailure,
}

impl ErrorKind {
    /// Stable textual name, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidAngle => "invalid_angle",
            ErrorKind::SourceUnavailable => "source_unavailable",
            ErrorKind::FetchFailure => "fetch_failure",
            ErrorKind::StoreFailure => "store_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of a rotation request.
#[derive(Debug, Error)]
pub enum RotateError {
    /// The requested angle cannot be reduced to a quarter-turn step.
    #[error("invalid rotation angle: {0}")]
    InvalidAngle(#[from] AngleError),

    /// The source could not be read or decoded.
    #[error("source unavailable: {reason}")]
    SourceUnavailable {
        /// What went wrong, naming the source where possible.
        reason: String,
    },

    /// The remote source could not be retrieved.
    #[error("fetch failed: {0}")]
    FetchFailure(#[from] FetchError),

    /// The rotated artifact could not be persisted.
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

impl RotateError {
    /// The kind of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RotateError::InvalidAngle(_) => ErrorKind::InvalidAngle,
            RotateError::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            RotateError::FetchFailure(_) => ErrorKind::FetchFailure,
            RotateError::StoreFailure(_) => ErrorKind::StoreFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let invalid: RotateError = AngleError::NotQuarterTurn(45).into();
        assert_eq!(invalid.kind(), ErrorKind::InvalidAngle);

        let unavailable = RotateError::SourceUnavailable {
            reason: "missing".to_string(),
        };
        assert_eq!(unavailable.kind(), ErrorKind::SourceUnavailable);

        let fetch: RotateError = FetchError::Status {
            url: "https://example.com/x.png".to_string(),
            status: 500,
        }
        .into();
        assert_eq!(fetch.kind(), ErrorKind::FetchFailure);

        let store: RotateError = StoreError::Exhausted { capacity: 4 }.into();
        assert_eq!(store.kind(), ErrorKind::StoreFailure);
    }

    #[test]
    fn test_messages_carry_context() {
        let invalid: RotateError = AngleError::NotQuarterTurn(91).into();
        assert!(invalid.to_string().contains("91"));

        let fetch: RotateError = FetchError::TimedOut {
            url: "https://example.com/slow.png".to_string(),
            seconds: 30,
        }
        .into();
        let msg = fetch.to_string();
        assert!(msg.contains("slow.png"));
        assert!(msg.contains("30"));
    }

    #[test]
    fn test_kind_names_are_stable() {
        assert_eq!(ErrorKind::InvalidAngle.as_str(), "invalid_angle");
        assert_eq!(ErrorKind::SourceUnavailable.as_str(), "source_unavailable");
        assert_eq!(ErrorKind::FetchFailure.as_str(), "fetch_failure");
        assert_eq!(ErrorKind::StoreFailure.as_str(), "store_failure");
    }
}
