//! Angle normalization for quarter-turn rotations.
//!
//! Any signed angle that is a multiple of 90 degrees reduces to one of four
//! canonical clockwise steps. Negative angles rotate counter-clockwise, so
//! -90 reduces to the same step as 270.
//!
//! Angles that are not multiples of 90 are rejected rather than truncated:
//! silently rounding would break the dimension-swap contract that callers
//! rely on to size the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced by angle normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AngleError {
    /// The angle is not a multiple of 90 degrees.
    #[error("angle {0} is not a multiple of 90 degrees")]
    NotQuarterTurn(i32),
}

/// A canonical clockwise rotation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationStep {
    /// No rotation.
    #[default]
    Deg0,
    /// Rotate 90 degrees clockwise.
    Deg90,
    /// Rotate 180 degrees.
    Deg180,
    /// Rotate 270 degrees clockwise (90 counter-clockwise).
    Deg270,
}

impl RotationStep {
    /// The step as degrees in `[0, 360)`.
    pub fn degrees(self) -> u32 {
        match self {
            RotationStep::Deg0 => 0,
            RotationStep::Deg90 => 90,
            RotationStep::Deg180 => 180,
            RotationStep::Deg270 => 270,
        }
    }

    /// Returns true if this step swaps width and height.
    ///
    /// Rotations of 90 and 270 degrees exchange the image dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, RotationStep::Deg90 | RotationStep::Deg270)
    }
}

/// Reduce a signed angle to a canonical rotation step.
///
/// # Arguments
///
/// * `angle_degrees` - Any signed angle, including negatives and values
///   beyond ±360. Negative angles rotate counter-clockwise.
///
/// # Errors
///
/// Returns `AngleError::NotQuarterTurn` if the angle is not a multiple
/// of 90 degrees.
///
/// # Example
///
/// ```
/// use quarterturn_core::angle::{normalize, RotationStep};
///
/// assert_eq!(normalize(450), Ok(RotationStep::Deg90));
/// assert_eq!(normalize(-90), Ok(RotationStep::Deg270));
/// assert!(normalize(45).is_err());
/// ```
pub fn normalize(angle_degrees: i32) -> Result<RotationStep, AngleError> {
    match angle_degrees.rem_euclid(360) {
        0 => Ok(RotationStep::Deg0),
        90 => Ok(RotationStep::Deg90),
        180 => Ok(RotationStep::Deg180),
        270 => Ok(RotationStep::Deg270),
        _ => Err(AngleError::NotQuarterTurn(angle_degrees)),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
