//! Error types for trajectory initialization.

use gripper_types::TypesError;
use thiserror::Error;

/// Result type for trajectory operations.
pub type TrajectoryResult<T> = Result<T, TrajectoryError>;

/// Errors that can occur during trajectory initialization.
///
/// Keyframes without an inverse kinematics solution are dropped, not
/// reported here.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// Keyframe or subdivision counts are out of range.
    #[error(transparent)]
    InvalidSettings(#[from] TypesError),

    /// A finger path has no points to reparameterize.
    #[error("finger {index} is empty")]
    EmptyFinger {
        /// Position of the finger in the input list.
        index: usize,
    },
}
