//! Error types for mechanism configuration.

use thiserror::Error;

/// Result type for kinematics operations.
pub type KinematicsResult<T> = Result<T, KinematicsError>;

/// Errors raised while configuring a mechanism.
///
/// Unreachable targets are not errors: [`crate::Kinematics::inverse`]
/// returns an empty list for them.
#[derive(Debug, Error)]
pub enum KinematicsError {
    /// Joint index past the last joint of the mechanism.
    #[error("joint {joint} out of range for a {dof}-joint mechanism")]
    JointOutOfRange {
        /// Requested joint.
        joint: usize,
        /// Joints of the mechanism.
        dof: usize,
    },

    /// A limit bound is NaN or infinite.
    #[error("joint {joint} limits [{lower}, {upper}] are not finite")]
    NonFiniteLimits {
        /// Joint index.
        joint: usize,
        /// Lower bound as given.
        lower: f64,
        /// Upper bound as given.
        upper: f64,
    },
}
