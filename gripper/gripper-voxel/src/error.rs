//! Error types for voxel grid construction.

use thiserror::Error;

/// Result type for voxel operations.
pub type VoxelResult<T> = Result<T, VoxelError>;

/// Errors that can occur while building a voxel grid.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VoxelError {
    /// The voxel edge length must be positive and finite.
    #[error("voxel resolution must be positive, got {0}")]
    InvalidResolution(f64),

    /// The upper bound is below the lower bound on some axis.
    #[error("grid bounds are inverted on axis {axis}")]
    InvertedBounds {
        /// Offending axis (0 = X, 1 = Y, 2 = Z).
        axis: usize,
    },

    /// The grid would need more voxels than can be indexed.
    #[error("grid of {x}x{y}x{z} voxels is too large")]
    TooLarge {
        /// Voxels along X.
        x: usize,
        /// Voxels along Y.
        y: usize,
        /// Voxels along Z.
        z: usize,
    },

    /// The voxel count along the shortest side must be at least one.
    #[error("units must be >= 1")]
    InvalidUnits,
}
