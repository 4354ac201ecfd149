//! Error types for boundary condition export.

use std::path::PathBuf;

use gripper_query::QueryError;
use gripper_types::TypesError;
use gripper_voxel::{VoxelCoord, VoxelError};
use thiserror::Error;

/// Errors that can occur while computing or writing boundary conditions.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export settings are out of range.
    #[error(transparent)]
    InvalidSettings(#[from] TypesError),

    /// The design domain could not be voxelized.
    #[error("design domain: {0}")]
    Grid(#[from] VoxelError),

    /// The forbidden-space mesh is unusable.
    #[error("forbidden space: {0}")]
    Query(#[from] QueryError),

    /// Every voxel of the design domain around a contact is forbidden.
    #[error("no free voxel around contact voxel {voxel:?}")]
    NoFreeVoxel {
        /// Voxel the search started from.
        voxel: VoxelCoord,
    },

    /// IO error while writing the problem definition.
    #[error("Failed to write to {path}: {source}")]
    IoWrite {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for export operations.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ExportError::NoFreeVoxel {
            voxel: VoxelCoord::new(1, 2, 3),
        };
        assert!(format!("{err}").contains("no free voxel"));

        let err = ExportError::IoWrite {
            path: PathBuf::from("/nonexistent/out.tpd"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(format!("{err}").contains("/nonexistent/out.tpd"));
    }
}
