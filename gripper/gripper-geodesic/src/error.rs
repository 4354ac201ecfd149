//! Error types for finger initialization.

use gripper_types::TypesError;
use thiserror::Error;

/// Result type for geodesic operations.
pub type GeodesicResult<T> = Result<T, GeodesicError>;

/// Errors that can occur while setting up finger initialization.
///
/// Unreachable vertices and blocked shortcuts are not errors; they produce
/// best-effort paths.
#[derive(Debug, Error)]
pub enum GeodesicError {
    /// The per-vertex normal list does not match the mesh.
    #[error("expected {vertex_count} vertex normals, got {normal_count}")]
    NormalCountMismatch {
        /// Vertices in the mesh.
        vertex_count: usize,
        /// Normals supplied.
        normal_count: usize,
    },

    /// The finger settings are out of range.
    #[error(transparent)]
    InvalidSettings(#[from] TypesError),
}
