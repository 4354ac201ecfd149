//! Error types for mesh query construction.

use gripper_types::TypesError;
use thiserror::Error;

/// Result type for mesh query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while building a query service.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The mesh failed validation.
    #[error("invalid mesh: {0}")]
    InvalidMesh(#[from] TypesError),
}
