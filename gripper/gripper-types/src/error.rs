//! Error types for gripper data validation.

use thiserror::Error;

/// Result type for validation of gripper types.
pub type TypesResult<T> = Result<T, TypesError>;

/// Errors raised when inputs violate the preconditions of the pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TypesError {
    /// Mesh has no vertices or no faces.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    InvalidFaceIndex {
        /// Offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A vertex has a NaN or infinite coordinate.
    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),

    /// A face has zero area.
    #[error("face {0} is degenerate (zero area)")]
    DegenerateFace(usize),

    /// A keyframe index is out of range.
    #[error("keyframe {index} out of range (trajectory has {len} keyframes)")]
    KeyframeOutOfRange {
        /// Requested index.
        index: usize,
        /// Trajectory length.
        len: usize,
    },

    /// A settings value is outside its valid range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TypesError::InvalidFaceIndex {
            face: 3,
            index: 42,
            vertex_count: 8,
        };
        assert_eq!(
            err.to_string(),
            "face 3 references vertex 42 (mesh has 8 vertices)"
        );

        let err = TypesError::InvalidSettings("joint_count must be >= 2".to_string());
        assert!(err.to_string().contains("joint_count"));
    }
}
