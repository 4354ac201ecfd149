//! Error types for synthesis sessions.

use gripper_geodesic::GeodesicError;
use gripper_query::QueryError;
use gripper_topo::ExportError;
use gripper_trajectory::TrajectoryError;
use gripper_types::TypesError;
use gripper_voxel::VoxelError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while driving a session.
///
/// Inputs the pipeline cannot work with are rejected here, before any
/// stage runs.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A stage needs the object mesh but none was set.
    #[error("no mesh loaded")]
    MeshNotLoaded,

    /// Export needs at least one contact point.
    #[error("no contact points")]
    NoContactPoints,

    /// The trajectory has no first keyframe to place the effector.
    #[error("trajectory has no keyframes")]
    EmptyTrajectory,

    /// Contact point index past the end.
    #[error("contact point {index} out of range (have {len})")]
    ContactOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of contact points.
        len: usize,
    },

    /// Invalid mesh, settings or keyframe index.
    #[error(transparent)]
    Types(#[from] TypesError),

    /// The query structure could not be built.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The distance field grid could not be built.
    #[error(transparent)]
    Voxel(#[from] VoxelError),

    /// Finger initialization could not start.
    #[error(transparent)]
    Geodesic(#[from] GeodesicError),

    /// Trajectory initialization failed.
    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),

    /// Boundary condition export failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}
