//! Passive gripper synthesis.
//!
//! This umbrella crate re-exports all gripper-* crates. Given an object
//! mesh, contact points and an initial effector pose it produces finger
//! paths, a closing trajectory and a topology optimization problem for the
//! gripper body. All crates are Layer 0 (zero Bevy dependencies).
//!
//! # Quick Start
//!
//! ```
//! use gripper::prelude::*;
//!
//! let mut session = GripperSession::default();
//! session
//!     .set_mesh(IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0)))
//!     .unwrap();
//! session.add_contact_point(ContactPoint::new(Point3::new(0.5, 0.5, 1.0), Vector3::z()));
//! session.set_initial_pose(Pose::new([0.5, 0.5, 2.0, 0.0, 0.0, 0.0]));
//!
//! let fingers = session.fingers().unwrap();
//! assert_eq!(fingers[0].len(), 4);
//! ```
//!
//! # Module Organization
//!
//! ## Foundation
//! - [`types`] - Meshes, contact points, finger paths, poses and settings
//! - [`query`] - Closest facet, signed distance and ray queries on a mesh
//! - [`voxel`] - Voxel grids, voxelization and the discrete distance field
//!
//! ## Synthesis
//! - [`geodesic`] - Finger initialization along shortest surface paths
//! - [`kinematics`] - Forward and inverse kinematics of the mechanism
//! - [`trajectory`] - Closing trajectory from finger paths
//! - [`topo`] - Boundary conditions and `ToPy` problem export
//!
//! ## Orchestration
//! - [`session`] - Lazily recomputed session over one design
//!
//! # Feature Flags
//!
//! - `serde` - Serialization of inputs, settings and mechanisms

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Meshes, contact points, finger paths, poses and settings.
pub use gripper_types as types;

/// Closest facet, signed distance and ray queries on a mesh.
pub use gripper_query as query;

/// Voxel grids, voxelization and the discrete distance field.
pub use gripper_voxel as voxel;

/// Finger initialization along shortest surface paths.
pub use gripper_geodesic as geodesic;

/// Forward and inverse kinematics.
pub use gripper_kinematics as kinematics;

/// Closing trajectory from finger paths.
pub use gripper_trajectory as trajectory;

/// Boundary conditions and `ToPy` problem export.
pub use gripper_topo as topo;

/// Lazily recomputed synthesis session.
pub use gripper_session as session;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for gripper synthesis.
///
/// # Usage
///
/// ```
/// use gripper::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use gripper_types::{
        ContactPoint, FingerPath, GripperSettings, IndexedMesh, Isometry3, Point3, Pose,
        Trajectory, Vector3,
    };

    // Queries
    pub use gripper_query::{MeshQuery, MeshQueryService};

    // Kinematics
    pub use gripper_kinematics::{GantryWrist, Kinematics};

    // Session (main use case)
    pub use gripper_session::{GripperSession, SessionError, Stage};

    // Export
    pub use gripper_topo::{BoundaryConditions, ToPyConfig};
}

// =============================================================================
// Tests
// =============================================================================
