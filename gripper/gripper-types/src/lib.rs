//! Core types for passive gripper synthesis.
//!
//! This crate provides the data model shared by every stage of the
//! synthesis pipeline:
//!
//! - [`IndexedMesh`] - The target object as an indexed triangle mesh
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`ContactPoint`] - A surface position plus outward normal
//! - [`FingerPath`] - Ordered joint positions of one finger
//! - [`Pose`] / [`Trajectory`] - Joint-space keyframes of the closing motion
//! - [`GripperSettings`] - Every tunable of the pipeline in one place
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Batch synthesis jobs
//! - Servers
//! - Python bindings
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down)
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**, so
//! face normals point outward and contact normals point away from the object.
//!
//! # Example
//!
//! ```
//! use gripper_types::{ContactPoint, IndexedMesh, Point3, Vector3};
//!
//! let cube = IndexedMesh::cuboid(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5));
//! assert_eq!(cube.face_count(), 12);
//!
//! let contact = ContactPoint::new(Point3::new(0.0, 0.0, -0.5), Vector3::new(0.0, 0.0, -1.0));
//! assert!((contact.normal.norm() - 1.0).abs() < 1e-12);
//! ```
//!
//! # Quality Standards
//!
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod contact;
mod error;
mod finger;
mod mesh;
mod pose;
mod settings;

pub use bounds::Aabb;
pub use contact::ContactPoint;
pub use error::{TypesError, TypesResult};
pub use finger::FingerPath;
pub use mesh::IndexedMesh;
pub use pose::{DOF, Pose, Trajectory};
pub use settings::{
    DistanceFieldSettings, FingerSettings, GripperSettings, ToPySolverParams, TopoOptSettings,
    TrajectorySettings,
};

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
