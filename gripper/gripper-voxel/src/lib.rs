//! Voxel bookkeeping around a target object.
//!
//! This crate provides:
//!
//! - [`VoxelCoord`] - Integer lattice coordinate with 26-neighborhood and
//!   Chebyshev shell iteration
//! - [`VoxelGrid`] - Dense axis-aligned lattice with the voxel (cell center)
//!   and node (cell corner) coordinate maps
//! - [`Occupancy`] - Forbidden/free classification by vertical parity ray casts
//! - [`DiscreteDistanceField`] - Breadth-first hop counts from a base point
//! - [`DisjointSet`] / [`ForbiddenRegions`] - Connectivity of forbidden space
//!
//! # Voxels and Nodes
//!
//! Voxels label cells and are used for occupancy, distances and solver
//! elements. Nodes label cell corners, one more per axis than voxels, and are
//! used for solver boundary conditions. Both share the grid's lower bound and
//! resolution but are different affine maps; mixing them up shifts every
//! boundary condition by half a cell.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Example
//!
//! ```
//! use gripper_voxel::{DiscreteDistanceField, Occupancy, VoxelCoord, VoxelGrid};
//! use gripper_types::Point3;
//!
//! let grid = VoxelGrid::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0), 0.5).unwrap();
//! assert_eq!(grid.size(), [2, 2, 2]);
//!
//! let occupancy = Occupancy::empty(grid);
//! let field = DiscreteDistanceField::propagate(&occupancy, &Point3::new(0.25, 0.25, 0.25));
//! assert_eq!(field.distance_at(VoxelCoord::new(1, 1, 1)), Some(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

mod distance;
mod error;
mod grid;
mod occupancy;
mod regions;
mod union_find;
mod voxel;

pub use distance::{DiscreteDistanceField, FORBIDDEN, UNREACHED};
pub use error::{VoxelError, VoxelResult};
pub use grid::VoxelGrid;
pub use occupancy::{ForbiddenRule, Occupancy};
pub use regions::ForbiddenRegions;
pub use union_find::DisjointSet;
pub use voxel::VoxelCoord;
