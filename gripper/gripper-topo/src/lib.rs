//! Topology-optimization boundary conditions for gripper synthesis.
//!
//! The gripper body is grown by an external topology optimizer inside a
//! box-shaped design domain attached to the effector. This crate computes
//! what the optimizer needs to know about that domain and writes it as a
//! `ToPy` problem definition file:
//!
//! - **Passive elements** - Forbidden voxels: inside the object, or outside
//!   a negative-space solid
//! - **Fixed nodes** - Base-plane nodes inside the attachment disk
//! - **Loaded nodes** - The free voxel nearest to each contact point
//! - **Loads** - The inward contact normal, in the gripper frame
//!
//! Element and node numbers follow the optimizer's 1-based, y-mirrored
//! convention (see [`element_index`] and [`node_index`]).
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
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

mod boundary;
mod config;
mod error;
mod indices;

pub use boundary::{BoundaryConditions, attachment_nodes, nearest_free_voxel};
pub use config::{TOPY_HEADER, ToPyConfig, export_topy_config, format_float, format_list, problem_name};
pub use error::{ExportError, ExportResult};
pub use indices::{element_index, element_indices, node_index, node_indices};
