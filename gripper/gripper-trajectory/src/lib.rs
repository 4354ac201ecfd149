//! Closing trajectory initialization for passive grippers.
//!
//! A passive gripper is released from the object by moving the arm, so the
//! closing motion is a joint-space trajectory. This crate derives a first
//! guess of that trajectory from the finger paths:
//!
//! - [`length_parameterize`] - Resample a polyline into equal arc-length steps
//! - [`TrajectoryInitializer`] - Average the finger steps, accumulate them
//!   into per-keyframe translations and solve inverse kinematics for each
//!
//! Keyframes the mechanism cannot reach are dropped and logged; the
//! trajectory is then shorter than requested but still usable.
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

mod arclength;
mod error;
mod initializer;

pub use arclength::{cumulative_lengths, length_parameterize, step_displacements};
pub use error::{TrajectoryError, TrajectoryResult};
pub use initializer::TrajectoryInitializer;
