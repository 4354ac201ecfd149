//! Manipulator kinematics for gripper trajectory synthesis.
//!
//! The closing trajectory is planned in joint space of whatever arm carries
//! the gripper. This crate defines that arm as a capability:
//!
//! - [`Kinematics`] - `forward` and `inverse` plus wraparound-aware pose
//!   comparison built on top of them
//! - [`GantryWrist`] - A reference 6-joint mechanism (XYZ gantry with a
//!   yaw-pitch-roll wrist) with closed-form inverse kinematics
//! - [`wrap_angle`], [`nearest_turn`], [`JointLimits`] - Angle helpers
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use gripper_kinematics::{GantryWrist, Kinematics};
//! use gripper_types::{Pose, Translation3};
//!
//! let gantry = GantryWrist::new();
//! let start = Pose::new([0.0, 0.0, 0.5, 0.0, 0.0, 0.0]);
//! let lifted = Translation3::new(0.0, 0.0, 0.1) * gantry.forward(&start);
//!
//! let next = gantry.closest_inverse(&lifted, &start).unwrap();
//! assert!((next[2] - 0.6).abs() < 1e-12);
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

mod angles;
mod error;
mod gantry;
mod mechanism;

pub use angles::{JointLimits, nearest_turn, wrap_angle};
pub use error::{KinematicsError, KinematicsResult};
pub use gantry::GantryWrist;
pub use mechanism::Kinematics;
