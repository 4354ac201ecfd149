//! Gripper synthesis session.
//!
//! This crate ties the pipeline together around one design:
//!
//! - Object mesh, contact points, keyframes and settings as inputs
//! - Query service, distance field, fingers and trajectory as cached derived values
//! - [`DirtyTags`] recording which derived values are stale
//! - Export of topology optimization problems in the gripper frame
//!
//! Derived values are recomputed lazily: setters only invalidate, getters
//! recompute what is dirty, upstream first. Fingers are initialized in
//! parallel with rayon.
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

mod dirty;
mod error;
mod session;

pub use dirty::{DirtyTags, Stage};
pub use error::{SessionError, SessionResult};
pub use session::GripperSession;
