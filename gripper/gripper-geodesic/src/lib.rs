//! Finger joint curves from visibility-seeded geodesic paths.
//!
//! This crate turns a contact point on the object into a finger: an ordered
//! list of joint positions running from the contact to the effector anchor
//! without passing through the object.
//!
//! - **Edge graph** - Deduplicated mesh edges weighted by Euclidean length
//! - **Visibility seeding** - Every vertex the effector can see directly
//!   becomes a Dijkstra root at its straight-line distance
//! - **Shortest path tree** - Multi-source Dijkstra recording predecessors
//! - **Finger initialization** - Walk the tree from the contact, dropping
//!   points the straight line can skip, lift off the surface, then resample
//!   to the requested joint count
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gripper_geodesic::FingerInitializer;
//! use gripper_query::MeshQueryService;
//! use gripper_types::{ContactPoint, FingerSettings, IndexedMesh, Point3, Vector3};
//!
//! let cube = IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
//! let service = MeshQueryService::new(Arc::new(cube)).unwrap();
//! let initializer = FingerInitializer::from_service(&service, FingerSettings::default()).unwrap();
//!
//! let contact = ContactPoint::new(Point3::new(0.5, 0.5, 0.0), -Vector3::z());
//! let effector = Point3::new(0.5, 0.5, 3.0);
//! let finger = initializer.initialize(&contact, &effector);
//!
//! assert_eq!(finger.len(), 4);
//! assert_eq!(finger.first(), Some(&contact.position));
//! assert_eq!(finger.last(), Some(&effector));
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
#![allow(clippy::cast_possible_truncation)]

mod adjacency;
mod dijkstra;
mod error;
mod finger;
mod visibility;

pub use adjacency::EdgeGraph;
pub use dijkstra::{ShortestPathTree, shortest_paths};
pub use error::{GeodesicError, GeodesicResult};
pub use finger::{FingerInitializer, resample_to_joint_count};
pub use visibility::{point_to_line_distance, segment_is_clear, visible_vertices};
