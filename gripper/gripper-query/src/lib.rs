//! Geometric queries against a triangle mesh.
//!
//! The synthesis pipeline asks four questions of the target object:
//!
//! - which face is closest to a point ([`MeshQuery::closest_facet`])
//! - how far a point is from the surface, and on which side
//!   ([`MeshQuery::signed_distance`])
//! - whether a segment touches the surface ([`MeshQuery::intersect_segment`])
//! - where a ray crosses the surface ([`MeshQuery::intersect_ray`])
//!
//! [`MeshQueryService`] answers them with a bounding volume hierarchy built
//! once per mesh. The service is read-only after construction and shares the
//! mesh through an `Arc`, so finger initialization for several contact points
//! can query it from independent threads.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gripper_query::{MeshQuery, MeshQueryService};
//! use gripper_types::{IndexedMesh, Point3, Vector3};
//!
//! let cube = IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
//! let service = MeshQueryService::new(Arc::new(cube)).unwrap();
//!
//! let inside = service.signed_distance(&Point3::new(0.5, 0.5, 0.25));
//! assert!((inside.distance + 0.25).abs() < 1e-12);
//!
//! let hits = service.intersect_ray(&Point3::new(0.5, 0.5, -1.0), &Vector3::z());
//! assert_eq!(hits.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::cast_possible_truncation)]

mod bvh;
mod error;
mod primitives;
mod service;

pub use bvh::{Bvh, BvhNode};
pub use error::{QueryError, QueryResult};
pub use primitives::{
    closest_point_on_triangle, point_segment_distance_squared, ray_triangle_intersect,
    solid_angle,
};
pub use service::{HIT_MERGE_TOLERANCE, MeshQuery, MeshQueryService, RayHit, SignedDistance};
