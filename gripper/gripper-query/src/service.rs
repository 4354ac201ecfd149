//! The mesh query capability and its BVH-backed implementation.

use std::f64::consts::PI;
use std::sync::Arc;

use gripper_types::IndexedMesh;
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::bvh::Bvh;
use crate::error::QueryResult;
use crate::primitives::{closest_point_on_triangle, ray_triangle_intersect, solid_angle};

/// Ray hits closer than this in ray parameter are reported once.
///
/// A ray through an edge or vertex shared by several faces would otherwise
/// be counted once per face and break parity tests.
pub const HIT_MERGE_TOLERANCE: f64 = 1e-9;

const MAX_LEAF_SIZE: usize = 8;

/// Relative slack when deciding that a closest point is inside its face.
const FACE_SIGN_TOLERANCE: f64 = 1e-9;

/// Result of a signed distance query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedDistance {
    /// Distance to the surface; positive outside, negative inside.
    pub distance: f64,
    /// Closest point on the surface.
    pub closest_point: Point3<f64>,
    /// Face containing the closest point.
    pub face: usize,
    /// `1.0` outside, `-1.0` inside.
    pub sign: f64,
}

impl SignedDistance {
    /// Check whether the query point was inside the solid.
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.sign < 0.0
    }
}

/// A ray crossing the mesh surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray parameter, in units of the direction's length.
    pub t: f64,
    /// Face that was hit.
    pub face: usize,
}

/// Geometric queries the synthesis pipeline issues against the object.
///
/// Implementations must be read-only after construction so they can be
/// shared across threads.
pub trait MeshQuery: Send + Sync {
    /// Index of the face closest to `point`, `None` for an empty mesh.
    fn closest_facet(&self, point: &Point3<f64>) -> Option<usize>;

    /// Signed distance from `point` to the surface.
    fn signed_distance(&self, point: &Point3<f64>) -> SignedDistance;

    /// Check whether the segment `origin .. origin + direction` touches the
    /// surface.
    fn intersect_segment(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> bool;

    /// Every crossing of the ray `origin + t * direction`, `t > 0`, sorted by `t`.
    fn intersect_ray(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Vec<RayHit>;
}

/// BVH-accelerated [`MeshQuery`] implementation.
///
/// Holds the mesh by `Arc`, never copying it, plus per-face and per-vertex
/// normals computed once at construction.
#[derive(Debug)]
pub struct MeshQueryService {
    mesh: Arc<IndexedMesh>,
    bvh: Bvh,
    face_normals: Vec<Vector3<f64>>,
    vertex_normals: Vec<Vector3<f64>>,
}

impl MeshQueryService {
    /// Build the query structures for a mesh.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidMesh`](crate::QueryError::InvalidMesh) if
    /// the mesh is empty or malformed.
    pub fn new(mesh: Arc<IndexedMesh>) -> QueryResult<Self> {
        mesh.validate()?;

        let bvh = Bvh::build(&mesh, MAX_LEAF_SIZE);
        let face_normals = mesh.face_normals();
        let vertex_normals = mesh.vertex_normals();

        debug!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "built mesh query service"
        );

        Ok(Self {
            mesh,
            bvh,
            face_normals,
            vertex_normals,
        })
    }

    /// The mesh being queried.
    #[must_use]
    pub fn mesh(&self) -> &Arc<IndexedMesh> {
        &self.mesh
    }

    /// Unit face normals.
    #[must_use]
    pub fn face_normals(&self) -> &[Vector3<f64>] {
        &self.face_normals
    }

    /// Area-weighted unit vertex normals.
    #[must_use]
    pub fn vertex_normals(&self) -> &[Vector3<f64>] {
        &self.vertex_normals
    }

    /// Generalized winding number of the surface around `point`.
    ///
    /// Close to 1 inside a closed outward-wound surface and 0 outside.
    #[must_use]
    pub fn winding_number(&self, point: &Point3<f64>) -> f64 {
        let total: f64 = (0..self.mesh.face_count())
            .filter_map(|f| self.mesh.triangle(f))
            .map(|tri| solid_angle(point, &tri))
            .sum();
        total / (4.0 * PI)
    }

    /// Check whether `point` lies inside the solid.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        self.winding_number(point) >= 0.5
    }

    /// Number of distinct surface crossings along a ray.
    #[must_use]
    pub fn hit_count(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> usize {
        self.intersect_ray(origin, direction).len()
    }

    fn closest(&self, point: &Point3<f64>) -> Option<(usize, Point3<f64>, f64)> {
        let (face, dist_sq) = self.bvh.nearest(point, |f| {
            self.mesh.triangle(f as usize).map_or(f64::INFINITY, |tri| {
                (point - closest_point_on_triangle(point, &tri)).norm_squared()
            })
        })?;
        let tri = self.mesh.triangle(face as usize)?;
        Some((face as usize, closest_point_on_triangle(point, &tri), dist_sq))
    }

    /// Sign of `point` from the normal of its closest face.
    ///
    /// `None` when the closest point lies on an edge or vertex, where the
    /// face normal alone cannot tell the sides apart.
    fn face_sign(
        &self,
        point: &Point3<f64>,
        face: usize,
        closest_point: &Point3<f64>,
    ) -> Option<f64> {
        let normal = self.face_normals.get(face)?;
        let to_point = point - closest_point;
        let along = to_point.dot(normal);
        if along.abs() < (1.0 - FACE_SIGN_TOLERANCE) * to_point.norm() {
            return None;
        }
        Some(if along >= 0.0 { 1.0 } else { -1.0 })
    }
}

impl MeshQuery for MeshQueryService {
    fn closest_facet(&self, point: &Point3<f64>) -> Option<usize> {
        self.closest(point).map(|(face, _, _)| face)
    }

    fn signed_distance(&self, point: &Point3<f64>) -> SignedDistance {
        let Some((face, closest_point, dist_sq)) = self.closest(point) else {
            return SignedDistance {
                distance: f64::INFINITY,
                closest_point: *point,
                face: 0,
                sign: 1.0,
            };
        };

        // Winding number only where the closest face is ambiguous
        let sign = self
            .face_sign(point, face, &closest_point)
            .unwrap_or_else(|| if self.contains(point) { -1.0 } else { 1.0 });
        SignedDistance {
            distance: sign * dist_sq.sqrt(),
            closest_point,
            face,
            sign,
        }
    }

    fn intersect_segment(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> bool {
        let mut candidates = Vec::new();
        self.bvh.ray_candidates(origin, direction, 1.0, &mut candidates);

        candidates.into_iter().any(|f| {
            self.mesh
                .triangle(f as usize)
                .and_then(|tri| ray_triangle_intersect(origin, direction, &tri))
                .is_some_and(|t| t <= 1.0)
        })
    }

    fn intersect_ray(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Vec<RayHit> {
        let mut candidates = Vec::new();
        self.bvh
            .ray_candidates(origin, direction, f64::INFINITY, &mut candidates);

        let mut hits: Vec<RayHit> = candidates
            .into_iter()
            .filter_map(|f| {
                let tri = self.mesh.triangle(f as usize)?;
                let t = ray_triangle_intersect(origin, direction, &tri)?;
                Some(RayHit { t, face: f as usize })
            })
            .collect();
        hits.sort_by(|a, b| a.t.total_cmp(&b.t).then(a.face.cmp(&b.face)));

        let mut merged: Vec<RayHit> = Vec::with_capacity(hits.len());
        for hit in hits {
            if merged
                .last()
                .is_none_or(|last| hit.t - last.t >= HIT_MERGE_TOLERANCE)
            {
                merged.push(hit);
            }
        }
        merged
    }
}
