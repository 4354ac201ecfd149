//! Indexed triangle mesh.

use nalgebra::{Isometry3, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};
use crate::Aabb;

/// An indexed triangle mesh.
///
/// The target object of a synthesis run. It is immutable once handed to the
/// pipeline; query structures share it through an `Arc` instead of copying.
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from outside.
///
/// # Example
///
/// ```
/// use gripper_types::{IndexedMesh, Point3};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from flat coordinate and index arrays.
    ///
    /// Returns an empty mesh if either array length is not a multiple of 3.
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        Self { vertices, faces }
    }

    /// Closed axis-aligned box with outward-facing winding.
    ///
    /// Vertex `i` sits at the corner whose x/y/z use `max` where bit 0/1/2 of
    /// `i` is set.
    #[must_use]
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>) -> Self {
        let vertices = (0..8u32)
            .map(|i| {
                Point3::new(
                    if i & 1 == 0 { min.x } else { max.x },
                    if i & 2 == 0 { min.y } else { max.y },
                    if i & 4 == 0 { min.z } else { max.z },
                )
            })
            .collect();

        let faces = vec![
            [0, 2, 3],
            [0, 3, 1], // -Z
            [4, 5, 7],
            [4, 7, 6], // +Z
            [0, 1, 5],
            [0, 5, 4], // -Y
            [2, 6, 7],
            [2, 7, 3], // +Y
            [0, 4, 6],
            [0, 6, 2], // -X
            [1, 3, 7],
            [1, 7, 5], // +X
        ];

        Self { vertices, faces }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check whether the mesh has no vertices or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Resolve a face into its three corner positions.
    ///
    /// Returns `None` if the face index is out of range.
    #[must_use]
    pub fn triangle(&self, face: usize) -> Option<[Point3<f64>; 3]> {
        let [a, b, c] = *self.faces.get(face)?;
        Some([
            *self.vertices.get(a as usize)?,
            *self.vertices.get(b as usize)?,
            *self.vertices.get(c as usize)?,
        ])
    }

    /// Bounding box of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter())
    }

    /// Unit face normals. Degenerate faces get a zero vector.
    #[must_use]
    pub fn face_normals(&self) -> Vec<Vector3<f64>> {
        (0..self.faces.len())
            .map(|f| {
                self.triangle(f).map_or_else(Vector3::zeros, |[a, b, c]| {
                    (b - a).cross(&(c - a)).try_normalize(0.0).unwrap_or_else(Vector3::zeros)
                })
            })
            .collect()
    }

    /// Area-weighted unit vertex normals.
    ///
    /// Vertices not referenced by any face get a zero vector.
    #[must_use]
    pub fn vertex_normals(&self) -> Vec<Vector3<f64>> {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];

        for (f, face) in self.faces.iter().enumerate() {
            let Some([a, b, c]) = self.triangle(f) else {
                continue;
            };
            // Unnormalized cross product weights by twice the face area
            let weighted = (b - a).cross(&(c - a));
            for &v in face {
                normals[v as usize] += weighted;
            }
        }

        for n in &mut normals {
            *n = n.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        }
        normals
    }

    /// Apply a rigid transform to every vertex.
    pub fn transform(&mut self, iso: &Isometry3<f64>) {
        for v in &mut self.vertices {
            *v = iso * *v;
        }
    }

    /// Return a transformed copy of the mesh.
    #[must_use]
    pub fn transformed(&self, iso: &Isometry3<f64>) -> Self {
        let mut out = self.clone();
        out.transform(iso);
        out
    }

    /// Translate every vertex.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Check the mesh is usable by the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is empty, has non-finite vertices,
    /// out-of-range face indices, or zero-area faces.
    pub fn validate(&self) -> TypesResult<()> {
        if self.is_empty() {
            return Err(TypesError::EmptyMesh);
        }

        if let Some(i) = self
            .vertices
            .iter()
            .position(|v| !v.coords.iter().all(|c| c.is_finite()))
        {
            return Err(TypesError::NonFiniteVertex(i));
        }

        let vertex_count = self.vertices.len();
        for (f, face) in self.faces.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(TypesError::InvalidFaceIndex {
                    face: f,
                    index,
                    vertex_count,
                });
            }
            let [a, b, c] = self.triangle(f).ok_or(TypesError::EmptyMesh)?;
            if (b - a).cross(&(c - a)).norm_squared() <= f64::MIN_POSITIVE {
                return Err(TypesError::DegenerateFace(f));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube() -> IndexedMesh {
        IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn cuboid_faces_point_outward() {
        let cube = unit_cube();
        let center = Point3::new(0.5, 0.5, 0.5);
        for (f, normal) in cube.face_normals().iter().enumerate() {
            let [a, b, c] = cube.triangle(f).unwrap();
            let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            assert!(normal.dot(&(centroid - center)) > 0.0, "face {f} points inward");
        }
    }

    #[test]
    fn vertex_normals_are_unit_and_outward() {
        let cube = unit_cube();
        let normals = cube.vertex_normals();
        for (v, n) in cube.vertices.iter().zip(&normals) {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            assert!(n.dot(&(v - Point3::new(0.5, 0.5, 0.5))) > 0.0);
        }
    }

    #[test]
    fn from_raw_rejects_ragged_input() {
        let mesh = IndexedMesh::from_raw(&[0.0, 0.0], &[0, 1, 2]);
        assert!(mesh.is_empty());
    }

    #[test]
    fn validate_catches_bad_index() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 99]);
        assert!(matches!(
            mesh.validate(),
            Err(TypesError::InvalidFaceIndex { index: 99, .. })
        ));
    }

    #[test]
    fn validate_catches_degenerate_face() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 0, 1]);
        assert!(matches!(mesh.validate(), Err(TypesError::DegenerateFace(12))));
    }

    #[test]
    fn validate_accepts_cube() {
        assert!(unit_cube().validate().is_ok());
        assert!(matches!(IndexedMesh::new().validate(), Err(TypesError::EmptyMesh)));
    }

    #[test]
    fn transformed_moves_bounds() {
        let iso = Isometry3::translation(1.0, 2.0, 3.0);
        let moved = unit_cube().transformed(&iso);
        assert_eq!(moved.bounds().min, Point3::new(1.0, 2.0, 3.0));
    }
}
