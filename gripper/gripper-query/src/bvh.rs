//! Bounding volume hierarchy over mesh faces.
//!
//! A median-split binary tree of face boxes. Used to prune ray/segment
//! casts and nearest-face searches to `O(log n)` candidate faces.

use gripper_types::{Aabb, IndexedMesh};
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

/// Padding applied to node boxes so flat faces still have a volume.
const BOX_PADDING: f64 = 1e-9;

/// BVH node containing either leaf faces or two children.
#[derive(Debug)]
pub enum BvhNode {
    /// Leaf node holding face indices.
    Leaf {
        /// Box around every face in this leaf.
        bbox: Aabb,
        /// Face indices.
        faces: SmallVec<[u32; 8]>,
    },
    /// Internal node with two children.
    Internal {
        /// Box around every face in the subtree.
        bbox: Aabb,
        /// Left child.
        left: Box<Self>,
        /// Right child.
        right: Box<Self>,
    },
}

impl BvhNode {
    /// Box of this node.
    #[must_use]
    pub const fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Bounding volume hierarchy for a triangle mesh.
///
/// # Example
///
/// ```
/// use gripper_query::Bvh;
/// use gripper_types::{IndexedMesh, Point3};
///
/// let cube = IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
/// let bvh = Bvh::build(&cube, 4);
/// assert_eq!(bvh.face_count(), 12);
/// ```
#[derive(Debug)]
pub struct Bvh {
    root: Option<BvhNode>,
    face_count: usize,
}

impl Bvh {
    /// Build a BVH with at most `max_leaf_size` faces per leaf.
    ///
    /// Faces whose indices are out of range are skipped.
    #[must_use]
    pub fn build(mesh: &IndexedMesh, max_leaf_size: usize) -> Self {
        let boxes: Vec<(u32, Aabb)> = (0..mesh.face_count())
            .filter_map(|f| {
                let tri = mesh.triangle(f)?;
                Some((f as u32, Aabb::from_points(tri.iter()).padded(BOX_PADDING)))
            })
            .collect();

        let face_count = boxes.len();
        let root = if boxes.is_empty() {
            None
        } else {
            let indices: Vec<usize> = (0..boxes.len()).collect();
            Some(Self::build_recursive(&boxes, indices, max_leaf_size.max(1)))
        };

        Self { root, face_count }
    }

    fn build_recursive(boxes: &[(u32, Aabb)], mut indices: Vec<usize>, max_leaf: usize) -> BvhNode {
        let mut bbox = Aabb::empty();
        for &i in &indices {
            bbox.expand_to_include(&boxes[i].1.min);
            bbox.expand_to_include(&boxes[i].1.max);
        }

        if indices.len() <= max_leaf {
            return BvhNode::Leaf {
                bbox,
                faces: indices.iter().map(|&i| boxes[i].0).collect(),
            };
        }

        let axis = bbox.size().imax();
        indices.sort_by(|&a, &b| {
            let ca = boxes[a].1.center()[axis];
            let cb = boxes[b].1.center()[axis];
            ca.total_cmp(&cb)
        });

        let right_indices = indices.split_off(indices.len() / 2);
        let left = Self::build_recursive(boxes, indices, max_leaf);
        let right = Self::build_recursive(boxes, right_indices, max_leaf);

        BvhNode::Internal {
            bbox,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of faces in the tree.
    #[must_use]
    pub const fn face_count(&self) -> usize {
        self.face_count
    }

    /// Root node, `None` for an empty mesh.
    #[must_use]
    pub const fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Collect faces whose boxes are crossed by `origin + t * dir` for
    /// `t` in `[0, t_max]`.
    pub fn ray_candidates(
        &self,
        origin: &Point3<f64>,
        dir: &Vector3<f64>,
        t_max: f64,
        out: &mut Vec<u32>,
    ) {
        let mut stack: Vec<&BvhNode> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            if !ray_hits_box(node.bbox(), origin, dir, t_max) {
                continue;
            }
            match node {
                BvhNode::Leaf { faces, .. } => out.extend(faces.iter().copied()),
                BvhNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
    }

    /// Find the face minimizing `distance_squared(face)`.
    ///
    /// Subtrees whose box is farther than the best hit so far are pruned.
    /// Ties keep the lower face index, whatever the traversal order.
    pub fn nearest<F>(&self, point: &Point3<f64>, mut distance_squared: F) -> Option<(u32, f64)>
    where
        F: FnMut(u32) -> f64,
    {
        let mut best: Option<(u32, f64)> = None;
        let mut stack: Vec<&BvhNode> = self.root.iter().collect();

        while let Some(node) = stack.pop() {
            let bound = box_distance_squared(node.bbox(), point);
            if best.is_some_and(|(_, d)| bound > d) {
                continue;
            }
            match node {
                BvhNode::Leaf { faces, .. } => {
                    for &f in faces {
                        let d = distance_squared(f);
                        if best.is_none_or(|(bf, bd)| d < bd || (d == bd && f < bf)) {
                            best = Some((f, d));
                        }
                    }
                }
                BvhNode::Internal { left, right, .. } => {
                    // Visit the nearer child first
                    let dl = box_distance_squared(left.bbox(), point);
                    let dr = box_distance_squared(right.bbox(), point);
                    if dl <= dr {
                        stack.push(right);
                        stack.push(left);
                    } else {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }

        best
    }
}

fn box_distance_squared(bbox: &Aabb, p: &Point3<f64>) -> f64 {
    (0..3)
        .map(|i| {
            let d = (bbox.min[i] - p[i]).max(0.0).max(p[i] - bbox.max[i]);
            d * d
        })
        .sum()
}

/// Slab test of a parametric segment against a box.
fn ray_hits_box(bbox: &Aabb, origin: &Point3<f64>, dir: &Vector3<f64>, t_max: f64) -> bool {
    let mut lo = 0.0_f64;
    let mut hi = t_max;

    for i in 0..3 {
        if dir[i] == 0.0 {
            if origin[i] < bbox.min[i] || origin[i] > bbox.max[i] {
                return false;
            }
            continue;
        }
        let inv = 1.0 / dir[i];
        let t1 = (bbox.min[i] - origin[i]) * inv;
        let t2 = (bbox.max[i] - origin[i]) * inv;
        lo = lo.max(t1.min(t2));
        hi = hi.min(t1.max(t2));
        if lo > hi {
            return false;
        }
    }
    true
}
