//! Finger joint curve initialization.

use gripper_query::{MeshQuery, MeshQueryService};
use gripper_types::{ContactPoint, FingerPath, FingerSettings, IndexedMesh};
use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

use crate::adjacency::EdgeGraph;
use crate::dijkstra::{ShortestPathTree, shortest_paths};
use crate::error::{GeodesicError, GeodesicResult};
use crate::visibility::{point_to_line_distance, segment_is_clear, visible_vertices};

/// Builds one [`FingerPath`] per contact point.
///
/// Holds the edge graph and borrows the mesh, its vertex normals and the
/// query service. All methods take `&self`, so one initializer can serve
/// several contact points from different threads.
#[derive(Debug)]
pub struct FingerInitializer<'a, Q: ?Sized> {
    mesh: &'a IndexedMesh,
    vertex_normals: &'a [Vector3<f64>],
    query: &'a Q,
    graph: EdgeGraph,
    settings: FingerSettings,
}

impl<'a> FingerInitializer<'a, MeshQueryService> {
    /// Initializer backed by a [`MeshQueryService`] and its vertex normals.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::InvalidSettings`] if the settings do not
    /// validate.
    pub fn from_service(
        service: &'a MeshQueryService,
        settings: FingerSettings,
    ) -> GeodesicResult<Self> {
        Self::new(service.mesh(), service.vertex_normals(), service, settings)
    }
}

impl<'a, Q> FingerInitializer<'a, Q>
where
    Q: MeshQuery + ?Sized,
{
    /// Create an initializer.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings do not validate or there is not
    /// exactly one normal per vertex.
    pub fn new(
        mesh: &'a IndexedMesh,
        vertex_normals: &'a [Vector3<f64>],
        query: &'a Q,
        settings: FingerSettings,
    ) -> GeodesicResult<Self> {
        settings.validate()?;
        if vertex_normals.len() != mesh.vertex_count() {
            return Err(GeodesicError::NormalCountMismatch {
                vertex_count: mesh.vertex_count(),
                normal_count: vertex_normals.len(),
            });
        }

        Ok(Self {
            mesh,
            vertex_normals,
            query,
            graph: EdgeGraph::from_mesh(mesh),
            settings,
        })
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &FingerSettings {
        &self.settings
    }

    /// Shortest path tree rooted at every vertex visible from `effector`.
    ///
    /// Depends only on the effector, so it can be shared by every contact.
    #[must_use]
    pub fn tree(&self, effector: &Point3<f64>) -> ShortestPathTree {
        let roots = visible_vertices(self.query, self.mesh, effector, self.settings.seed_epsilon);
        if roots.is_empty() {
            warn!(?effector, "no mesh vertex is visible from the effector");
        }
        let tree = shortest_paths(&self.graph, &roots);
        debug!(
            roots = roots.len(),
            reached = tree.reached_count(),
            vertices = self.graph.vertex_count(),
            "geodesic tree built"
        );
        tree
    }

    /// Build the finger for one contact point.
    #[must_use]
    pub fn initialize(&self, contact: &ContactPoint, effector: &Point3<f64>) -> FingerPath {
        self.initialize_with_tree(contact, effector, &self.tree(effector))
    }

    /// Build the finger for one contact point from a precomputed tree.
    #[must_use]
    pub fn initialize_with_tree(
        &self,
        contact: &ContactPoint,
        effector: &Point3<f64>,
        tree: &ShortestPathTree,
    ) -> FingerPath {
        let mut points = vec![contact.position];
        // Mesh vertex behind each point, for the clearance offset
        let mut sources: Vec<Option<u32>> = vec![None];

        if let Some(anchor) = self.anchor_vertex(contact, tree) {
            for v in tree.path_to_root(anchor as usize) {
                let p = self.mesh.vertices[v as usize];
                self.push_shortcut(&mut points, &mut sources, p, Some(v));
            }
        } else {
            warn!(
                contact = ?contact.position,
                "contact is not connected to any visible vertex; using a straight finger"
            );
        }
        points.push(*effector);
        sources.push(None);
        let raw_count = points.len();

        for (p, source) in points.iter_mut().zip(&sources) {
            if let Some(v) = source {
                *p += self.vertex_normals[*v as usize] * self.settings.clearance;
            }
        }

        let joints = resample_to_joint_count(points, self.settings.joint_count, |a, b| {
            segment_is_clear(self.query, a, b, self.settings.visibility_epsilon)
        });
        debug!(raw = raw_count, joints = joints.len(), "finger initialized");

        FingerPath::from_points(joints)
    }

    /// Vertex of the contact's face minimizing surface offset plus tree
    /// distance. `None` if no vertex of that face is reached.
    fn anchor_vertex(&self, contact: &ContactPoint, tree: &ShortestPathTree) -> Option<u32> {
        let face = self.query.closest_facet(&contact.position)?;
        let indices = self.mesh.faces.get(face)?;

        let mut best: Option<(u32, f64)> = None;
        for &v in indices {
            let Some(p) = self.mesh.vertices.get(v as usize) else {
                continue;
            };
            let cost = (contact.position - p).norm() + tree.distance(v as usize);
            if cost.is_finite() && best.is_none_or(|(_, c)| cost < c) {
                best = Some((v, cost));
            }
        }
        best.map(|(v, _)| v)
    }

    /// Append `p`, first dropping trailing points the line of sight from
    /// the point before them to `p` makes redundant.
    fn push_shortcut(
        &self,
        points: &mut Vec<Point3<f64>>,
        sources: &mut Vec<Option<u32>>,
        p: Point3<f64>,
        source: Option<u32>,
    ) {
        while points.len() >= 2 {
            let before_last = points[points.len() - 2];
            if !segment_is_clear(self.query, &before_last, &p, self.settings.visibility_epsilon) {
                break;
            }
            points.pop();
            sources.pop();
        }
        points.push(p);
        sources.push(source);
    }
}

/// Resample a polyline to exactly `joint_count` points.
///
/// The first and last points are kept. While there are too many points,
/// the interior point deviating least from the line through its neighbors
/// is removed, preferring points whose neighbors `is_clear` of each other
/// and falling back to the globally least-deviating point. While there are
/// too few, the longest segment is split at its midpoint. Ties go to the
/// lowest index.
///
/// Inputs with fewer than two points, or a `joint_count` below two, are
/// returned unchanged.
///
/// # Example
///
/// ```
/// use gripper_geodesic::resample_to_joint_count;
/// use gripper_types::Point3;
///
/// let raw: Vec<_> = (0..10).map(|i| Point3::new(f64::from(i), 0.0, 0.0)).collect();
/// let joints = resample_to_joint_count(raw, 4, |_, _| true);
///
/// assert_eq!(joints.len(), 4);
/// assert_eq!(joints[0], Point3::new(0.0, 0.0, 0.0));
/// assert_eq!(joints[3], Point3::new(9.0, 0.0, 0.0));
/// ```
pub fn resample_to_joint_count<F>(
    mut points: Vec<Point3<f64>>,
    joint_count: usize,
    mut is_clear: F,
) -> Vec<Point3<f64>>
where
    F: FnMut(&Point3<f64>, &Point3<f64>) -> bool,
{
    if points.len() < 2 || joint_count < 2 {
        return points;
    }

    while points.len() > joint_count {
        let mut best_clear: Option<(usize, f64)> = None;
        let mut best_any: Option<(usize, f64)> = None;

        for i in 1..points.len() - 1 {
            let deviation = point_to_line_distance(&points[i], &points[i - 1], &points[i + 1]);
            if best_any.is_none_or(|(_, d)| deviation < d) {
                best_any = Some((i, deviation));
            }
            if best_clear.is_none_or(|(_, d)| deviation < d) && is_clear(&points[i - 1], &points[i + 1]) {
                best_clear = Some((i, deviation));
            }
        }

        match best_clear.or(best_any) {
            Some((i, _)) => {
                points.remove(i);
            }
            None => break,
        }
    }

    while points.len() < joint_count {
        let mut longest = 0;
        let mut longest_len = f64::NEG_INFINITY;
        for i in 0..points.len() - 1 {
            let len = (points[i + 1] - points[i]).norm_squared();
            if len > longest_len {
                longest = i;
                longest_len = len;
            }
        }
        let mid = nalgebra::center(&points[longest], &points[longest + 1]);
        points.insert(longest + 1, mid);
    }

    points
}
