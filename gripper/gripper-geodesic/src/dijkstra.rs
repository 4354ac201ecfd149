//! Multi-source Dijkstra with predecessor tracking.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::adjacency::EdgeGraph;

/// Distances and predecessors from a set of weighted roots.
///
/// Roots carry their seed distance and no parent. Unreached vertices have
/// infinite distance.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    distance: Vec<f64>,
    parent: Vec<Option<u32>>,
}

impl ShortestPathTree {
    /// A tree over `vertex_count` vertices that reaches nothing.
    #[must_use]
    pub fn unreached(vertex_count: usize) -> Self {
        Self {
            distance: vec![f64::INFINITY; vertex_count],
            parent: vec![None; vertex_count],
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.distance.len()
    }

    /// Distance of a vertex, infinite if unreached or unknown.
    #[must_use]
    pub fn distance(&self, vertex: usize) -> f64 {
        self.distance.get(vertex).copied().unwrap_or(f64::INFINITY)
    }

    /// Predecessor of a vertex, `None` for roots and unreached vertices.
    #[must_use]
    pub fn parent(&self, vertex: usize) -> Option<u32> {
        self.parent.get(vertex).copied().flatten()
    }

    /// Check whether a vertex was reached.
    #[must_use]
    pub fn is_reached(&self, vertex: usize) -> bool {
        self.distance(vertex).is_finite()
    }

    /// Number of reached vertices.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.distance.iter().filter(|d| d.is_finite()).count()
    }

    /// Vertices from `vertex` back to its root, both included.
    ///
    /// Empty if `vertex` was not reached.
    #[must_use]
    pub fn path_to_root(&self, vertex: usize) -> Vec<u32> {
        if !self.is_reached(vertex) {
            return Vec::new();
        }
        let mut path = vec![vertex as u32];
        let mut current = vertex;
        while let Some(p) = self.parent(current) {
            path.push(p);
            current = p as usize;
            // Parent links always lower the distance, but guard malformed trees
            if path.len() > self.distance.len() {
                break;
            }
        }
        path
    }
}

#[derive(Debug, Clone, Copy)]
struct State {
    vertex: u32,
    distance: f64,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; lower vertex first on ties
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Run Dijkstra from every `(root, seed distance)` simultaneously.
///
/// Roots out of range are ignored. A vertex listed twice keeps its smaller
/// seed distance.
///
/// # Example
///
/// ```
/// use gripper_geodesic::{EdgeGraph, shortest_paths};
/// use gripper_types::{IndexedMesh, Point3};
///
/// let cube = IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
/// let tree = shortest_paths(&EdgeGraph::from_mesh(&cube), &[(0, 0.0)]);
///
/// // Opposite corner: one face diagonal plus one edge
/// assert!((tree.distance(7) - (1.0 + 2f64.sqrt())).abs() < 1e-12);
/// assert_eq!(tree.path_to_root(7).last(), Some(&0));
/// ```
#[must_use]
pub fn shortest_paths(graph: &EdgeGraph, roots: &[(u32, f64)]) -> ShortestPathTree {
    let mut tree = ShortestPathTree::unreached(graph.vertex_count());
    let mut heap = BinaryHeap::with_capacity(graph.vertex_count());

    for &(vertex, distance) in roots {
        let v = vertex as usize;
        if v < tree.distance.len() && distance < tree.distance[v] {
            tree.distance[v] = distance;
            heap.push(State { vertex, distance });
        }
    }

    while let Some(State { vertex, distance }) = heap.pop() {
        let v = vertex as usize;
        if distance > tree.distance[v] {
            continue;
        }

        for &(neighbor, length) in graph.neighbors(v) {
            let n = neighbor as usize;
            let candidate = distance + length;
            if candidate < tree.distance[n] {
                tree.distance[n] = candidate;
                tree.parent[n] = Some(vertex);
                heap.push(State {
                    vertex: neighbor,
                    distance: candidate,
                });
            }
        }
    }

    tree
}
