//! Undirected mesh edge graph.

use gripper_types::IndexedMesh;

/// Vertex adjacency of a triangle mesh, weighted by edge length.
///
/// Each undirected edge is stored once per endpoint. Edges shared by two
/// faces appear once. Faces with out-of-range indices are skipped.
#[derive(Debug, Clone)]
pub struct EdgeGraph {
    neighbors: Vec<Vec<(u32, f64)>>,
}

impl EdgeGraph {
    /// Build the edge graph of a mesh.
    #[must_use]
    pub fn from_mesh(mesh: &IndexedMesh) -> Self {
        let mut neighbors: Vec<Vec<(u32, f64)>> = vec![Vec::new(); mesh.vertex_count()];

        for (f, &[a, b, c]) in mesh.faces.iter().enumerate() {
            let Some([pa, pb, pc]) = mesh.triangle(f) else {
                continue;
            };
            Self::link(&mut neighbors, a, b, (pb - pa).norm());
            Self::link(&mut neighbors, b, c, (pc - pb).norm());
            Self::link(&mut neighbors, c, a, (pa - pc).norm());
        }

        Self { neighbors }
    }

    fn link(neighbors: &mut [Vec<(u32, f64)>], a: u32, b: u32, length: f64) {
        if neighbors[a as usize].iter().any(|&(n, _)| n == b) {
            return;
        }
        neighbors[a as usize].push((b, length));
        neighbors[b as usize].push((a, length));
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// `(neighbor, edge length)` pairs of a vertex. Empty for unknown vertices.
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> &[(u32, f64)] {
        self.neighbors.get(vertex).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use gripper_types::Point3;

    #[test]
    fn cube_edges_are_shared() {
        let cube = IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let graph = EdgeGraph::from_mesh(&cube);

        assert_eq!(graph.vertex_count(), 8);
        // 12 box edges + 6 face diagonals
        assert_eq!(graph.edge_count(), 18);
        for v in 0..8 {
            for &(n, len) in graph.neighbors(v) {
                assert!(graph.neighbors(n as usize).iter().any(|&(m, l)| m as usize == v && l == len));
            }
        }
    }

    #[test]
    fn unknown_vertex_has_no_neighbors() {
        let graph = EdgeGraph::from_mesh(&IndexedMesh::new());
        assert_eq!(graph.vertex_count(), 0);
        assert!(graph.neighbors(3).is_empty());
    }
}
