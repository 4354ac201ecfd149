//! Forbidden/free classification of a voxel grid.

use gripper_query::MeshQuery;
use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::info;

use crate::grid::VoxelGrid;
use crate::voxel::VoxelCoord;

/// Which side of a closed surface is forbidden.
///
/// Classification casts a ray from each voxel center along `+Z` and counts
/// distinct surface crossings. An odd count means the center is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForbiddenRule {
    /// Voxels inside the surface are forbidden (the object is solid).
    #[default]
    Inside,
    /// Voxels outside the surface are forbidden (the surface bounds the
    /// only usable space, as for a negative-space mesh).
    Outside,
}

impl ForbiddenRule {
    /// Classify a voxel from its ray hit count.
    #[must_use]
    pub const fn is_forbidden(self, hit_count: usize) -> bool {
        let inside = hit_count % 2 == 1;
        match self {
            Self::Inside => inside,
            Self::Outside => !inside,
        }
    }
}

/// Per-voxel forbidden flags over a [`VoxelGrid`].
#[derive(Debug, Clone, PartialEq)]
pub struct Occupancy {
    grid: VoxelGrid,
    forbidden: Vec<bool>,
}

impl Occupancy {
    /// A grid with every voxel free.
    #[must_use]
    pub fn empty(grid: VoxelGrid) -> Self {
        let forbidden = vec![false; grid.voxel_count()];
        Self { grid, forbidden }
    }

    /// Classify every voxel center with a parity ray cast against `query`.
    ///
    /// Voxels are classified in parallel; the result does not depend on
    /// thread scheduling.
    pub fn voxelize<Q>(grid: VoxelGrid, query: &Q, rule: ForbiddenRule) -> Self
    where
        Q: MeshQuery + ?Sized,
    {
        let up = Vector3::z();
        let forbidden: Vec<bool> = (0..grid.voxel_count())
            .into_par_iter()
            .map(|i| {
                let center = grid.voxel_to_point(grid.coord_at(i));
                rule.is_forbidden(query.intersect_ray(&center, &up).len())
            })
            .collect();

        let occupancy = Self { grid, forbidden };
        info!(
            size = ?occupancy.grid.size(),
            resolution = occupancy.grid.resolution(),
            forbidden = occupancy.forbidden_count(),
            ?rule,
            "voxelized"
        );
        occupancy
    }

    /// The underlying grid.
    #[must_use]
    pub const fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Check whether a voxel is forbidden. Voxels outside the grid are not.
    #[must_use]
    pub fn is_forbidden(&self, coord: VoxelCoord) -> bool {
        self.grid
            .linear_index(coord)
            .is_some_and(|i| self.forbidden[i])
    }

    /// Mark a voxel. Returns `false` if it lies outside the grid.
    pub fn set_forbidden(&mut self, coord: VoxelCoord, forbidden: bool) -> bool {
        match self.grid.linear_index(coord) {
            Some(i) => {
                self.forbidden[i] = forbidden;
                true
            }
            None => false,
        }
    }

    /// Number of forbidden voxels.
    #[must_use]
    pub fn forbidden_count(&self) -> usize {
        self.forbidden.iter().filter(|&&f| f).count()
    }

    /// Forbidden voxels in dense storage order.
    pub fn forbidden_voxels(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        self.forbidden
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f)
            .map(|(i, _)| self.grid.coord_at(i))
    }

    /// Forbidden flags in dense storage order.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.forbidden
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use gripper_query::MeshQueryService;
    use gripper_types::{IndexedMesh, Point3};
    use std::sync::Arc;

    fn cube_service() -> MeshQueryService {
        let cube = IndexedMesh::cuboid(Point3::new(1.0, 1.0, 1.0), Point3::new(3.0, 3.0, 3.0));
        MeshQueryService::new(Arc::new(cube)).unwrap()
    }

    fn four_cube_grid() -> VoxelGrid {
        VoxelGrid::new(Point3::origin(), Point3::new(4.0, 4.0, 4.0), 1.0).unwrap()
    }

    #[test]
    fn parity_rule() {
        assert!(ForbiddenRule::Inside.is_forbidden(1));
        assert!(!ForbiddenRule::Inside.is_forbidden(2));
        assert!(ForbiddenRule::Outside.is_forbidden(0));
        assert!(!ForbiddenRule::Outside.is_forbidden(3));
    }

    #[test]
    fn inside_rule_forbids_cube_interior() {
        let occupancy = Occupancy::voxelize(four_cube_grid(), &cube_service(), ForbiddenRule::Inside);

        // Voxels 1..3 on every axis have centers inside [1, 3]
        assert_eq!(occupancy.forbidden_count(), 8);
        assert!(occupancy.is_forbidden(VoxelCoord::new(1, 2, 1)));
        assert!(!occupancy.is_forbidden(VoxelCoord::new(0, 2, 1)));
        assert!(occupancy.forbidden_voxels().all(|c| (1..=2).contains(&c.x)));
    }

    #[test]
    fn outside_rule_is_complement() {
        let service = cube_service();
        let inside = Occupancy::voxelize(four_cube_grid(), &service, ForbiddenRule::Inside);
        let outside = Occupancy::voxelize(four_cube_grid(), &service, ForbiddenRule::Outside);

        assert_eq!(outside.forbidden_count(), 64 - 8);
        for (a, b) in inside.as_slice().iter().zip(outside.as_slice()) {
            assert_ne!(a, b);
        }
    }

    #[test]
    fn out_of_grid_is_not_forbidden() {
        let mut occupancy = Occupancy::empty(four_cube_grid());
        assert!(!occupancy.set_forbidden(VoxelCoord::new(9, 0, 0), true));
        assert!(!occupancy.is_forbidden(VoxelCoord::new(9, 0, 0)));
        assert!(occupancy.set_forbidden(VoxelCoord::new(0, 0, 0), true));
        assert_eq!(occupancy.forbidden_count(), 1);
    }
}
