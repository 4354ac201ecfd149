//! Breadth-first hop distances over free voxels.

use std::collections::VecDeque;

use gripper_query::MeshQuery;
use gripper_types::{DistanceFieldSettings, IndexedMesh, Point3};
use tracing::{debug, info, warn};

use crate::error::VoxelResult;
use crate::grid::VoxelGrid;
use crate::occupancy::{ForbiddenRule, Occupancy};
use crate::voxel::VoxelCoord;

/// Value of a voxel the propagation never reached.
pub const UNREACHED: i32 = -1;

/// Value of a forbidden voxel. Never overwritten by propagation.
pub const FORBIDDEN: i32 = i32::MAX;

/// Integer hop counts from a base point over the 26-connected free voxels.
///
/// Every value is [`UNREACHED`], [`FORBIDDEN`], or a non-negative hop count.
/// Hop counts form a breadth-first layering: a voxel at distance `d > 0` has
/// a 26-neighbor at distance `d - 1`.
///
/// # Example
///
/// ```
/// use gripper_voxel::{DiscreteDistanceField, Occupancy, VoxelCoord, VoxelGrid, UNREACHED};
/// use gripper_types::Point3;
///
/// let grid = VoxelGrid::new(Point3::origin(), Point3::new(3.0, 1.0, 1.0), 1.0).unwrap();
/// let mut occupancy = Occupancy::empty(grid);
/// occupancy.set_forbidden(VoxelCoord::new(1, 0, 0), true);
///
/// let field = DiscreteDistanceField::propagate(&occupancy, &Point3::new(0.5, 0.5, 0.5));
/// assert_eq!(field.distance_at(VoxelCoord::new(0, 0, 0)), Some(0));
/// // The wall cuts the row in two
/// assert_eq!(field.distance_at(VoxelCoord::new(2, 0, 0)), Some(UNREACHED));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteDistanceField {
    grid: VoxelGrid,
    values: Vec<i32>,
    seed: VoxelCoord,
}

impl DiscreteDistanceField {
    /// Voxelize the space around `mesh` and propagate distances from `base`.
    ///
    /// The mesh bounds are grown to enclose `base`, and the grid resolution
    /// is the shortest side of that box divided by `settings.units`. The grid
    /// is padded by two voxels on every side.
    /// Voxels inside the mesh are forbidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid cannot be built from the mesh bounds.
    pub fn build<Q>(
        mesh: &IndexedMesh,
        query: &Q,
        settings: &DistanceFieldSettings,
        base: &Point3<f64>,
    ) -> VoxelResult<Self>
    where
        Q: MeshQuery + ?Sized,
    {
        let grid = VoxelGrid::around(&mesh.bounds(), base, settings.units)?;
        let occupancy = Occupancy::voxelize(grid, query, ForbiddenRule::Inside);
        Ok(Self::propagate(&occupancy, base))
    }

    /// Propagate hop counts from the voxel containing `base`.
    ///
    /// A seed outside the grid or inside forbidden space reaches nothing.
    #[must_use]
    pub fn propagate(occupancy: &Occupancy, base: &Point3<f64>) -> Self {
        let grid = occupancy.grid().clone();
        let seed = grid.point_to_voxel(base);
        Self::propagate_from(occupancy, seed)
    }

    /// Propagate hop counts from a seed voxel.
    #[must_use]
    pub fn propagate_from(occupancy: &Occupancy, seed: VoxelCoord) -> Self {
        let grid = occupancy.grid().clone();
        let mut values: Vec<i32> = occupancy
            .as_slice()
            .iter()
            .map(|&f| if f { FORBIDDEN } else { UNREACHED })
            .collect();

        let mut queue = VecDeque::new();
        match grid.linear_index(seed) {
            Some(i) if values[i] != FORBIDDEN => {
                values[i] = 0;
                queue.push_back(seed);
            }
            Some(_) => warn!(?seed, "distance field seed is forbidden"),
            None => warn!(?seed, size = ?grid.size(), "distance field seed is outside the grid"),
        }

        while let Some(current) = queue.pop_front() {
            let Some(ci) = grid.linear_index(current) else {
                continue;
            };
            let next = values[ci] + 1;

            for neighbor in current.all_neighbors() {
                let Some(ni) = grid.linear_index(neighbor) else {
                    continue;
                };
                let value = values[ni];
                if value == FORBIDDEN {
                    continue;
                }
                if value == UNREACHED || value > next {
                    values[ni] = next;
                    queue.push_back(neighbor);
                }
            }
        }

        let field = Self { grid, values, seed };
        info!(
            size = ?field.grid.size(),
            reached = field.reached_count(),
            "distance field propagated"
        );
        debug!(max_distance = field.max_distance(), "distance field range");
        field
    }

    /// The underlying grid.
    #[must_use]
    pub const fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Voxel the propagation started from.
    #[must_use]
    pub const fn seed(&self) -> VoxelCoord {
        self.seed
    }

    /// Raw value at a voxel, `None` outside the grid.
    #[must_use]
    pub fn distance_at(&self, coord: VoxelCoord) -> Option<i32> {
        self.grid.linear_index(coord).map(|i| self.values[i])
    }

    /// Raw value at the voxel containing `p`, `None` outside the grid.
    #[must_use]
    pub fn distance_at_point(&self, p: &Point3<f64>) -> Option<i32> {
        self.distance_at(self.grid.point_to_voxel(p))
    }

    /// Check whether a voxel is forbidden.
    #[must_use]
    pub fn is_forbidden(&self, coord: VoxelCoord) -> bool {
        self.distance_at(coord) == Some(FORBIDDEN)
    }

    /// Number of voxels holding a hop count.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.values
            .iter()
            .filter(|&&v| v != UNREACHED && v != FORBIDDEN)
            .count()
    }

    /// Largest hop count, `None` if nothing was reached.
    #[must_use]
    pub fn max_distance(&self) -> Option<i32> {
        self.values
            .iter()
            .copied()
            .filter(|&v| v != UNREACHED && v != FORBIDDEN)
            .max()
    }

    /// Values in dense storage order.
    #[must_use]
    pub fn values(&self) -> &[i32] {
        &self.values
    }
}
