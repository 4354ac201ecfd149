//! Connected components of forbidden space.

use crate::occupancy::Occupancy;
use crate::union_find::DisjointSet;
use crate::voxel::VoxelCoord;

/// 26-connected components of the forbidden voxels of an [`Occupancy`].
///
/// Regions are numbered `0..region_count()` in order of their first voxel
/// in dense storage order.
///
/// # Example
///
/// ```
/// use gripper_voxel::{ForbiddenRegions, Occupancy, VoxelCoord, VoxelGrid};
/// use gripper_types::Point3;
///
/// let grid = VoxelGrid::new(Point3::origin(), Point3::new(5.0, 1.0, 1.0), 1.0).unwrap();
/// let mut occupancy = Occupancy::empty(grid);
/// for x in [0, 1, 3] {
///     occupancy.set_forbidden(VoxelCoord::new(x, 0, 0), true);
/// }
///
/// let regions = ForbiddenRegions::label(&occupancy);
/// assert_eq!(regions.region_count(), 2);
/// assert_eq!(regions.region_sizes(), &[2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenRegions {
    labels: Vec<Option<usize>>,
    sizes: Vec<usize>,
    size: [usize; 3],
}

impl ForbiddenRegions {
    /// Label the forbidden voxels of `occupancy`.
    #[must_use]
    pub fn label(occupancy: &Occupancy) -> Self {
        let grid = occupancy.grid();
        let forbidden = occupancy.as_slice();
        let mut sets = DisjointSet::new(forbidden.len());

        for (i, _) in forbidden.iter().enumerate().filter(|&(_, &f)| f) {
            let coord = grid.coord_at(i);
            for neighbor in coord.all_neighbors() {
                if let Some(j) = grid.linear_index(neighbor) {
                    if j > i && forbidden[j] {
                        sets.merge(i, j);
                    }
                }
            }
        }

        let mut root_label: Vec<Option<usize>> = vec![None; forbidden.len()];
        let mut labels = vec![None; forbidden.len()];
        let mut sizes = Vec::new();

        for (i, _) in forbidden.iter().enumerate().filter(|&(_, &f)| f) {
            let root = sets.find(i);
            let label = *root_label[root].get_or_insert_with(|| {
                sizes.push(0);
                sizes.len() - 1
            });
            sizes[label] += 1;
            labels[i] = Some(label);
        }

        Self {
            labels,
            sizes,
            size: grid.size(),
        }
    }

    /// Number of regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.sizes.len()
    }

    /// Voxel count of each region.
    #[must_use]
    pub fn region_sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Region containing a voxel, `None` if free or outside the grid.
    #[must_use]
    pub fn region_of(&self, coord: VoxelCoord) -> Option<usize> {
        let [x, y, z] = coord.as_array();
        let [sx, sy, sz] = self.size;
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= sx || y >= sy || z >= sz {
            return None;
        }
        self.labels[x + sx * (y + sy * z)]
    }

    /// Index of the region with the most voxels. Ties favor the lower index.
    #[must_use]
    pub fn largest_region(&self) -> Option<usize> {
        self.sizes
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, usize)>, (i, &s)| match best {
                Some((_, bs)) if bs >= s => best,
                _ => Some((i, s)),
            })
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::grid::VoxelGrid;
    use gripper_types::Point3;

    fn occupancy(cells: &[(i32, i32, i32)]) -> Occupancy {
        let grid = VoxelGrid::new(Point3::origin(), Point3::new(4.0, 4.0, 4.0), 1.0).unwrap();
        let mut occupancy = Occupancy::empty(grid);
        for &(x, y, z) in cells {
            occupancy.set_forbidden(VoxelCoord::new(x, y, z), true);
        }
        occupancy
    }

    #[test]
    fn diagonal_voxels_are_connected() {
        let regions = ForbiddenRegions::label(&occupancy(&[(0, 0, 0), (1, 1, 1), (2, 2, 2)]));
        assert_eq!(regions.region_count(), 1);
        assert_eq!(regions.region_of(VoxelCoord::new(2, 2, 2)), Some(0));
    }

    #[test]
    fn separate_blobs() {
        let regions = ForbiddenRegions::label(&occupancy(&[
            (0, 0, 0),
            (3, 3, 3),
            (3, 2, 3),
            (3, 1, 3),
        ]));
        assert_eq!(regions.region_count(), 2);
        assert_eq!(regions.region_sizes(), &[1, 3]);
        assert_eq!(regions.largest_region(), Some(1));
        assert_eq!(regions.region_of(VoxelCoord::new(1, 1, 1)), None);
        assert_eq!(regions.region_of(VoxelCoord::new(-1, 0, 0)), None);
    }

    #[test]
    fn empty_occupancy_has_no_regions() {
        let regions = ForbiddenRegions::label(&occupancy(&[]));
        assert_eq!(regions.region_count(), 0);
        assert_eq!(regions.largest_region(), None);
    }
}
