//! Dense voxel lattice geometry.

use gripper_types::Aabb;
use nalgebra::{Point3, Vector3};

use crate::error::{VoxelError, VoxelResult};
use crate::voxel::VoxelCoord;

/// Slack subtracted before rounding the voxel count up, so an extent that is
/// an exact multiple of the resolution does not gain a sliver voxel.
const SIZE_EPSILON: f64 = 1e-9;

/// An axis-aligned voxel lattice.
///
/// The grid covers `[lower, upper]` with cubic voxels of edge `resolution`.
/// Its size along each axis is `ceil((upper - lower) / resolution)`, at
/// least one.
///
/// # Coordinate maps
///
/// | map | formula |
/// |---|---|
/// | point → voxel | `floor((p - lower) / res)` |
/// | point → node | `round((p - lower) / res)` |
/// | voxel → point | `lower + (v + 0.5) * res` (cell center) |
/// | node → point | `lower + v * res` (cell corner) |
///
/// # Example
///
/// ```
/// use gripper_voxel::{VoxelCoord, VoxelGrid};
/// use gripper_types::Point3;
///
/// let grid = VoxelGrid::new(Point3::origin(), Point3::new(1.0, 2.0, 1.0), 0.5).unwrap();
/// assert_eq!(grid.size(), [2, 4, 2]);
///
/// let v = grid.point_to_voxel(&Point3::new(0.7, 0.2, 0.1));
/// assert_eq!(v, VoxelCoord::new(1, 0, 0));
/// assert_eq!(grid.voxel_to_point(v), Point3::new(0.75, 0.25, 0.25));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    lower: Point3<f64>,
    upper: Point3<f64>,
    resolution: f64,
    size: [usize; 3],
}

impl VoxelGrid {
    /// Create a grid over `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolution is not positive and finite, the
    /// bounds are inverted, or the grid is too large to index.
    pub fn new(lower: Point3<f64>, upper: Point3<f64>, resolution: f64) -> VoxelResult<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(VoxelError::InvalidResolution(resolution));
        }
        if let Some(axis) = (0..3).find(|&i| upper[i] < lower[i]) {
            return Err(VoxelError::InvertedBounds { axis });
        }

        let cells: [f64; 3] =
            std::array::from_fn(|i| ((upper[i] - lower[i]) / resolution - SIZE_EPSILON).ceil());
        let size = cells.map(|c| (c as usize).max(1));
        let [x, y, z] = size;

        // Node coordinates go one past the voxel count and must fit an i32
        let axis_too_long = cells.iter().any(|&c| c >= f64::from(i32::MAX - 1));
        if axis_too_long || x.checked_mul(y).and_then(|xy| xy.checked_mul(z)).is_none() {
            return Err(VoxelError::TooLarge { x, y, z });
        }

        Ok(Self {
            lower,
            upper,
            resolution,
            size,
        })
    }

    /// Grid around a mesh's bounding box that also encloses `base`.
    ///
    /// `bounds` is first grown to enclose `base`. The resolution is the
    /// shortest side of that enclosing box divided by `units`, and the box is
    /// padded by two voxels on every side.
    ///
    /// # Errors
    ///
    /// Returns an error if `units` is zero or the enclosing box is flat or empty.
    pub fn around(bounds: &Aabb, base: &Point3<f64>, units: usize) -> VoxelResult<Self> {
        if units == 0 {
            return Err(VoxelError::InvalidUnits);
        }
        let mut enclosing = *bounds;
        enclosing.expand_to_include(base);
        let resolution = enclosing.shortest_side() / units as f64;

        let padded = enclosing.padded(2.0 * resolution);

        Self::new(padded.min, padded.max, resolution)
    }

    /// Lower corner.
    #[must_use]
    pub const fn lower(&self) -> Point3<f64> {
        self.lower
    }

    /// Upper corner as given at construction.
    #[must_use]
    pub const fn upper(&self) -> Point3<f64> {
        self.upper
    }

    /// Voxel edge length.
    #[must_use]
    pub const fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Voxels along each axis.
    #[must_use]
    pub const fn size(&self) -> [usize; 3] {
        self.size
    }

    /// Nodes along each axis (one more than voxels).
    #[must_use]
    pub const fn node_size(&self) -> [usize; 3] {
        [self.size[0] + 1, self.size[1] + 1, self.size[2] + 1]
    }

    /// Total number of voxels.
    #[must_use]
    pub const fn voxel_count(&self) -> usize {
        self.size[0] * self.size[1] * self.size[2]
    }

    /// Check whether a voxel coordinate is within `[0, size)` on every axis.
    #[must_use]
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        coord
            .as_array()
            .iter()
            .zip(self.size)
            .all(|(&c, s)| c >= 0 && (c as usize) < s)
    }

    /// Check whether a node coordinate is within `[0, size]` on every axis.
    #[must_use]
    pub fn contains_node(&self, coord: VoxelCoord) -> bool {
        coord
            .as_array()
            .iter()
            .zip(self.size)
            .all(|(&c, s)| c >= 0 && (c as usize) <= s)
    }

    fn scaled(&self, p: &Point3<f64>) -> Vector3<f64> {
        (p - self.lower) / self.resolution
    }

    /// Voxel containing `p`. May lie outside the grid.
    #[must_use]
    pub fn point_to_voxel(&self, p: &Point3<f64>) -> VoxelCoord {
        let s = self.scaled(p);
        VoxelCoord::new(s.x.floor() as i32, s.y.floor() as i32, s.z.floor() as i32)
    }

    /// Node nearest to `p`. May lie outside the grid.
    #[must_use]
    pub fn point_to_node(&self, p: &Point3<f64>) -> VoxelCoord {
        let s = self.scaled(p);
        VoxelCoord::new(s.x.round() as i32, s.y.round() as i32, s.z.round() as i32)
    }

    /// Center of a voxel.
    #[must_use]
    pub fn voxel_to_point(&self, coord: VoxelCoord) -> Point3<f64> {
        self.node_to_point(coord) + Vector3::repeat(0.5 * self.resolution)
    }

    /// Position of a node.
    #[must_use]
    pub fn node_to_point(&self, coord: VoxelCoord) -> Point3<f64> {
        let [x, y, z] = coord.as_array();
        self.lower + Vector3::new(f64::from(x), f64::from(y), f64::from(z)) * self.resolution
    }

    /// Position of a voxel in dense storage, x fastest.
    ///
    /// Returns `None` outside the grid.
    #[must_use]
    pub fn linear_index(&self, coord: VoxelCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let [x, y, z] = coord.as_array().map(|c| c as usize);
        Some(x + self.size[0] * (y + self.size[1] * z))
    }

    /// Inverse of [`linear_index`](Self::linear_index).
    #[must_use]
    pub const fn coord_at(&self, index: usize) -> VoxelCoord {
        let x = index % self.size[0];
        let yz = index / self.size[0];
        let y = yz % self.size[1];
        let z = yz / self.size[1];
        VoxelCoord::new(x as i32, y as i32, z as i32)
    }

    /// Every voxel coordinate in dense storage order.
    pub fn voxels(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        (0..self.voxel_count()).map(|i| self.coord_at(i))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_grid() -> VoxelGrid {
        VoxelGrid::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0), 0.5).unwrap()
    }

    #[test]
    fn exact_multiple_has_no_sliver() {
        assert_eq!(unit_grid().size(), [2, 2, 2]);
        let grid = VoxelGrid::new(Point3::origin(), Point3::new(0.3, 0.1, 1.0), 0.1).unwrap();
        assert_eq!(grid.size(), [3, 1, 10]);
    }

    #[test]
    fn partial_voxel_rounds_up() {
        let grid = VoxelGrid::new(Point3::origin(), Point3::new(1.1, 0.0, 0.4), 0.5).unwrap();
        assert_eq!(grid.size(), [3, 1, 1]);
        assert_eq!(grid.node_size(), [4, 2, 2]);
    }

    #[test]
    fn rejects_bad_input() {
        let o = Point3::origin();
        assert!(matches!(
            VoxelGrid::new(o, Point3::new(1.0, 1.0, 1.0), 0.0),
            Err(VoxelError::InvalidResolution(_))
        ));
        assert!(matches!(
            VoxelGrid::new(o, Point3::new(1.0, -1.0, 1.0), 0.1),
            Err(VoxelError::InvertedBounds { axis: 1 })
        ));
        assert!(matches!(
            VoxelGrid::new(o, Point3::new(1e12, 1.0, 1.0), 1e-3),
            Err(VoxelError::TooLarge { .. })
        ));
    }

    #[test]
    fn around_pads_two_voxels_and_encloses_base() {
        let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        let base = Point3::new(0.5, 1.0, 5.0);
        let grid = VoxelGrid::around(&bounds, &base, 10).unwrap();

        assert_relative_eq!(grid.resolution(), 0.1);
        assert_relative_eq!(grid.lower(), Point3::new(-0.2, -0.2, -0.2), epsilon = 1e-12);
        assert_eq!(grid.size(), [14, 24, 54]);
        assert!(grid.contains(grid.point_to_voxel(&base)));
    }

    #[test]
    fn around_sizes_voxels_from_the_box_enclosing_base() {
        // Thin plate with the base well above it
        let bounds = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 0.1));
        let base = Point3::new(0.5, 0.5, 2.0);
        let grid = VoxelGrid::around(&bounds, &base, 10).unwrap();

        assert_relative_eq!(grid.resolution(), 0.1);
        assert_relative_eq!(grid.lower(), Point3::new(-0.2, -0.2, -0.2), epsilon = 1e-12);
        assert_eq!(grid.size(), [14, 14, 24]);
        assert!(grid.contains(grid.point_to_voxel(&base)));
    }

    #[test]
    fn voxel_and_node_maps_differ_by_half_cell() {
        let grid = unit_grid();
        let p = Point3::new(0.3, 0.6, 0.9);
        assert_eq!(grid.point_to_voxel(&p), VoxelCoord::new(0, 1, 1));
        assert_eq!(grid.point_to_node(&p), VoxelCoord::new(1, 1, 2));
        assert_eq!(grid.node_to_point(VoxelCoord::new(1, 1, 2)), Point3::new(0.5, 0.5, 1.0));
        assert_eq!(grid.voxel_to_point(VoxelCoord::new(0, 1, 1)), Point3::new(0.25, 0.75, 0.75));
    }

    #[test]
    fn linear_index_roundtrip() {
        let grid = VoxelGrid::new(Point3::origin(), Point3::new(3.0, 2.0, 4.0), 1.0).unwrap();
        for (i, coord) in grid.voxels().enumerate() {
            assert_eq!(grid.linear_index(coord), Some(i));
        }
        assert_eq!(grid.voxels().count(), 24);
        assert_eq!(grid.linear_index(VoxelCoord::new(3, 0, 0)), None);
        assert_eq!(grid.linear_index(VoxelCoord::new(0, -1, 0)), None);
    }

    #[test]
    fn node_bounds_are_inclusive() {
        let grid = unit_grid();
        assert!(grid.contains_node(VoxelCoord::new(2, 2, 2)));
        assert!(!grid.contains(VoxelCoord::new(2, 2, 2)));
    }
}
