//! Voxel coordinate types.

/// A discrete 3D coordinate on the voxel or node lattice.
///
/// Uses `i32` so that points outside the grid map to negative or
/// out-of-range coordinates instead of wrapping.
///
/// # Example
///
/// ```
/// use gripper_voxel::VoxelCoord;
///
/// let coord = VoxelCoord::new(1, 2, 3);
/// assert_eq!(coord.all_neighbors().len(), 26);
/// assert_eq!(coord.chebyshev_distance(VoxelCoord::new(4, 2, 1)), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelCoord {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl VoxelCoord {
    /// Creates a new voxel coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The coordinate as an array.
    #[must_use]
    pub const fn as_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// Component-wise sum.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.x.wrapping_add(dx),
            self.y.wrapping_add(dy),
            self.z.wrapping_add(dz),
        )
    }

    /// The 26 neighbors (Moore neighborhood), scanned x-major then y then z.
    #[must_use]
    pub fn all_neighbors(self) -> [Self; 26] {
        let mut result = [Self::default(); 26];
        let mut idx = 0;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    result[idx] = self.offset(dx, dy, dz);
                    idx += 1;
                }
            }
        }

        result
    }

    /// Chebyshev (L-infinity) distance to another coordinate.
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        let dxy = if dx > dy { dx } else { dy };
        if dxy > dz { dxy } else { dz }
    }

    /// Coordinates at exactly Chebyshev distance `radius`, scanned x-major
    /// then y then z.
    ///
    /// Radius 0 yields only `self`.
    ///
    /// # Example
    ///
    /// ```
    /// use gripper_voxel::VoxelCoord;
    ///
    /// let center = VoxelCoord::new(0, 0, 0);
    /// assert_eq!(center.shell(0).count(), 1);
    /// assert_eq!(center.shell(1).count(), 26);
    /// assert_eq!(center.shell(2).count(), 125 - 27);
    /// ```
    pub fn shell(self, radius: u32) -> impl Iterator<Item = Self> {
        let r = radius as i32;
        (-r..=r).flat_map(move |dx| {
            (-r..=r).flat_map(move |dy| {
                (-r..=r).filter_map(move |dz| {
                    let on_shell = dx.abs() == r || dy.abs() == r || dz.abs() == r;
                    on_shell.then(|| self.offset(dx, dy, dz))
                })
            })
        })
    }
}

impl From<[i32; 3]> for VoxelCoord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_exclude_self_and_are_unique() {
        let c = VoxelCoord::new(5, 5, 5);
        let mut neighbors = c.all_neighbors().to_vec();
        assert!(!neighbors.contains(&c));
        neighbors.sort();
        neighbors.dedup();
        assert_eq!(neighbors.len(), 26);
        assert!(neighbors.iter().all(|n| n.chebyshev_distance(c) == 1));
    }

    #[test]
    fn shell_scan_order() {
        let shell: Vec<_> = VoxelCoord::new(0, 0, 0).shell(1).collect();
        assert_eq!(shell.first(), Some(&VoxelCoord::new(-1, -1, -1)));
        assert_eq!(shell.get(1), Some(&VoxelCoord::new(-1, -1, 0)));
        assert_eq!(shell.last(), Some(&VoxelCoord::new(1, 1, 1)));
    }

    #[test]
    fn shell_members_are_at_radius() {
        let center = VoxelCoord::new(3, -2, 7);
        assert!(center.shell(3).all(|c| c.chebyshev_distance(center) == 3));
    }
}
