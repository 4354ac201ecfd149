//! Element and node numbering of the optimizer's structured mesh.
//!
//! The optimizer numbers elements and nodes from 1, walking y downward
//! inside each x column and x inside each z layer. Both formulas mirror the
//! y axis. The node lattice has one more step per axis than the element
//! lattice.

use gripper_voxel::VoxelCoord;

/// 1-based element index of a voxel in a grid of `size` elements.
///
/// `None` if the voxel is outside the grid.
///
/// # Example
///
/// ```
/// use gripper_topo::element_index;
/// use gripper_voxel::VoxelCoord;
///
/// // Top of the first column comes first
/// assert_eq!(element_index([2, 3, 1], VoxelCoord::new(0, 2, 0)), Some(1));
/// assert_eq!(element_index([2, 3, 1], VoxelCoord::new(0, 0, 0)), Some(3));
/// assert_eq!(element_index([2, 3, 1], VoxelCoord::new(1, 0, 0)), Some(6));
/// ```
#[must_use]
pub fn element_index(size: [usize; 3], voxel: VoxelCoord) -> Option<usize> {
    let [x, y, z] = checked(voxel, size)?;
    let [sx, sy, _] = size;
    Some(z * sx * sy + x * sy + (sy - y - 1) + 1)
}

/// 1-based node index of a lattice node in a grid of `size` elements.
///
/// `None` if the node is outside the `size + 1` node lattice.
#[must_use]
pub fn node_index(size: [usize; 3], node: VoxelCoord) -> Option<usize> {
    let [x, y, z] = checked(node, size.map(|s| s + 1))?;
    let [sx, sy, _] = size;
    Some(z * (sx + 1) * (sy + 1) + x * (sy + 1) + (sy - y) + 1)
}

/// Sorted, duplicate-free element indices of the in-grid voxels.
#[must_use]
pub fn element_indices(size: [usize; 3], voxels: &[VoxelCoord]) -> Vec<usize> {
    sorted_unique(voxels.iter().filter_map(|&v| element_index(size, v)))
}

/// Sorted, duplicate-free node indices of the in-lattice nodes.
#[must_use]
pub fn node_indices(size: [usize; 3], nodes: &[VoxelCoord]) -> Vec<usize> {
    sorted_unique(nodes.iter().filter_map(|&n| node_index(size, n)))
}

fn checked(coord: VoxelCoord, extent: [usize; 3]) -> Option<[usize; 3]> {
    let mut out = [0usize; 3];
    for (axis, value) in coord.as_array().into_iter().enumerate() {
        let value = usize::try_from(value).ok()?;
        if value >= extent[axis] {
            return None;
        }
        out[axis] = value;
    }
    Some(out)
}

fn sorted_unique(indices: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut indices: Vec<usize> = indices.collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}
