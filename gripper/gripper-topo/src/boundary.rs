//! Boundary conditions of the gripper design domain.

use gripper_query::MeshQuery;
use gripper_types::{ContactPoint, Isometry3, TopoOptSettings};
use gripper_voxel::{ForbiddenRule, Occupancy, VoxelCoord, VoxelGrid};
use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

use crate::error::{ExportError, ExportResult};
use crate::indices::{element_indices, node_indices};

/// Fixed nodes, loaded nodes, loads and passive elements of the design
/// domain, in the frame of the first trajectory keyframe.
///
/// Voxel and node coordinates are kept alongside the optimizer indices so
/// callers can display them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryConditions {
    grid: VoxelGrid,
    attachment_nodes: Vec<VoxelCoord>,
    contact_voxels: Vec<VoxelCoord>,
    forbidden_voxels: Vec<VoxelCoord>,
    loads: Vec<Vector3<f64>>,
}

impl BoundaryConditions {
    /// Compute the boundary conditions.
    ///
    /// `forbidden` describes the solid the gripper must stay out of and is
    /// already expressed in the gripper frame; `rule` says whether its
    /// inside or its outside is forbidden. `contacts` are world-space and
    /// are moved into the gripper frame with the inverse of `gripper_frame`,
    /// the effector transform of the first keyframe.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid, the design domain
    /// cannot be gridded, or some contact has no free voxel anywhere in the
    /// domain.
    pub fn compute<Q>(
        forbidden: &Q,
        rule: ForbiddenRule,
        contacts: &[ContactPoint],
        gripper_frame: &Isometry3<f64>,
        settings: &TopoOptSettings,
    ) -> ExportResult<Self>
    where
        Q: MeshQuery + ?Sized,
    {
        settings.validate()?;
        let grid = VoxelGrid::new(settings.lower_bound, settings.upper_bound, settings.resolution)?;
        let occupancy = Occupancy::voxelize(grid.clone(), forbidden, rule);
        let forbidden_voxels: Vec<VoxelCoord> = occupancy.forbidden_voxels().collect();

        let attachment_nodes = attachment_nodes(&grid, settings.attachment_size / 2.0);

        let to_gripper = gripper_frame.inverse();
        let mut contact_voxels = Vec::with_capacity(contacts.len());
        let mut loads = Vec::with_capacity(contacts.len());
        for contact in contacts {
            let local = contact.transformed(&to_gripper);
            let start = grid.point_to_voxel(&local.position);
            let free = nearest_free_voxel(&occupancy, start)?;
            if free != start {
                debug!(?start, ?free, "contact voxel moved out of forbidden space");
            }
            contact_voxels.push(free);
            loads.push(local.load_direction());
        }

        info!(
            size = ?grid.size(),
            attachment = attachment_nodes.len(),
            contacts = contact_voxels.len(),
            forbidden = forbidden_voxels.len(),
            "boundary conditions computed"
        );

        Ok(Self {
            grid,
            attachment_nodes,
            contact_voxels,
            forbidden_voxels,
            loads,
        })
    }

    /// Design domain grid.
    #[must_use]
    pub const fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Elements per axis.
    #[must_use]
    pub const fn size(&self) -> [usize; 3] {
        self.grid.size()
    }

    /// Base-plane nodes inside the attachment disk.
    #[must_use]
    pub fn attachment_nodes(&self) -> &[VoxelCoord] {
        &self.attachment_nodes
    }

    /// Loaded voxel of each contact, in contact order.
    #[must_use]
    pub fn contact_voxels(&self) -> &[VoxelCoord] {
        &self.contact_voxels
    }

    /// Voxels the gripper may not occupy.
    #[must_use]
    pub fn forbidden_voxels(&self) -> &[VoxelCoord] {
        &self.forbidden_voxels
    }

    /// Load vector of each contact, in contact order.
    #[must_use]
    pub fn loads(&self) -> &[Vector3<f64>] {
        &self.loads
    }

    /// Fixed node indices.
    #[must_use]
    pub fn fixed_node_indices(&self) -> Vec<usize> {
        node_indices(self.size(), &self.attachment_nodes)
    }

    /// Loaded node indices.
    #[must_use]
    pub fn load_node_indices(&self) -> Vec<usize> {
        node_indices(self.size(), &self.contact_voxels)
    }

    /// Passive element indices.
    #[must_use]
    pub fn passive_element_indices(&self) -> Vec<usize> {
        element_indices(self.size(), &self.forbidden_voxels)
    }
}

/// Nodes of the `z = 0` layer within `radius` of the Z axis.
///
/// Distance is measured in the XY plane and must be strictly less than
/// `radius`. Nodes are listed x-major.
#[must_use]
pub fn attachment_nodes(grid: &VoxelGrid, radius: f64) -> Vec<VoxelCoord> {
    let lo = grid.point_to_node(&Point3::new(-radius, -radius, 0.0));
    let hi = grid.point_to_node(&Point3::new(radius, radius, 0.0));
    let radius_sq = radius * radius;

    let mut nodes = Vec::new();
    for x in lo.x..=hi.x {
        for y in lo.y..=hi.y {
            let node = VoxelCoord::new(x, y, 0);
            if !grid.contains_node(node) {
                continue;
            }
            let p = grid.node_to_point(node);
            if p.x * p.x + p.y * p.y < radius_sq {
                nodes.push(node);
            }
        }
    }
    nodes
}

/// Closest voxel to `start` that is inside the grid and not forbidden.
///
/// Candidates are visited in Chebyshev shells of growing radius, each
/// shell in x, then y, then z order; the first free one wins.
///
/// # Errors
///
/// Returns [`ExportError::NoFreeVoxel`] once every remaining shell lies
/// outside the grid.
pub fn nearest_free_voxel(occupancy: &Occupancy, start: VoxelCoord) -> ExportResult<VoxelCoord> {
    let grid = occupancy.grid();
    let size = grid.size();

    // Chebyshev distance from start to the farthest grid corner
    let mut reach = 0i64;
    for (axis, c) in start.as_array().into_iter().enumerate() {
        let c = i64::from(c);
        let last = i64::try_from(size[axis]).unwrap_or(i64::MAX) - 1;
        reach = reach.max(c.abs()).max((last - c).abs());
    }
    let reach = u32::try_from(reach).unwrap_or(u32::MAX);

    for radius in 0..=reach {
        let found = start
            .shell(radius)
            .find(|&v| grid.contains(v) && !occupancy.is_forbidden(v));
        if let Some(v) = found {
            return Ok(v);
        }
    }
    Err(ExportError::NoFreeVoxel { voxel: start })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gripper_query::MeshQueryService;
    use gripper_types::IndexedMesh;
    use std::sync::Arc;

    fn unit_grid(n: f64) -> VoxelGrid {
        VoxelGrid::new(Point3::origin(), Point3::new(n, n, n), 1.0).unwrap()
    }

    #[test]
    fn free_start_is_returned_as_is() {
        let occupancy = Occupancy::empty(unit_grid(4.0));
        let start = VoxelCoord::new(1, 2, 3);
        assert_eq!(nearest_free_voxel(&occupancy, start).unwrap(), start);
    }

    #[test]
    fn forbidden_start_moves_to_first_shell_voxel() {
        let mut occupancy = Occupancy::empty(unit_grid(5.0));
        let start = VoxelCoord::new(2, 2, 2);
        occupancy.set_forbidden(start, true);
        // First in scan order on shell 1
        assert_eq!(nearest_free_voxel(&occupancy, start).unwrap(), VoxelCoord::new(1, 1, 1));

        occupancy.set_forbidden(VoxelCoord::new(1, 1, 1), true);
        assert_eq!(nearest_free_voxel(&occupancy, start).unwrap(), VoxelCoord::new(1, 1, 2));
    }

    #[test]
    fn shells_skip_voxels_outside_the_grid() {
        let mut occupancy = Occupancy::empty(unit_grid(3.0));
        let start = VoxelCoord::new(0, 0, 0);
        occupancy.set_forbidden(start, true);
        assert_eq!(nearest_free_voxel(&occupancy, start).unwrap(), VoxelCoord::new(0, 0, 1));
    }

    #[test]
    fn start_outside_grid_still_finds_a_voxel() {
        let occupancy = Occupancy::empty(unit_grid(2.0));
        let found = nearest_free_voxel(&occupancy, VoxelCoord::new(5, 0, 0)).unwrap();
        assert_eq!(found, VoxelCoord::new(1, 0, 0));
    }

    #[test]
    fn fully_forbidden_grid_fails() {
        let grid = unit_grid(2.0);
        let mut occupancy = Occupancy::empty(grid.clone());
        for v in grid.voxels() {
            occupancy.set_forbidden(v, true);
        }
        assert!(matches!(
            nearest_free_voxel(&occupancy, VoxelCoord::new(0, 0, 0)),
            Err(ExportError::NoFreeVoxel { .. })
        ));
    }

    #[test]
    fn attachment_disk_on_base_layer() {
        let grid = VoxelGrid::new(Point3::new(-2.0, -2.0, 0.0), Point3::new(2.0, 2.0, 2.0), 1.0).unwrap();
        let nodes = attachment_nodes(&grid, 1.5);

        // Lattice points with x² + y² < 2.25: the origin, its 4 axis
        // neighbors and the 4 diagonals at distance sqrt(2)
        assert_eq!(nodes.len(), 9);
        assert!(nodes.iter().all(|n| n.z == 0));
        assert!(nodes.contains(&VoxelCoord::new(2, 2, 0)));
        assert!(!nodes.contains(&VoxelCoord::new(0, 2, 0)));
    }

    #[test]
    fn contacts_are_moved_into_the_gripper_frame() {
        // Forbid the inside of a block in the middle of the domain
        let block = IndexedMesh::cuboid(Point3::new(-0.5, -0.5, 1.0), Point3::new(0.5, 0.5, 2.0));
        let service = MeshQueryService::new(Arc::new(block)).unwrap();
        let settings = TopoOptSettings::default()
            .with_bounds(Point3::new(-2.0, -2.0, 0.0), Point3::new(2.0, 2.0, 3.0))
            .with_resolution(0.5)
            .with_attachment_size(1.0);

        let frame = Isometry3::translation(0.0, 0.0, 10.0);
        let contact = ContactPoint::new(Point3::new(1.25, 0.25, 11.25), gripper_types::Vector3::x());

        let bc = BoundaryConditions::compute(&service, ForbiddenRule::Inside, &[contact], &frame, &settings)
            .unwrap();

        assert_eq!(bc.size(), [8, 8, 6]);
        assert_eq!(bc.forbidden_voxels().len(), 2 * 2 * 2);
        assert_eq!(bc.contact_voxels(), &[VoxelCoord::new(6, 4, 2)]);
        assert_relative_eq!(bc.loads()[0], -gripper_types::Vector3::x());

        let passive = bc.passive_element_indices();
        assert_eq!(passive.len(), 8);
        assert!(passive.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(bc.load_node_indices().len(), 1);
        assert!(!bc.fixed_node_indices().is_empty());
    }

    #[test]
    fn forbidden_contact_is_relocated() {
        let block = IndexedMesh::cuboid(Point3::new(-0.5, -0.5, 1.0), Point3::new(0.5, 0.5, 2.0));
        let service = MeshQueryService::new(Arc::new(block)).unwrap();
        let settings = TopoOptSettings::default()
            .with_bounds(Point3::new(-2.0, -2.0, 0.0), Point3::new(2.0, 2.0, 3.0))
            .with_resolution(0.5);
        let contact = ContactPoint::new(Point3::new(0.25, 0.25, 1.25), gripper_types::Vector3::z());

        let bc = BoundaryConditions::compute(
            &service,
            ForbiddenRule::Inside,
            &[contact],
            &Isometry3::identity(),
            &settings,
        )
        .unwrap();

        let voxel = bc.contact_voxels()[0];
        assert!(!bc.forbidden_voxels().contains(&voxel));
        assert_eq!(voxel.chebyshev_distance(VoxelCoord::new(4, 4, 2)), 1);
    }
}
