//! Synthesis session: inputs, cached derived values and their recompute.

use std::path::Path;
use std::sync::Arc;

use gripper_geodesic::FingerInitializer;
use gripper_kinematics::{GantryWrist, Kinematics};
use gripper_query::MeshQueryService;
use gripper_topo::{BoundaryConditions, ToPyConfig, export_topy_config};
use gripper_trajectory::TrajectoryInitializer;
use gripper_types::{
    ContactPoint, DistanceFieldSettings, FingerPath, FingerSettings, GripperSettings, IndexedMesh,
    Pose, TopoOptSettings, Trajectory, TrajectorySettings,
};
use gripper_voxel::{DiscreteDistanceField, ForbiddenRule};
use nalgebra::Point3;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::dirty::{DirtyTags, Stage};
use crate::error::{SessionError, SessionResult};

/// Inputs of one gripper design plus every value derived from them.
///
/// Setters only record the change and mark the affected stages dirty.
/// Getters of derived values recompute whatever is dirty, upstream first,
/// and cache the result until the next relevant change.
///
/// The trajectory is both an input and a derived value. Its first keyframe
/// places the effector; the rest is initialized from the fingers. Once the
/// keyframes have been edited by hand they are only overwritten when
/// [`reinit_trajectory`](Self::reinit_trajectory) is set.
///
/// # Example
///
/// ```
/// use gripper_session::GripperSession;
/// use gripper_types::{ContactPoint, IndexedMesh, Point3, Pose, Vector3};
///
/// let mut session = GripperSession::default();
/// session
///     .set_mesh(IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0)))
///     .unwrap();
/// session.add_contact_point(ContactPoint::new(Point3::new(0.5, 0.5, 0.0), -Vector3::z()));
/// session.set_initial_pose(Pose::new([0.5, 0.5, 3.0, 0.0, 0.0, 0.0]));
///
/// assert_eq!(session.fingers().unwrap().len(), 1);
/// assert_eq!(session.trajectory().unwrap().len(), 4);
/// ```
#[derive(Debug)]
pub struct GripperSession<K = GantryWrist> {
    kinematics: K,
    settings: GripperSettings,
    mesh: Option<Arc<IndexedMesh>>,
    contacts: Vec<ContactPoint>,
    keyframes: Trajectory,
    reinit_trajectory: bool,
    keyframes_edited: bool,

    dirty: DirtyTags,
    query: Option<Arc<MeshQueryService>>,
    distance_field: Option<DiscreteDistanceField>,
    fingers: Vec<FingerPath>,
}

impl Default for GripperSession<GantryWrist> {
    fn default() -> Self {
        Self::new(GantryWrist::new())
    }
}

impl<K: Kinematics> GripperSession<K> {
    /// Empty session for a mechanism, with default settings and the zero
    /// pose as the only keyframe.
    #[must_use]
    pub fn new(kinematics: K) -> Self {
        Self {
            kinematics,
            settings: GripperSettings::default(),
            mesh: None,
            contacts: Vec::new(),
            keyframes: Trajectory::from_keyframes(vec![Pose::zeros()]),
            reinit_trajectory: true,
            keyframes_edited: false,
            dirty: DirtyTags::all(),
            query: None,
            distance_field: None,
            fingers: Vec::new(),
        }
    }

    /// Replace every setting.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Types`] if the settings do not validate.
    pub fn with_settings(mut self, settings: GripperSettings) -> SessionResult<Self> {
        settings.validate()?;
        self.settings = settings;
        self.dirty = DirtyTags::all();
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// The mechanism.
    #[must_use]
    pub const fn kinematics(&self) -> &K {
        &self.kinematics
    }

    /// Current settings.
    pub const fn settings(&self) -> &GripperSettings {
        &self.settings
    }

    /// The object mesh, if loaded.
    pub fn mesh(&self) -> Option<&Arc<IndexedMesh>> {
        self.mesh.as_ref()
    }

    /// Load the object mesh.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Types`] if the mesh is empty or malformed.
    pub fn set_mesh(&mut self, mesh: IndexedMesh) -> SessionResult<()> {
        mesh.validate()?;
        info!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "mesh loaded"
        );
        self.mesh = Some(Arc::new(mesh));
        self.query = None;
        self.invalidate(Stage::Query);
        Ok(())
    }

    /// Contact points in insertion order.
    pub fn contact_points(&self) -> &[ContactPoint] {
        &self.contacts
    }

    /// Append a contact point.
    pub fn add_contact_point(&mut self, contact: ContactPoint) {
        self.contacts.push(contact);
        self.invalidate(Stage::Fingers);
    }

    /// Remove and return a contact point.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ContactOutOfRange`] if `index` is past the end.
    pub fn remove_contact_point(&mut self, index: usize) -> SessionResult<ContactPoint> {
        if index >= self.contacts.len() {
            return Err(SessionError::ContactOutOfRange {
                index,
                len: self.contacts.len(),
            });
        }
        let removed = self.contacts.remove(index);
        self.invalidate(Stage::Fingers);
        Ok(removed)
    }

    /// Remove every contact point.
    pub fn clear_contact_points(&mut self) {
        self.contacts.clear();
        self.invalidate(Stage::Fingers);
    }

    /// Set finger initialization settings.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Types`] if the settings do not validate.
    pub fn set_finger_settings(&mut self, settings: FingerSettings) -> SessionResult<()> {
        settings.validate()?;
        self.settings.finger = settings;
        self.invalidate(Stage::Fingers);
        Ok(())
    }

    /// Set trajectory initialization settings.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Types`] if the settings do not validate.
    pub fn set_trajectory_settings(&mut self, settings: TrajectorySettings) -> SessionResult<()> {
        settings.validate()?;
        self.settings.trajectory = settings;
        self.invalidate(Stage::Trajectory);
        Ok(())
    }

    /// Set distance field settings.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Types`] if the settings do not validate.
    pub fn set_distance_field_settings(
        &mut self,
        settings: DistanceFieldSettings,
    ) -> SessionResult<()> {
        settings.validate()?;
        self.settings.distance_field = settings;
        self.invalidate(Stage::DistanceField);
        Ok(())
    }

    /// Set topology-optimization export settings.
    ///
    /// Export is computed on demand, so no cached stage is affected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Types`] if the settings do not validate.
    pub fn set_topo_opt_settings(&mut self, settings: TopoOptSettings) -> SessionResult<()> {
        settings.validate()?;
        self.settings.topo_opt = settings;
        Ok(())
    }

    /// Whether derived changes may overwrite hand-edited keyframes.
    pub const fn reinit_trajectory(&self) -> bool {
        self.reinit_trajectory
    }

    /// Allow or forbid derived changes to overwrite hand-edited keyframes.
    pub fn set_reinit_trajectory(&mut self, reinit: bool) {
        self.reinit_trajectory = reinit;
    }

    // ------------------------------------------------------------------
    // Keyframes
    // ------------------------------------------------------------------

    /// Replace the first keyframe, which places the effector.
    ///
    /// Inserts it if the trajectory is empty.
    pub fn set_initial_pose(&mut self, pose: Pose) {
        if self.keyframes.edit(0, pose).is_err() {
            self.keyframes.push(pose);
        }
        self.effector_moved();
    }

    /// Append a keyframe.
    pub fn add_keyframe(&mut self, pose: Pose) {
        self.keyframes.push(pose);
        self.keyframes_edited = true;
        if self.keyframes.len() == 1 {
            self.effector_moved();
        }
    }

    /// Replace a keyframe.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Types`] if `index` is past the end.
    pub fn edit_keyframe(&mut self, index: usize, pose: Pose) -> SessionResult<()> {
        self.keyframes.edit(index, pose)?;
        self.keyframes_edited = true;
        if index == 0 {
            self.effector_moved();
        }
        Ok(())
    }

    /// Remove and return a keyframe.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Types`] if `index` is past the end.
    pub fn remove_keyframe(&mut self, index: usize) -> SessionResult<Pose> {
        let removed = self.keyframes.remove(index)?;
        self.keyframes_edited = true;
        if index == 0 {
            self.effector_moved();
        }
        Ok(removed)
    }

    /// Remove every keyframe.
    pub fn clear_keyframes(&mut self) {
        self.keyframes.clear();
        self.keyframes_edited = true;
        self.effector_moved();
    }

    /// Keyframes as they are now, without recomputing anything.
    pub const fn keyframes(&self) -> &Trajectory {
        &self.keyframes
    }

    /// Effector position at the first keyframe.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyTrajectory`] if there are no keyframes.
    pub fn effector_position(&self) -> SessionResult<Point3<f64>> {
        let first = self.keyframes.first().ok_or(SessionError::EmptyTrajectory)?;
        Ok(self.kinematics.forward(first).translation.vector.into())
    }

    // ------------------------------------------------------------------
    // Derived values
    // ------------------------------------------------------------------

    /// Current dirty tags.
    pub const fn dirty(&self) -> DirtyTags {
        self.dirty
    }

    /// Check whether a stage will be recomputed on its next read.
    pub const fn is_dirty(&self, stage: Stage) -> bool {
        self.dirty.is_dirty(stage)
    }

    /// Mesh query service, building it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MeshNotLoaded`] without a mesh.
    pub fn query_service(&mut self) -> SessionResult<Arc<MeshQueryService>> {
        self.ensure(Stage::Query)?;
        self.query.clone().ok_or(SessionError::MeshNotLoaded)
    }

    /// Distance field around the object, seeded at the effector.
    ///
    /// # Errors
    ///
    /// Returns an error without a mesh or keyframes, or if the grid cannot
    /// be built.
    pub fn distance_field(&mut self) -> SessionResult<&DiscreteDistanceField> {
        self.ensure(Stage::DistanceField)?;
        self.distance_field.as_ref().ok_or(SessionError::MeshNotLoaded)
    }

    /// One finger per contact point, in contact order.
    ///
    /// # Errors
    ///
    /// Returns an error without a mesh or keyframes.
    pub fn fingers(&mut self) -> SessionResult<&[FingerPath]> {
        self.ensure(Stage::Fingers)?;
        Ok(&self.fingers)
    }

    /// The closing trajectory.
    ///
    /// # Errors
    ///
    /// Returns an error if the fingers cannot be computed.
    pub fn trajectory(&mut self) -> SessionResult<&Trajectory> {
        self.ensure(Stage::Trajectory)?;
        Ok(&self.keyframes)
    }

    /// Recompute every dirty stage.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub fn refresh(&mut self) -> SessionResult<()> {
        for stage in self.dirty.stages() {
            self.ensure(stage)?;
        }
        Ok(())
    }

    /// Boundary conditions for the topology optimizer.
    ///
    /// With a `negative_space` mesh (given in the gripper frame) everything
    /// outside it is forbidden. Without one, the object mesh is moved into
    /// the gripper frame and its inside is forbidden.
    ///
    /// # Errors
    ///
    /// Returns an error without contact points or keyframes, without a mesh
    /// when no negative space is given, or if the export fails.
    pub fn boundary_conditions(
        &mut self,
        negative_space: Option<&IndexedMesh>,
    ) -> SessionResult<BoundaryConditions> {
        if self.contacts.is_empty() {
            return Err(SessionError::NoContactPoints);
        }
        let first = self.keyframes.first().ok_or(SessionError::EmptyTrajectory)?;
        let frame = self.kinematics.forward(first);

        let (forbidden, rule) = if let Some(negative) = negative_space {
            (negative.clone(), ForbiddenRule::Outside)
        } else {
            let mesh = self.mesh.as_ref().ok_or(SessionError::MeshNotLoaded)?;
            (mesh.transformed(&frame.inverse()), ForbiddenRule::Inside)
        };
        let service = MeshQueryService::new(Arc::new(forbidden))?;

        Ok(BoundaryConditions::compute(
            &service,
            rule,
            &self.contacts,
            &frame,
            &self.settings.topo_opt,
        )?)
    }

    /// Write the topology optimization problem to `path`.
    ///
    /// # Errors
    ///
    /// See [`boundary_conditions`](Self::boundary_conditions); also fails if
    /// the file cannot be written.
    pub fn export_topology_config(
        &mut self,
        path: &Path,
        negative_space: Option<&IndexedMesh>,
    ) -> SessionResult<ToPyConfig> {
        let boundary = self.boundary_conditions(negative_space)?;
        Ok(export_topy_config(path, &boundary, &self.settings.topo_opt.solver)?)
    }

    // ------------------------------------------------------------------
    // Recompute
    // ------------------------------------------------------------------

    fn invalidate(&mut self, stage: Stage) {
        self.dirty.invalidate(stage);
    }

    fn effector_moved(&mut self) {
        self.invalidate(Stage::DistanceField);
        self.invalidate(Stage::Fingers);
    }

    fn ensure(&mut self, stage: Stage) -> SessionResult<()> {
        for &prerequisite in stage.prerequisites() {
            self.ensure(prerequisite)?;
        }
        if !self.dirty.is_dirty(stage) {
            return Ok(());
        }

        debug!(?stage, "recomputing");
        match stage {
            Stage::Query => self.compute_query()?,
            Stage::DistanceField => self.compute_distance_field()?,
            Stage::Fingers => self.compute_fingers()?,
            Stage::Trajectory => self.compute_trajectory()?,
        }
        self.dirty.mark_clean(stage);
        Ok(())
    }

    fn compute_query(&mut self) -> SessionResult<()> {
        let mesh = self.mesh.as_ref().ok_or(SessionError::MeshNotLoaded)?;
        self.query = Some(Arc::new(MeshQueryService::new(Arc::clone(mesh))?));
        Ok(())
    }

    fn compute_distance_field(&mut self) -> SessionResult<()> {
        let query = self.query.as_ref().ok_or(SessionError::MeshNotLoaded)?;
        let base = self.effector_position()?;
        let field = DiscreteDistanceField::build(
            query.mesh(),
            &**query,
            &self.settings.distance_field,
            &base,
        )?;
        self.distance_field = Some(field);
        Ok(())
    }

    fn compute_fingers(&mut self) -> SessionResult<()> {
        let query = self.query.as_ref().ok_or(SessionError::MeshNotLoaded)?;
        let effector = self.effector_position()?;

        let initializer = FingerInitializer::from_service(query, self.settings.finger)?;
        let tree = initializer.tree(&effector);
        let fingers: Vec<FingerPath> = self
            .contacts
            .par_iter()
            .map(|contact| initializer.initialize_with_tree(contact, &effector, &tree))
            .collect();

        info!(
            fingers = fingers.len(),
            joints = self.settings.finger.joint_count,
            "fingers initialized"
        );
        self.fingers = fingers;
        Ok(())
    }

    fn compute_trajectory(&mut self) -> SessionResult<()> {
        if self.keyframes_edited && !self.reinit_trajectory {
            debug!("keeping hand-edited keyframes");
            return Ok(());
        }

        let initial = *self.keyframes.first().ok_or(SessionError::EmptyTrajectory)?;
        let initializer = TrajectoryInitializer::new(&self.kinematics, self.settings.trajectory)?;
        self.keyframes = initializer.initialize(&self.fingers, &initial)?;
        self.keyframes_edited = false;
        Ok(())
    }
}
