//! Tunable parameters of the synthesis pipeline.
//!
//! Every stage has its own settings struct with sensible defaults and
//! `with_*` builder methods. [`GripperSettings`] aggregates them.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

/// Finger path initialization parameters.
///
/// # Example
///
/// ```
/// use gripper_types::FingerSettings;
///
/// let settings = FingerSettings::default().with_joint_count(5);
/// assert_eq!(settings.joint_count, 5);
/// assert!((settings.clearance - 0.01).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FingerSettings {
    /// Number of joints in each finger, contact and effector included.
    pub joint_count: usize,

    /// Outward offset applied to interior joints so they do not touch the surface.
    pub clearance: f64,

    /// Amount both ends of a segment are pulled inward before a visibility test.
    pub visibility_epsilon: f64,

    /// Amount an effector-to-vertex segment is shortened when seeding.
    pub seed_epsilon: f64,
}

impl Default for FingerSettings {
    fn default() -> Self {
        Self {
            joint_count: 4,
            clearance: 0.01,
            visibility_epsilon: 1e-6,
            seed_epsilon: 1e-7,
        }
    }
}

impl FingerSettings {
    /// Set the joint count.
    #[must_use]
    pub const fn with_joint_count(mut self, joint_count: usize) -> Self {
        self.joint_count = joint_count;
        self
    }

    /// Set the surface clearance.
    #[must_use]
    pub const fn with_clearance(mut self, clearance: f64) -> Self {
        self.clearance = clearance;
        self
    }

    /// Check the settings.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidSettings`] if fewer than two joints are
    /// requested or an epsilon is negative.
    pub fn validate(&self) -> TypesResult<()> {
        if self.joint_count < 2 {
            return Err(TypesError::InvalidSettings(format!(
                "joint_count must be >= 2, got {}",
                self.joint_count
            )));
        }
        if self.clearance.is_nan() || self.clearance < 0.0 {
            return Err(TypesError::InvalidSettings(
                "clearance must be non-negative".to_string(),
            ));
        }
        if [self.visibility_epsilon, self.seed_epsilon]
            .iter()
            .any(|e| e.is_nan() || *e < 0.0)
        {
            return Err(TypesError::InvalidSettings(
                "epsilons must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trajectory initialization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrajectorySettings {
    /// Number of keyframes, initial pose included.
    pub keyframe_count: usize,

    /// Arc-length steps per keyframe interval.
    pub subdivisions: usize,
}

impl Default for TrajectorySettings {
    fn default() -> Self {
        Self {
            keyframe_count: 4,
            subdivisions: 4,
        }
    }
}

impl TrajectorySettings {
    /// Set the keyframe count.
    #[must_use]
    pub const fn with_keyframe_count(mut self, keyframe_count: usize) -> Self {
        self.keyframe_count = keyframe_count;
        self
    }

    /// Set the subdivisions per keyframe interval.
    #[must_use]
    pub const fn with_subdivisions(mut self, subdivisions: usize) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    /// Total number of arc-length steps each finger is resampled into.
    #[must_use]
    pub const fn step_count(&self) -> usize {
        self.keyframe_count.saturating_sub(1) * self.subdivisions
    }

    /// Check the settings.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidSettings`] if either count is zero.
    pub fn validate(&self) -> TypesResult<()> {
        if self.keyframe_count == 0 {
            return Err(TypesError::InvalidSettings(
                "keyframe_count must be >= 1".to_string(),
            ));
        }
        if self.subdivisions == 0 {
            return Err(TypesError::InvalidSettings(
                "subdivisions must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Distance field parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DistanceFieldSettings {
    /// Number of voxels along the shortest side of the mesh bounding box.
    pub units: usize,
}

impl Default for DistanceFieldSettings {
    fn default() -> Self {
        Self { units: 30 }
    }
}

impl DistanceFieldSettings {
    /// Set the voxel count along the shortest side.
    #[must_use]
    pub const fn with_units(mut self, units: usize) -> Self {
        self.units = units;
        self
    }

    /// Check the settings.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidSettings`] if `units` is zero.
    pub fn validate(&self) -> TypesResult<()> {
        if self.units == 0 {
            return Err(TypesError::InvalidSettings("units must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// Solver section of the topology-optimization config.
///
/// Values are written verbatim to the `ToPy` problem definition file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ToPySolverParams {
    /// `PROB_TYPE`.
    pub problem_type: String,
    /// `ETA`.
    pub eta: f64,
    /// `DOF_PN`, degrees of freedom per node.
    pub dof_per_node: u32,
    /// `VOL_FRAC`.
    pub volume_fraction: f64,
    /// `FILT_RAD`.
    pub filter_radius: f64,
    /// `P_FAC`, penalty factor.
    pub penalty: f64,
    /// `ELEM_K`, element stiffness type.
    pub element_type: String,
    /// `NUM_ITER`.
    pub iterations: u32,
}

impl Default for ToPySolverParams {
    fn default() -> Self {
        Self {
            problem_type: "comp".to_string(),
            eta: 0.4,
            dof_per_node: 3,
            volume_fraction: 0.01,
            filter_radius: 1.5,
            penalty: 3.0,
            element_type: "H8".to_string(),
            iterations: 50,
        }
    }
}

/// Topology-optimization export parameters.
///
/// Bounds are expressed in the frame of the first trajectory keyframe.
///
/// # Example
///
/// ```
/// use gripper_types::{Point3, TopoOptSettings};
///
/// let settings = TopoOptSettings::default()
///     .with_bounds(Point3::new(-0.1, -0.1, 0.0), Point3::new(0.1, 0.1, 0.2))
///     .with_resolution(0.005);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TopoOptSettings {
    /// Lower corner of the design domain.
    pub lower_bound: Point3<f64>,
    /// Upper corner of the design domain.
    pub upper_bound: Point3<f64>,
    /// Element edge length.
    pub resolution: f64,
    /// Diameter of the attachment disk on the base plane.
    pub attachment_size: f64,
    /// Solver parameters.
    pub solver: ToPySolverParams,
}

impl Default for TopoOptSettings {
    fn default() -> Self {
        Self {
            lower_bound: Point3::new(-0.2, -0.05, 0.0),
            upper_bound: Point3::new(0.05, 0.05, 0.2),
            resolution: 0.005,
            attachment_size: 0.04,
            solver: ToPySolverParams::default(),
        }
    }
}

impl TopoOptSettings {
    /// Set the design domain bounds.
    #[must_use]
    pub fn with_bounds(mut self, lower: Point3<f64>, upper: Point3<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Set the element edge length.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the attachment disk diameter.
    #[must_use]
    pub const fn with_attachment_size(mut self, attachment_size: f64) -> Self {
        self.attachment_size = attachment_size;
        self
    }

    /// Set the solver parameters.
    #[must_use]
    pub fn with_solver(mut self, solver: ToPySolverParams) -> Self {
        self.solver = solver;
        self
    }

    /// Check the settings.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidSettings`] if the resolution or
    /// attachment size is not positive, or the bounds are not ordered.
    pub fn validate(&self) -> TypesResult<()> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(TypesError::InvalidSettings(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        if !self.attachment_size.is_finite() || self.attachment_size <= 0.0 {
            return Err(TypesError::InvalidSettings(
                "attachment_size must be positive".to_string(),
            ));
        }
        let ordered = (0..3).all(|i| self.lower_bound[i] < self.upper_bound[i]);
        if !ordered {
            return Err(TypesError::InvalidSettings(
                "lower_bound must be below upper_bound on every axis".to_string(),
            ));
        }
        Ok(())
    }
}

/// Every tunable of the pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GripperSettings {
    /// Finger initialization.
    pub finger: FingerSettings,
    /// Trajectory initialization.
    pub trajectory: TrajectorySettings,
    /// Distance field.
    pub distance_field: DistanceFieldSettings,
    /// Topology-optimization export.
    pub topo_opt: TopoOptSettings,
}

impl GripperSettings {
    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`TypesError::InvalidSettings`] found.
    pub fn validate(&self) -> TypesResult<()> {
        self.finger.validate()?;
        self.trajectory.validate()?;
        self.distance_field.validate()?;
        self.topo_opt.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GripperSettings::default().validate().is_ok());
        assert_eq!(TrajectorySettings::default().step_count(), 12);
    }

    #[test]
    fn rejects_single_joint() {
        let settings = FingerSettings::default().with_joint_count(1);
        assert!(matches!(
            settings.validate(),
            Err(TypesError::InvalidSettings(_))
        ));
    }

    #[test]
    fn rejects_bad_topo_opt() {
        let zero_res = TopoOptSettings::default().with_resolution(0.0);
        assert!(zero_res.validate().is_err());

        let nan_res = TopoOptSettings::default().with_resolution(f64::NAN);
        assert!(nan_res.validate().is_err());

        let flipped = TopoOptSettings::default()
            .with_bounds(Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0));
        assert!(flipped.validate().is_err());
    }

    #[test]
    fn rejects_zero_counts() {
        assert!(TrajectorySettings::default().with_subdivisions(0).validate().is_err());
        assert!(TrajectorySettings::default().with_keyframe_count(0).validate().is_err());
        assert!(DistanceFieldSettings::default().with_units(0).validate().is_err());
    }

    #[test]
    fn solver_defaults() {
        let solver = ToPySolverParams::default();
        assert_eq!(solver.problem_type, "comp");
        assert_eq!(solver.element_type, "H8");
        assert_eq!(solver.iterations, 50);
    }
}
