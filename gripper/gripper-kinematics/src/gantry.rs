//! Reference mechanism: a Cartesian gantry with a spherical wrist.

use std::f64::consts::PI;

use gripper_types::{DOF, Isometry3, Pose, Translation3, UnitQuaternion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::angles::{JointLimits, wrap_angle};
use crate::error::{KinematicsError, KinematicsResult};
use crate::mechanism::Kinematics;

/// Three prismatic axes followed by a yaw-pitch-roll wrist.
///
/// Joints are `[x, y, z, yaw, pitch, roll]`. The effector transform is
///
/// ```text
/// T = Translation(x, y, z) · Rz(yaw) · Ry(pitch) · Rx(roll)
/// ```
///
/// Every orientation has two Euler branches, so [`inverse`](Kinematics::inverse)
/// returns up to two poses. Optional per-joint limits drop branches that
/// cannot be reached.
///
/// # Example
///
/// ```
/// use gripper_kinematics::{GantryWrist, Kinematics};
/// use gripper_types::Pose;
///
/// let gantry = GantryWrist::new();
/// let pose = Pose::new([0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
/// let solutions = gantry.inverse(&gantry.forward(&pose));
///
/// assert_eq!(solutions.len(), 2);
/// assert!(gantry.angular_distance(&pose, &solutions[0]) < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GantryWrist {
    limits: [Option<JointLimits>; DOF],
}

impl GantryWrist {
    /// Index of the first wrist joint.
    pub const FIRST_REVOLUTE: usize = 3;

    /// Unlimited mechanism.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit one joint.
    ///
    /// # Errors
    ///
    /// Returns an error if `joint` is not a joint of the mechanism or a
    /// bound is not finite.
    pub fn with_limits(mut self, joint: usize, lower: f64, upper: f64) -> KinematicsResult<Self> {
        if joint >= DOF {
            return Err(KinematicsError::JointOutOfRange { joint, dof: DOF });
        }
        if !lower.is_finite() || !upper.is_finite() {
            return Err(KinematicsError::NonFiniteLimits { joint, lower, upper });
        }
        self.limits[joint] = Some(JointLimits::new(lower, upper));
        Ok(self)
    }

    /// Limits of a joint, if any.
    #[must_use]
    pub fn limits(&self, joint: usize) -> Option<&JointLimits> {
        self.limits.get(joint).and_then(Option::as_ref)
    }

    /// Bring a raw solution within the limits, or reject it.
    fn constrain(&self, mut pose: Pose) -> Option<Pose> {
        for j in 0..DOF {
            let Some(limits) = self.limits[j] else {
                continue;
            };
            if self.is_revolute(j) {
                pose[j] = limits.fit_angle(pose[j])?;
            } else if !limits.contains(pose[j]) {
                return None;
            }
        }
        Some(pose)
    }
}

impl Kinematics for GantryWrist {
    fn name(&self) -> &str {
        "gantry-wrist"
    }

    fn forward(&self, pose: &Pose) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::new(pose[0], pose[1], pose[2]),
            UnitQuaternion::from_euler_angles(pose[5], pose[4], pose[3]),
        )
    }

    fn inverse(&self, target: &Isometry3<f64>) -> Vec<Pose> {
        let t = target.translation.vector;
        let (roll, pitch, yaw) = target.rotation.euler_angles();

        let branches = [
            [t.x, t.y, t.z, yaw, pitch, roll],
            [
                t.x,
                t.y,
                t.z,
                wrap_angle(yaw + PI),
                wrap_angle(PI - pitch),
                wrap_angle(roll + PI),
            ],
        ];

        branches
            .into_iter()
            .filter_map(|joints| self.constrain(Pose::new(joints)))
            .collect()
    }

    fn is_revolute(&self, joint: usize) -> bool {
        (Self::FIRST_REVOLUTE..DOF).contains(&joint)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn both_branches_reproduce_the_target() {
        let gantry = GantryWrist::new();
        let pose = Pose::new([1.0, -2.0, 0.5, 2.5, -0.7, 1.2]);
        let target = gantry.forward(&pose);

        let solutions = gantry.inverse(&target);
        assert_eq!(solutions.len(), 2);
        for solution in &solutions {
            let reached = gantry.forward(solution);
            assert_relative_eq!(reached.translation.vector, target.translation.vector, epsilon = 1e-12);
            assert!(reached.rotation.angle_to(&target.rotation) < 1e-9);
        }
    }

    #[test]
    fn identity_inverse_is_zero_pose_first() {
        let gantry = GantryWrist::new();
        let solutions = gantry.inverse(&Isometry3::identity());
        assert_eq!(solutions[0], Pose::zeros());
        assert_eq!(
            gantry.closest_inverse(&Isometry3::identity(), &Pose::zeros()),
            Some(Pose::zeros())
        );
    }

    #[test]
    fn prismatic_joints_do_not_wrap() {
        let gantry = GantryWrist::new();
        let a = Pose::new([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let b = Pose::new([7.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_relative_eq!(gantry.angular_distance(&a, &b), 49.0);
    }

    #[test]
    fn limits_remove_unreachable_branches() {
        let gantry = GantryWrist::new().with_limits(4, -1.0, 1.0).unwrap();
        let target = gantry.forward(&Pose::new([0.0, 0.0, 0.0, 0.0, 0.3, 0.0]));
        // The other branch has pitch π - 0.3
        assert_eq!(gantry.inverse(&target).len(), 1);

        let out_of_reach = GantryWrist::new().with_limits(2, 0.0, 1.0).unwrap();
        let target = Isometry3::translation(0.0, 0.0, 2.0);
        assert!(out_of_reach.inverse(&target).is_empty());
    }

    #[test]
    fn limit_configuration_errors() {
        assert!(matches!(
            GantryWrist::new().with_limits(6, 0.0, 1.0),
            Err(KinematicsError::JointOutOfRange { joint: 6, .. })
        ));
        assert!(matches!(
            GantryWrist::new().with_limits(0, f64::NAN, 1.0),
            Err(KinematicsError::NonFiniteLimits { .. })
        ));
        let gantry = GantryWrist::new().with_limits(3, 1.0, -1.0).unwrap();
        assert_relative_eq!(gantry.limits(3).unwrap().lower(), -1.0);
    }
}
