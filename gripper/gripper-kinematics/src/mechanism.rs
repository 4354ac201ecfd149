//! The kinematics capability the synthesis pipeline consumes.

use gripper_types::{DOF, Isometry3, Pose};

use crate::angles::{nearest_turn, wrap_angle};

/// Forward and inverse kinematics of a manipulator carrying the gripper.
///
/// The pipeline only ever talks to the mechanism through this trait, so a
/// different arm is substituted by implementing it. Poses always have
/// [`DOF`] joints.
///
/// The provided methods treat every joint for which
/// [`is_revolute`](Self::is_revolute) returns `true` as an angle with
/// full-turn ambiguity and every other joint as a plain linear value.
pub trait Kinematics: Send + Sync {
    /// Name of the mechanism, for logging.
    fn name(&self) -> &str;

    /// Effector transform of a pose.
    fn forward(&self, pose: &Pose) -> Isometry3<f64>;

    /// Every pose whose effector transform is `target`.
    ///
    /// An empty list means the target is unreachable.
    fn inverse(&self, target: &Isometry3<f64>) -> Vec<Pose>;

    /// Check whether a joint is an angle.
    fn is_revolute(&self, joint: usize) -> bool {
        joint < DOF
    }

    /// Sum of squared per-joint differences, angles compared modulo a turn.
    fn angular_distance(&self, a: &Pose, b: &Pose) -> f64 {
        (0..DOF)
            .map(|j| {
                let d = b[j] - a[j];
                let d = if self.is_revolute(j) { wrap_angle(d) } else { d };
                d * d
            })
            .sum()
    }

    /// `candidate` with each angle shifted by whole turns toward `reference`.
    fn fix_angles(&self, reference: &Pose, candidate: &Pose) -> Pose {
        let mut fixed = *candidate;
        for j in 0..DOF {
            if self.is_revolute(j) {
                fixed[j] = nearest_turn(reference[j], candidate[j]);
            }
        }
        fixed
    }

    /// Inverse solution closest to `reference`, fixed up toward it.
    ///
    /// Ties keep the first solution returned by [`inverse`](Self::inverse).
    fn closest_inverse(&self, target: &Isometry3<f64>, reference: &Pose) -> Option<Pose> {
        let mut best: Option<(Pose, f64)> = None;
        for candidate in self.inverse(target) {
            let distance = self.angular_distance(reference, &candidate);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((candidate, distance));
            }
        }
        best.map(|(pose, _)| self.fix_angles(reference, &pose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gripper_types::Translation3;
    use std::f64::consts::{PI, TAU};

    /// Pure translation stage whose last joint is a free angle.
    struct Slider;

    impl Kinematics for Slider {
        fn name(&self) -> &str {
            "slider"
        }

        fn forward(&self, pose: &Pose) -> Isometry3<f64> {
            Translation3::new(pose[0], 0.0, 0.0).into()
        }

        fn inverse(&self, target: &Isometry3<f64>) -> Vec<Pose> {
            let x = target.translation.vector.x;
            vec![
                Pose::new([x, 0.0, 0.0, 0.0, 0.0, PI]),
                Pose::new([x, 0.0, 0.0, 0.0, 0.0, 0.0]),
            ]
        }

        fn is_revolute(&self, joint: usize) -> bool {
            joint == 5
        }
    }

    #[test]
    fn distance_wraps_only_angles() {
        let a = Pose::new([0.0, 0.0, 0.0, 0.0, 0.0, -3.0]);
        let b = Pose::new([2.0, 0.0, 0.0, 0.0, 0.0, 3.0]);
        let expected = 4.0 + (TAU - 6.0).powi(2);
        assert_relative_eq!(Slider.angular_distance(&a, &b), expected, epsilon = 1e-12);
    }

    #[test]
    fn fix_angles_leaves_linear_joints() {
        let reference = Pose::new([0.0, 0.0, 0.0, 0.0, 0.0, 3.0]);
        let candidate = Pose::new([7.0, 0.0, 0.0, 0.0, 0.0, -3.0]);
        let fixed = Slider.fix_angles(&reference, &candidate);
        assert_relative_eq!(fixed[0], 7.0);
        assert_relative_eq!(fixed[5], TAU - 3.0, epsilon = 1e-12);
    }

    #[test]
    fn closest_inverse_picks_smallest_distance() {
        let reference = Pose::new([0.0, 0.0, 0.0, 0.0, 0.0, 0.1]);
        let target = Slider.forward(&Pose::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        let pose = Slider.closest_inverse(&target, &reference);
        assert_eq!(pose, Some(Pose::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0])));
    }
}
