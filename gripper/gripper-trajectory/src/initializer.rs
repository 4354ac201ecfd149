//! Closing trajectory from finger paths.

use gripper_kinematics::Kinematics;
use gripper_types::{FingerPath, Pose, Trajectory, TrajectorySettings};
use nalgebra::{Translation3, Vector3};
use tracing::{debug, warn};

use crate::arclength::{length_parameterize, step_displacements};
use crate::error::{TrajectoryError, TrajectoryResult};

/// Initializes the closing trajectory of a gripper.
///
/// The trajectory approximates the gripper retracting along its own
/// fingers: each finger is split into equal arc-length steps, the steps are
/// averaged over all fingers, and the effector is translated by the running
/// sum of the averaged steps at every keyframe. Joint values come from the
/// inverse kinematics solution nearest to the previous keyframe.
///
/// # Example
///
/// ```
/// use gripper_kinematics::GantryWrist;
/// use gripper_trajectory::TrajectoryInitializer;
/// use gripper_types::{FingerPath, Point3, Pose, TrajectorySettings};
///
/// let gantry = GantryWrist::new();
/// let initializer = TrajectoryInitializer::new(&gantry, TrajectorySettings::default()).unwrap();
///
/// let finger = FingerPath::from_points(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.3)]);
/// let trajectory = initializer.initialize(&[finger], &Pose::zeros()).unwrap();
///
/// assert_eq!(trajectory.len(), 4);
/// assert!((trajectory.last().unwrap()[2] - 0.3).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct TrajectoryInitializer<'a, K: ?Sized> {
    kinematics: &'a K,
    settings: TrajectorySettings,
}

impl<'a, K> TrajectoryInitializer<'a, K>
where
    K: Kinematics + ?Sized,
{
    /// Create an initializer for a mechanism.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::InvalidSettings`] if the settings do not
    /// validate.
    pub fn new(kinematics: &'a K, settings: TrajectorySettings) -> TrajectoryResult<Self> {
        settings.validate()?;
        Ok(Self {
            kinematics,
            settings,
        })
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &TrajectorySettings {
        &self.settings
    }

    /// Per-step displacement averaged over all fingers.
    ///
    /// Has [`TrajectorySettings::step_count`] entries. Empty when there are
    /// no fingers.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::EmptyFinger`] if a finger has no points.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_steps(&self, fingers: &[FingerPath]) -> TrajectoryResult<Vec<Vector3<f64>>> {
        if fingers.is_empty() {
            return Ok(Vec::new());
        }

        let steps = self.settings.step_count();
        let mut sum = vec![Vector3::zeros(); steps];
        for (index, finger) in fingers.iter().enumerate() {
            if finger.is_empty() {
                return Err(TrajectoryError::EmptyFinger { index });
            }
            let even = length_parameterize(finger.joints(), steps);
            for (total, step) in sum.iter_mut().zip(step_displacements(&even)) {
                *total += step;
            }
        }

        let count = fingers.len() as f64;
        Ok(sum.into_iter().map(|s| s / count).collect())
    }

    /// Translation of the effector at each keyframe relative to the first.
    ///
    /// Keyframe `k` moves by the sum of the first `k · subdivisions`
    /// averaged steps, so the first entry is always zero.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::EmptyFinger`] if a finger has no points.
    pub fn keyframe_translations(
        &self,
        fingers: &[FingerPath],
    ) -> TrajectoryResult<Vec<Vector3<f64>>> {
        let steps = self.average_steps(fingers)?;
        let mut translations = Vec::with_capacity(self.settings.keyframe_count);
        let mut current = Vector3::zeros();
        translations.push(current);

        if steps.is_empty() {
            return Ok(translations);
        }
        for chunk in steps.chunks(self.settings.subdivisions) {
            current += chunk.iter().sum::<Vector3<f64>>();
            translations.push(current);
        }
        Ok(translations)
    }

    /// Build the trajectory starting at `initial`.
    ///
    /// Keyframes whose target has no inverse kinematics solution are
    /// dropped, so the result may hold fewer than
    /// [`TrajectorySettings::keyframe_count`] poses. Fewer than two
    /// keyframes or no fingers yield just the initial pose.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::EmptyFinger`] if a finger has no points.
    pub fn initialize(&self, fingers: &[FingerPath], initial: &Pose) -> TrajectoryResult<Trajectory> {
        let mut trajectory = Trajectory::with_capacity(self.settings.keyframe_count);
        trajectory.push(*initial);
        if self.settings.keyframe_count < 2 || fingers.is_empty() {
            return Ok(trajectory);
        }

        let start = self.kinematics.forward(initial);
        let mut previous = *initial;
        let mut skipped = 0usize;

        for (k, translation) in self.keyframe_translations(fingers)?.iter().enumerate().skip(1) {
            let target = Translation3::from(*translation) * start;
            match self.kinematics.closest_inverse(&target, &previous) {
                Some(pose) => {
                    trajectory.push(pose);
                    previous = pose;
                }
                None => {
                    skipped += 1;
                    debug!(keyframe = k, "no inverse kinematics solution, keyframe dropped");
                }
            }
        }

        if skipped > 0 {
            warn!(
                mechanism = self.kinematics.name(),
                skipped,
                kept = trajectory.len(),
                "trajectory is shorter than requested"
            );
        }
        debug!(keyframes = trajectory.len(), "trajectory initialized");

        Ok(trajectory)
    }
}
