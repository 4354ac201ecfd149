//! Joint-space poses and trajectories.

use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

/// Number of joints of the manipulator mechanism.
pub const DOF: usize = 6;

/// Joint values of the manipulator, one per degree of freedom.
///
/// # Example
///
/// ```
/// use gripper_types::{Pose, DOF};
///
/// let mut pose = Pose::zeros();
/// pose[2] = 1.5;
/// assert_eq!(pose.joints().len(), DOF);
/// assert_eq!(pose[2], 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose(pub [f64; DOF]);

impl Pose {
    /// Create a pose from joint values.
    #[must_use]
    pub const fn new(joints: [f64; DOF]) -> Self {
        Self(joints)
    }

    /// All joints at zero.
    #[must_use]
    pub const fn zeros() -> Self {
        Self([0.0; DOF])
    }

    /// Joint values as a slice.
    #[must_use]
    pub const fn joints(&self) -> &[f64; DOF] {
        &self.0
    }

    /// Iterate over joint values.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }
}

impl Index<usize> for Pose {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Pose {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl From<[f64; DOF]> for Pose {
    fn from(joints: [f64; DOF]) -> Self {
        Self(joints)
    }
}

/// Ordered keyframes of the closing motion.
///
/// The first keyframe is the caller-provided initial pose.
///
/// # Example
///
/// ```
/// use gripper_types::{Pose, Trajectory};
///
/// let mut trajectory = Trajectory::new();
/// trajectory.push(Pose::zeros());
/// trajectory.push(Pose::new([0.1; 6]));
///
/// assert_eq!(trajectory.len(), 2);
/// assert_eq!(trajectory.first(), Some(&Pose::zeros()));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trajectory {
    keyframes: Vec<Pose>,
}

impl Trajectory {
    /// Create an empty trajectory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keyframes: Vec::new(),
        }
    }

    /// Create an empty trajectory with room for `capacity` keyframes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keyframes: Vec::with_capacity(capacity),
        }
    }

    /// Wrap a list of keyframes.
    #[must_use]
    pub const fn from_keyframes(keyframes: Vec<Pose>) -> Self {
        Self { keyframes }
    }

    /// Keyframes in order.
    #[must_use]
    pub fn keyframes(&self) -> &[Pose] {
        &self.keyframes
    }

    /// Number of keyframes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Check whether the trajectory has no keyframes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// First keyframe.
    #[must_use]
    pub fn first(&self) -> Option<&Pose> {
        self.keyframes.first()
    }

    /// Last keyframe.
    #[must_use]
    pub fn last(&self) -> Option<&Pose> {
        self.keyframes.last()
    }

    /// Iterate over keyframes.
    pub fn iter(&self) -> impl Iterator<Item = &Pose> {
        self.keyframes.iter()
    }

    /// Append a keyframe.
    pub fn push(&mut self, pose: Pose) {
        self.keyframes.push(pose);
    }

    /// Replace the keyframe at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::KeyframeOutOfRange`] if `index` is past the end.
    pub fn edit(&mut self, index: usize, pose: Pose) -> TypesResult<()> {
        let len = self.keyframes.len();
        let slot = self
            .keyframes
            .get_mut(index)
            .ok_or(TypesError::KeyframeOutOfRange { index, len })?;
        *slot = pose;
        Ok(())
    }

    /// Remove and return the keyframe at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::KeyframeOutOfRange`] if `index` is past the end.
    pub fn remove(&mut self, index: usize) -> TypesResult<Pose> {
        if index >= self.keyframes.len() {
            return Err(TypesError::KeyframeOutOfRange {
                index,
                len: self.keyframes.len(),
            });
        }
        Ok(self.keyframes.remove(index))
    }

    /// Remove every keyframe.
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }
}

impl FromIterator<Pose> for Trajectory {
    fn from_iter<I: IntoIterator<Item = Pose>>(iter: I) -> Self {
        Self {
            keyframes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_and_remove() {
        let mut trajectory: Trajectory = [Pose::zeros(), Pose::new([1.0; DOF])].into_iter().collect();

        trajectory.edit(1, Pose::new([2.0; DOF])).ok();
        assert_eq!(trajectory.last(), Some(&Pose::new([2.0; DOF])));

        let removed = trajectory.remove(0).ok();
        assert_eq!(removed, Some(Pose::zeros()));
        assert_eq!(trajectory.len(), 1);
    }

    #[test]
    fn out_of_range_edits_fail() {
        let mut trajectory = Trajectory::new();
        assert!(matches!(
            trajectory.edit(0, Pose::zeros()),
            Err(TypesError::KeyframeOutOfRange { index: 0, len: 0 })
        ));
        assert!(trajectory.remove(3).is_err());
    }
}
