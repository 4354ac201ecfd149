//! Finger joint curves.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered joint positions of one finger.
///
/// The first joint sits on the contact point and the last one on the
/// effector anchor. Created once per contact point by the initializer.
///
/// # Example
///
/// ```
/// use gripper_types::{FingerPath, Point3};
///
/// let finger = FingerPath::from_points(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
///     Point3::new(0.0, 1.0, 1.0),
/// ]);
///
/// assert_eq!(finger.len(), 3);
/// assert!((finger.length() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FingerPath {
    joints: Vec<Point3<f64>>,
}

impl FingerPath {
    /// Wrap a list of joint positions.
    #[must_use]
    pub const fn from_points(joints: Vec<Point3<f64>>) -> Self {
        Self { joints }
    }

    /// Joint positions, contact first.
    #[must_use]
    pub fn joints(&self) -> &[Point3<f64>] {
        &self.joints
    }

    /// Number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Check whether the path has no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joint on the contact point.
    #[must_use]
    pub fn first(&self) -> Option<&Point3<f64>> {
        self.joints.first()
    }

    /// Joint on the effector anchor.
    #[must_use]
    pub fn last(&self) -> Option<&Point3<f64>> {
        self.joints.last()
    }

    /// Total polyline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.joints.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Consume and return the joint list.
    #[must_use]
    pub fn into_points(self) -> Vec<Point3<f64>> {
        self.joints
    }
}

impl From<Vec<Point3<f64>>> for FingerPath {
    fn from(joints: Vec<Point3<f64>>) -> Self {
        Self::from_points(joints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path() {
        let finger = FingerPath::default();
        assert!(finger.is_empty());
        assert!(finger.first().is_none());
        assert!(finger.length().abs() < f64::EPSILON);
    }

    #[test]
    fn endpoints() {
        let finger: FingerPath = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)].into();
        assert_eq!(finger.first(), Some(&Point3::origin()));
        assert_eq!(finger.last(), Some(&Point3::new(1.0, 0.0, 0.0)));
    }
}
