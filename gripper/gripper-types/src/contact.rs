//! Contact points on the object surface.

use nalgebra::{Isometry3, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A chosen surface location where a finger presses against the object.
///
/// Produced by an external contact-selection process and consumed read-only
/// by the synthesis pipeline. The normal points away from the object.
///
/// # Example
///
/// ```
/// use gripper_types::{ContactPoint, Isometry3, Point3, Vector3};
///
/// let contact = ContactPoint::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0));
/// assert_eq!(contact.normal, Vector3::x());
///
/// let moved = contact.transformed(&Isometry3::translation(0.0, 0.0, 1.0));
/// assert_eq!(moved.position, Point3::new(1.0, 0.0, 1.0));
/// assert_eq!(moved.normal, Vector3::x());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactPoint {
    /// Position on the surface.
    pub position: Point3<f64>,
    /// Outward unit normal.
    pub normal: Vector3<f64>,
}

impl ContactPoint {
    /// Create a contact point, normalizing the normal.
    ///
    /// A zero normal is kept as zero.
    #[must_use]
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            normal: normal.try_normalize(0.0).unwrap_or(normal),
        }
    }

    /// Apply a rigid transform to position and normal.
    #[must_use]
    pub fn transformed(&self, iso: &Isometry3<f64>) -> Self {
        Self {
            position: iso * self.position,
            normal: iso.rotation * self.normal,
        }
    }

    /// Direction a finger pushes in: the inward normal.
    #[must_use]
    pub fn load_direction(&self) -> Vector3<f64> {
        -self.normal
    }
}
