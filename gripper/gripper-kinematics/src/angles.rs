//! Angle wraparound and joint limits.

use std::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wrap an angle into `(-π, π]`.
///
/// # Example
///
/// ```
/// use gripper_kinematics::wrap_angle;
/// use std::f64::consts::PI;
///
/// assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
/// assert!((wrap_angle(-0.5 * PI) + 0.5 * PI).abs() < 1e-12);
/// ```
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Shift `angle` by a whole number of turns so it lies closest to `reference`.
#[must_use]
pub fn nearest_turn(reference: f64, angle: f64) -> f64 {
    angle + TAU * ((reference - angle) / TAU).round()
}

/// Position limits of one joint.
///
/// Bounds are inclusive. Reversed bounds are swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointLimits {
    lower: f64,
    upper: f64,
}

impl JointLimits {
    /// Create limits from two bounds in either order.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        Self { lower, upper }
    }

    /// Limits `[-bound, bound]`.
    #[must_use]
    pub fn symmetric(bound: f64) -> Self {
        Self::new(-bound.abs(), bound.abs())
    }

    /// Lower bound.
    #[must_use]
    pub const fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    #[must_use]
    pub const fn upper(&self) -> f64 {
        self.upper
    }

    /// Check whether a value is within the limits.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Smallest equivalent of `angle` (modulo a full turn) within the limits.
    #[must_use]
    pub fn fit_angle(&self, angle: f64) -> Option<f64> {
        let turns = ((self.lower - angle) / TAU).ceil();
        let fitted = angle + TAU * turns;
        self.contains(fitted).then_some(fitted)
    }
}
