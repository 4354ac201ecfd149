//! Arc-length reparameterization of polylines.

use nalgebra::{Point3, Vector3};

/// Running arc length at each vertex, starting at zero.
#[must_use]
pub fn cumulative_lengths(points: &[Point3<f64>]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    if !points.is_empty() {
        cumulative.push(0.0);
    }
    for pair in points.windows(2) {
        total += (pair[1] - pair[0]).norm();
        cumulative.push(total);
    }
    cumulative
}

/// Resample a polyline into `steps` segments of equal arc length.
///
/// Returns `steps + 1` points: the first and last input points exactly,
/// with evenly spaced points along the curve between them. A polyline of
/// zero length yields `steps + 1` copies of its first point. An empty
/// input yields an empty output.
///
/// # Example
///
/// ```
/// use gripper_trajectory::length_parameterize;
/// use gripper_types::Point3;
///
/// let l_shape = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 3.0, 0.0),
/// ];
/// let even = length_parameterize(&l_shape, 4);
///
/// assert_eq!(even.len(), 5);
/// assert!((even[1] - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
/// assert!((even[2] - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn length_parameterize(points: &[Point3<f64>], steps: usize) -> Vec<Point3<f64>> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };

    let cumulative = cumulative_lengths(points);
    let total = cumulative.last().copied().unwrap_or(0.0);
    if steps == 0 {
        return vec![first];
    }
    if total <= f64::EPSILON {
        return vec![first; steps + 1];
    }

    let step = total / steps as f64;
    let mut out = Vec::with_capacity(steps + 1);
    out.push(first);

    let mut segment = 0;
    for i in 1..steps {
        let arc = i as f64 * step;
        while segment + 2 < cumulative.len() && cumulative[segment + 1] < arc {
            segment += 1;
        }
        let start = cumulative[segment];
        let length = cumulative[segment + 1] - start;
        let t = if length > 1e-12 {
            ((arc - start) / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(points[segment] + (points[segment + 1] - points[segment]) * t);
    }

    out.push(last);
    out
}

/// Vector from each point to the next.
#[must_use]
pub fn step_displacements(points: &[Point3<f64>]) -> Vec<Vector3<f64>> {
    points.windows(2).map(|pair| pair[1] - pair[0]).collect()
}
