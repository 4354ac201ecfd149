//! Point and ray primitives against a single triangle.

use nalgebra::{Point3, Vector3};

/// Parallel-ray rejection threshold for [`ray_triangle_intersect`].
const PARALLEL_EPSILON: f64 = 1e-12;

/// Closest point on triangle `[a, b, c]` to `p`.
///
/// Voronoi-region walk from "Real-Time Collision Detection" (Ericson).
///
/// # Example
///
/// ```
/// use gripper_query::closest_point_on_triangle;
/// use gripper_types::Point3;
///
/// let tri = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let q = closest_point_on_triangle(&Point3::new(0.25, 0.25, 2.0), &tri);
/// assert_eq!(q, Point3::new(0.25, 0.25, 0.0));
/// ```
#[must_use]
pub fn closest_point_on_triangle(p: &Point3<f64>, tri: &[Point3<f64>; 3]) -> Point3<f64> {
    let [a, b, c] = *tri;
    let ab = b - a;
    let ac = c - a;

    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && d4 >= d3 && d5 >= d6 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    // Interior of the face
    let denom = 1.0 / (va + vb + vc);
    a + ab * (vb * denom) + ac * (vc * denom)
}

/// Two-sided Möller–Trumbore ray/triangle test.
///
/// Returns the ray parameter `t` of the hit, measured in units of `dir`'s
/// length, when the hit lies strictly in front of the origin. Rays parallel
/// to the triangle plane never hit.
#[must_use]
pub fn ray_triangle_intersect(
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    tri: &[Point3<f64>; 3],
) -> Option<f64> {
    let [a, b, c] = *tri;
    let e1 = b - a;
    let e2 = c - a;

    let h = dir.cross(&e2);
    let det = e1.dot(&h);
    if det.abs() < PARALLEL_EPSILON * e1.norm() * e2.norm() * dir.norm() {
        return None;
    }

    let inv = 1.0 / det;
    let s = origin - a;
    let u = inv * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = inv * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv * e2.dot(&q);
    (t > 0.0).then_some(t)
}

/// Squared distance from `p` to segment `[a, b]`.
#[must_use]
pub fn point_segment_distance_squared(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let ab = b - a;
    let t = ((p - a).dot(&ab) / ab.norm_squared().max(f64::EPSILON)).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm_squared()
}

/// Signed solid angle subtended by triangle `[a, b, c]` at `p`.
///
/// Positive when `p` is behind the triangle (opposite its CCW normal).
/// Van Oosterom–Strackee formula.
#[must_use]
pub fn solid_angle(p: &Point3<f64>, tri: &[Point3<f64>; 3]) -> f64 {
    let a = tri[0] - p;
    let b = tri[1] - p;
    let c = tri[2] - p;
    let (la, lb, lc) = (a.norm(), b.norm(), c.norm());

    let numerator = a.dot(&b.cross(&c));
    let denominator = la * lb * lc + a.dot(&b) * lc + a.dot(&c) * lb + b.dot(&c) * la;
    2.0 * numerator.atan2(denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn tri() -> [Point3<f64>; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(5.0, 10.0, 0.0),
        ]
    }

    #[test]
    fn closest_point_regions() {
        let t = tri();
        assert_eq!(closest_point_on_triangle(&Point3::new(-5.0, -5.0, 0.0), &t), t[0]);
        assert_eq!(closest_point_on_triangle(&Point3::new(15.0, -1.0, 0.0), &t), t[1]);

        let edge = closest_point_on_triangle(&Point3::new(5.0, -3.0, 1.0), &t);
        assert_relative_eq!(edge, Point3::new(5.0, 0.0, 0.0), epsilon = 1e-12);

        let face = closest_point_on_triangle(&Point3::new(5.0, 3.0, 4.0), &t);
        assert_relative_eq!(face, Point3::new(5.0, 3.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn ray_hits_from_both_sides() {
        let t = tri();
        let down = ray_triangle_intersect(&Point3::new(5.0, 3.0, 2.0), &-Vector3::z(), &t);
        assert_relative_eq!(down.unwrap_or(f64::NAN), 2.0, epsilon = 1e-12);

        let up = ray_triangle_intersect(&Point3::new(5.0, 3.0, -4.0), &(Vector3::z() * 2.0), &t);
        assert_relative_eq!(up.unwrap_or(f64::NAN), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn ray_misses() {
        let t = tri();
        // Pointing away
        assert!(ray_triangle_intersect(&Point3::new(5.0, 3.0, 2.0), &Vector3::z(), &t).is_none());
        // Outside the triangle
        assert!(ray_triangle_intersect(&Point3::new(20.0, 3.0, 2.0), &-Vector3::z(), &t).is_none());
        // Parallel
        assert!(ray_triangle_intersect(&Point3::new(5.0, 3.0, 0.0), &Vector3::x(), &t).is_none());
    }

    #[test]
    fn segment_distance() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        assert_relative_eq!(point_segment_distance_squared(&Point3::new(1.0, 3.0, 0.0), &a, &b), 9.0);
        assert_relative_eq!(point_segment_distance_squared(&Point3::new(4.0, 0.0, 0.0), &a, &b), 4.0);
    }

    #[test]
    fn solid_angle_of_large_triangle_below() {
        // A point just above a huge triangle sees almost a hemisphere
        let big = [
            Point3::new(-1e4, -1e4, 0.0),
            Point3::new(1e4, -1e4, 0.0),
            Point3::new(0.0, 1e4, 0.0),
        ];
        let below = solid_angle(&Point3::new(0.0, 0.0, -1e-3), &big);
        let above = solid_angle(&Point3::new(0.0, 0.0, 1e-3), &big);
        assert_relative_eq!(below, 2.0 * PI, epsilon = 1e-3);
        assert_relative_eq!(above, -2.0 * PI, epsilon = 1e-3);
    }
}
