//! Line-of-sight tests against the object.

use gripper_query::MeshQuery;
use gripper_types::IndexedMesh;
use nalgebra::{Point3, Vector3};

/// Check whether the straight segment `a`–`b` stays in free space.
///
/// Both ends are first pulled toward each other by the distance `epsilon`
/// so that endpoints lying on the surface do not count as hits. The segment is clear when neither pulled end is inside the solid
/// and the pulled segment does not touch the surface.
pub fn segment_is_clear<Q>(query: &Q, a: &Point3<f64>, b: &Point3<f64>, epsilon: f64) -> bool
where
    Q: MeshQuery + ?Sized,
{
    let shrink = (b - a).try_normalize(0.0).unwrap_or_else(Vector3::zeros) * epsilon;
    let start = a + shrink;
    let end = b - shrink;

    if query.signed_distance(&start).distance < 0.0 || query.signed_distance(&end).distance < 0.0 {
        return false;
    }
    !query.intersect_segment(&start, &(end - start))
}

/// Vertices the effector can see, with their straight-line distance.
///
/// Each effector-to-vertex segment is shortened by the distance `epsilon`
/// so the target vertex itself is not reported as a blocker.
pub fn visible_vertices<Q>(
    query: &Q,
    mesh: &IndexedMesh,
    effector: &Point3<f64>,
    epsilon: f64,
) -> Vec<(u32, f64)>
where
    Q: MeshQuery + ?Sized,
{
    mesh.vertices
        .iter()
        .enumerate()
        .filter_map(|(i, v)| {
            let d = v - effector;
            let shrink = d.try_normalize(0.0).unwrap_or_else(Vector3::zeros) * epsilon;
            let blocked = query.intersect_segment(effector, &(d - shrink));
            (!blocked).then(|| (i as u32, d.norm()))
        })
        .collect()
}

/// Distance from `p` to the infinite line through `a` and `b`.
///
/// Falls back to `|p - a|` when `a` and `b` coincide.
///
/// # Example
///
/// ```
/// use gripper_geodesic::point_to_line_distance;
/// use gripper_types::Point3;
///
/// let d = point_to_line_distance(
///     &Point3::new(5.0, 2.0, 0.0),
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(1.0, 0.0, 0.0),
/// );
/// assert!((d - 2.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn point_to_line_distance(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let ab = b - a;
    let len = ab.norm();
    if len <= f64::EPSILON {
        return (p - a).norm();
    }
    (p - a).cross(&ab).norm() / len
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gripper_query::MeshQueryService;
    use std::sync::Arc;

    fn cube_service() -> MeshQueryService {
        let cube = IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        MeshQueryService::new(Arc::new(cube)).unwrap()
    }

    #[test]
    fn surface_to_surface_across_a_face_is_clear() {
        let service = cube_service();
        // Both ends on the top face, segment runs along it just outside
        let a = Point3::new(0.2, 0.2, 1.0 + 1e-4);
        let b = Point3::new(0.8, 0.8, 1.0 + 1e-4);
        assert!(segment_is_clear(&service, &a, &b, 1e-6));
    }

    #[test]
    fn segment_through_solid_is_blocked() {
        let service = cube_service();
        let a = Point3::new(0.5, 0.5, 0.0);
        let b = Point3::new(0.5, 0.5, 1.0);
        // Ends on the surface, pulled ends land inside
        assert!(!segment_is_clear(&service, &a, &b, 1e-6));

        let a = Point3::new(-1.0, 0.5, 0.5);
        let b = Point3::new(2.0, 0.5, 0.5);
        assert!(!segment_is_clear(&service, &a, &b, 1e-6));
    }

    #[test]
    fn long_segment_keeps_its_end_inside() {
        let service = cube_service();
        // Only the last 1e-7 of a 3e7 long segment is trimmed
        let a = Point3::new(0.5, 0.5, 3e7);
        let b = Point3::new(0.5, 0.5, 0.0);
        assert!(!segment_is_clear(&service, &a, &b, 1e-7));
    }

    #[test]
    fn distant_effector_does_not_see_through_the_object() {
        let service = cube_service();
        let effector = Point3::new(2.5e6, 5e6, 1e7);
        let visible = visible_vertices(&service, service.mesh(), &effector, 1e-6);

        let ids: Vec<u32> = visible.iter().map(|&(v, _)| v).collect();
        // The line to the origin corner crosses the top face at (0.25, 0.5, 1)
        assert!(!ids.contains(&0));
        assert!(ids.contains(&7));
    }

    #[test]
    fn effector_above_sees_top_corners() {
        let service = cube_service();
        let effector = Point3::new(0.5, 0.5, 3.0);
        let visible = visible_vertices(&service, service.mesh(), &effector, 1e-7);

        let mut ids: Vec<u32> = visible.iter().map(|&(v, _)| v).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![4, 5, 6, 7]);
        for (_, d) in visible {
            assert_relative_eq!(d, 4.5f64.sqrt(), epsilon = 1e-12);
        }
    }

    #[test]
    fn line_distance_degenerate() {
        let a = Point3::new(1.0, 1.0, 1.0);
        assert_relative_eq!(point_to_line_distance(&Point3::new(1.0, 1.0, 3.0), &a, &a), 2.0);
    }
}
