//! End-to-end tests of the synthesis pipeline through the umbrella crate.
//!
//! - Fingers: over the anchor corner when visible, around the object otherwise
//! - Trajectory: retraction along the fingers, orientation kept
//! - Export: both forbidden-space sources, written to disk
//! - Sessions: deterministic and lazily invalidated

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

use std::f64::consts::FRAC_PI_2;

use approx::assert_relative_eq;
use gripper::prelude::*;
use gripper::topo::TOPY_HEADER;

fn unit_cube() -> IndexedMesh {
    IndexedMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
}

fn top() -> ContactPoint {
    ContactPoint::new(Point3::new(0.5, 0.5, 1.0), Vector3::z())
}

fn bottom() -> ContactPoint {
    ContactPoint::new(Point3::new(0.5, 0.5, 0.0), -Vector3::z())
}

fn session_with(contacts: &[ContactPoint], initial: Pose) -> GripperSession {
    let mut session = GripperSession::default();
    session.set_mesh(unit_cube()).unwrap();
    for contact in contacts {
        session.add_contact_point(*contact);
    }
    session.set_initial_pose(initial);
    session
}

fn above(z: f64) -> Pose {
    Pose::new([0.5, 0.5, z, 0.0, 0.0, 0.0])
}

// =============================================================================
// Fingers
// =============================================================================

mod fingers {
    use super::*;

    #[test]
    fn visible_contact_passes_its_anchor_corner() {
        let mut session = session_with(&[top()], above(3.0));
        let finger = session.fingers().unwrap()[0].clone();

        assert_eq!(finger.len(), 4);
        assert_eq!(finger.first(), Some(&top().position));
        assert_eq!(finger.last(), Some(&Point3::new(0.5, 0.5, 3.0)));

        // Lifted top corner, then the midpoint of the leg up to the effector
        let corner = finger.joints()[1];
        assert!((corner.x - 0.5).abs() > 0.45);
        assert!((corner.y - 0.5).abs() > 0.45);
        assert!(corner.z > 1.0 && corner.z < 1.05);
        assert!(finger.length() > 2.0);
    }

    #[test]
    fn hidden_contact_wraps_around_a_corner() {
        let mut session = session_with(&[bottom()], above(3.0));
        let finger = session.fingers().unwrap()[0].clone();

        assert_eq!(finger.first(), Some(&bottom().position));
        assert_eq!(finger.last(), Some(&Point3::new(0.5, 0.5, 3.0)));

        // Leaves the bottom face at one of its corners, just off the surface
        let corner = finger.joints()[1];
        assert!((corner.x - 0.5).abs() > 0.45);
        assert!((corner.y - 0.5).abs() > 0.45);
        assert!(corner.z < 0.05);
        assert!(finger.length() > 3.0);
    }

    #[test]
    fn joint_count_is_configurable() {
        let mut session = session_with(&[top(), bottom()], above(3.0));
        session
            .set_finger_settings(gripper::types::FingerSettings::default().with_joint_count(7))
            .unwrap();

        for finger in session.fingers().unwrap() {
            assert_eq!(finger.len(), 7);
        }
    }
}

// =============================================================================
// Trajectory
// =============================================================================

mod trajectory {
    use super::*;

    #[test]
    fn retracts_by_the_finger_length() {
        let mut session = session_with(&[top()], above(2.0));
        let trajectory = session.trajectory().unwrap().clone();

        assert_eq!(trajectory.len(), 4);
        assert_eq!(trajectory.first(), Some(&above(2.0)));
        let last = trajectory.last().unwrap();
        assert_relative_eq!(last[2], 3.0, epsilon = 1e-9);
        assert_relative_eq!(last[0], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn orientation_is_kept_while_retracting() {
        let initial = Pose::new([0.5, 0.5, 2.0, FRAC_PI_2, 0.0, 0.0]);
        let mut session = session_with(&[top()], initial);

        for pose in session.trajectory().unwrap().iter() {
            assert_relative_eq!(pose[3], FRAC_PI_2, epsilon = 1e-9);
            assert_relative_eq!(pose[4], 0.0, epsilon = 1e-9);
            assert_relative_eq!(pose[5], 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn keyframe_count_follows_settings() {
        let mut session = session_with(&[top()], above(2.0));
        session
            .set_trajectory_settings(
                gripper::types::TrajectorySettings::default()
                    .with_keyframe_count(6)
                    .with_subdivisions(2),
            )
            .unwrap();

        let trajectory = session.trajectory().unwrap();
        assert_eq!(trajectory.len(), 6);
        assert_eq!(trajectory.first(), Some(&above(2.0)));
        assert_relative_eq!(trajectory.last().unwrap()[2], 3.0, epsilon = 1e-9);
        for pair in trajectory.keyframes().windows(2) {
            assert!(pair[1][2] > pair[0][2]);
        }
        // The finger detours through a top corner, and so does the gripper
        assert!(trajectory.iter().any(|pose| (pose[0] - 0.5).abs() > 0.1));
    }
}

// =============================================================================
// Export
// =============================================================================

mod export {
    use super::*;
    use gripper::types::TopoOptSettings;

    fn settings() -> TopoOptSettings {
        TopoOptSettings::default()
            .with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
            .with_resolution(0.5)
            .with_attachment_size(1.0)
    }

    #[test]
    fn negative_space_forbids_its_outside() {
        let mut session = session_with(&[ContactPoint::new(Point3::origin(), Vector3::x())], Pose::zeros());
        session.set_topo_opt_settings(settings()).unwrap();

        let negative = IndexedMesh::cuboid(Point3::new(-0.6, -0.6, -0.6), Point3::new(0.6, 0.6, 0.6));
        let boundary = session.boundary_conditions(Some(&negative)).unwrap();

        assert_eq!(boundary.size(), [4, 4, 4]);
        assert_eq!(boundary.forbidden_voxels().len(), 64 - 8);
        assert_eq!(boundary.contact_voxels().len(), 1);
        assert_relative_eq!(boundary.loads()[0], -Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn object_is_moved_into_the_gripper_frame() {
        let mut session = session_with(&[top()], above(1.0));
        session.set_topo_opt_settings(settings()).unwrap();

        let boundary = session.boundary_conditions(None).unwrap();
        // The cube sits below the effector: the lower half of the central
        // columns is solid, the upper half is free
        for v in boundary.forbidden_voxels() {
            assert!(v.z < 2, "{v:?} is above the effector");
        }
        assert_eq!(boundary.forbidden_voxels().len(), 8);
        assert_eq!(boundary.contact_voxels()[0].z, 2);
    }

    #[test]
    fn written_file_matches_returned_config() {
        let mut session = session_with(&[top(), bottom()], above(3.0));
        session.set_topo_opt_settings(settings()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gripper.tpd");
        let config = session.export_topology_config(&path, None).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, config.render());
        assert!(text.starts_with(TOPY_HEADER));
        assert_eq!(config.get("PROB_NAME"), Some("gripper"));
        assert_eq!(config.get("LOAD_VALU_Z"), Some("-1.000000;1.000000"));
    }
}

// =============================================================================
// Sessions
// =============================================================================

mod sessions {
    use super::*;

    #[test]
    fn identical_inputs_give_identical_results() {
        let contacts = [top(), bottom(), ContactPoint::new(Point3::new(1.0, 0.5, 0.5), Vector3::x())];
        let mut a = session_with(&contacts, above(3.0));
        let mut b = session_with(&contacts, above(3.0));

        assert_eq!(a.fingers().unwrap(), b.fingers().unwrap());
        assert_eq!(a.trajectory().unwrap(), b.trajectory().unwrap());
    }

    #[test]
    fn only_stale_stages_are_recomputed() {
        let mut session = session_with(&[top()], above(3.0));
        session.refresh().unwrap();
        assert!(session.dirty().is_clean());

        session.add_contact_point(bottom());
        assert!(!session.is_dirty(Stage::Query));
        assert!(!session.is_dirty(Stage::DistanceField));
        assert!(session.is_dirty(Stage::Fingers));

        session.set_mesh(unit_cube()).unwrap();
        for stage in [Stage::Query, Stage::DistanceField, Stage::Fingers, Stage::Trajectory] {
            assert!(session.is_dirty(stage));
        }

        session.refresh().unwrap();
        assert_eq!(session.fingers().unwrap().len(), 2);
    }

    #[test]
    fn missing_inputs_are_reported() {
        let mut session = GripperSession::default();
        assert!(matches!(session.trajectory(), Err(SessionError::MeshNotLoaded)));
        assert!(matches!(
            session.boundary_conditions(None),
            Err(SessionError::NoContactPoints)
        ));
    }
}
