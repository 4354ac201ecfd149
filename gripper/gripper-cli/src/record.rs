//! JSON design record.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use gripper::prelude::*;
use serde::{Deserialize, Serialize};

/// Record format version this build reads and writes.
pub const RECORD_VERSION: u32 = 1;

/// Everything needed to synthesize one gripper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignRecord {
    /// Format version, must equal [`RECORD_VERSION`].
    pub version: u32,
    /// Object to grasp, in world coordinates.
    pub mesh: IndexedMesh,
    /// Contact points on the object surface.
    #[serde(default)]
    pub contact_points: Vec<ContactPoint>,
    /// First keyframe of the trajectory.
    #[serde(default)]
    pub initial_pose: Pose,
    /// Solid the gripper must stay inside, in the gripper frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_space: Option<IndexedMesh>,
    /// Pipeline settings; missing sections take their defaults.
    #[serde(default)]
    pub settings: GripperSettings,
}

impl DesignRecord {
    /// Read and check a record file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid design record {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let record: Self = serde_json::from_str(text).context("Failed to parse JSON")?;
        if record.version != RECORD_VERSION {
            bail!(
                "Unsupported record version {} (expected {RECORD_VERSION})",
                record.version
            );
        }
        Ok(record)
    }

    /// A session loaded with the record's inputs.
    pub fn session(&self) -> Result<GripperSession> {
        let mut session = GripperSession::default()
            .with_settings(self.settings.clone())
            .context("Invalid settings")?;
        session.set_mesh(self.mesh.clone()).context("Invalid mesh")?;
        for contact in &self.contact_points {
            session.add_contact_point(*contact);
        }
        session.set_initial_pose(self.initial_pose);
        Ok(session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use gripper::types::TrajectorySettings;

    const CUBE: &str = r#"{
        "version": 1,
        "mesh": {
            "vertices": [
                [0, 0, 0], [1, 0, 0], [0, 1, 0], [1, 1, 0],
                [0, 0, 1], [1, 0, 1], [0, 1, 1], [1, 1, 1]
            ],
            "faces": [
                [0, 2, 3], [0, 3, 1], [4, 5, 7], [4, 7, 6],
                [0, 1, 5], [0, 5, 4], [2, 6, 7], [2, 7, 3],
                [0, 4, 6], [0, 6, 2], [1, 3, 7], [1, 7, 5]
            ]
        },
        "contact_points": [
            { "position": [0.5, 0.5, 1.0], "normal": [0.0, 0.0, 1.0] }
        ],
        "initial_pose": [0.5, 0.5, 2.0, 0.0, 0.0, 0.0],
        "settings": { "finger": { "joint_count": 5 } }
    }"#;

    #[test]
    fn parses_a_minimal_record() {
        let record = DesignRecord::from_json(CUBE).unwrap();
        assert_eq!(record.mesh.face_count(), 12);
        assert_eq!(record.contact_points.len(), 1);
        assert!(record.negative_space.is_none());
        assert_eq!(record.settings.finger.joint_count, 5);
        assert_eq!(record.settings.trajectory, TrajectorySettings::default());
    }

    #[test]
    fn session_uses_record_settings() {
        let mut session = DesignRecord::from_json(CUBE).unwrap().session().unwrap();
        assert_eq!(session.fingers().unwrap()[0].len(), 5);
        assert_eq!(session.effector_position().unwrap(), Point3::new(0.5, 0.5, 2.0));
    }

    #[test]
    fn rejects_other_versions() {
        let text = CUBE.replacen("\"version\": 1", "\"version\": 2", 1);
        let err = DesignRecord::from_json(&text).unwrap_err();
        assert!(err.to_string().contains("version 2"));
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = DesignRecord::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
