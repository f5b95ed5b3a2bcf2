//! Test fixtures: skeleton descriptions and one-call builds.

use std::fs;
use std::path::{Path, PathBuf};

use limbrig_graph::{create_bendy_limb, load_skeleton, BendyLimb, RigResult, SceneGraph};
use limbrig_spec::{JointDesc, LimbRequest, MasterScaleDesc, SkeletonDesc};
use tempfile::TempDir;

/// Name of the master scale control in every fixture.
pub const MASTER: &str = "main_CTRL";

fn master(scale: f64) -> Option<MasterScaleDesc> {
    Some(MasterScaleDesc {
        name: MASTER.to_string(),
        scale,
    })
}

/// An arm with a clavicle above the shoulder.
///
/// Joint lengths are the local Y translations of the elbow and wrist; a
/// negative `sign` mirrors both.
pub fn arm_skeleton(side: &str, upper: f64, lower: f64, sign: f64) -> SkeletonDesc {
    let n = |joint: &str| format!("{side}_{joint}");
    SkeletonDesc {
        joints: vec![
            JointDesc::new(n("clavicle"), [2.0 * sign, 140.0, 0.0]),
            JointDesc::new(n("shoulder"), [3.0 * sign, 0.0, 0.0])
                .with_parent(n("clavicle"))
                .with_rotate([0.0, 0.0, -90.0])
                .with_stretch_ratio(1.0),
            JointDesc::new(n("elbow"), [0.0, upper * sign, 0.0]).with_parent(n("shoulder")),
            JointDesc::new(n("wrist"), [0.0, lower * sign, 0.0]).with_parent(n("elbow")),
        ],
        master_scale: master(1.0),
        selection: vec![n("shoulder"), n("elbow"), n("wrist")],
    }
}

/// A leg pointing down from the hip, without a parent above the hip.
pub fn leg_skeleton(side: &str, sign: f64) -> SkeletonDesc {
    let n = |joint: &str| format!("{side}_{joint}");
    SkeletonDesc {
        joints: vec![
            JointDesc::new(n("hip"), [9.0 * sign, 95.0, 0.0])
                .with_rotate([180.0, 0.0, 0.0])
                .with_stretch_ratio(1.0),
            JointDesc::new(n("knee"), [0.0, 45.0 * sign, 0.0]).with_parent(n("hip")),
            JointDesc::new(n("ankle"), [0.0, 42.0 * sign, 0.0]).with_parent(n("knee")),
        ],
        master_scale: master(1.0),
        selection: vec![n("hip"), n("knee"), n("ankle")],
    }
}

/// The arm scenario used across the suite: upper length 12, lower length 10.
pub fn scenario_arm() -> SkeletonDesc {
    SkeletonDesc {
        joints: vec![
            JointDesc::new("L_shoulder", [5.0, 140.0, 0.0]).with_stretch_ratio(1.0),
            JointDesc::new("L_elbow", [0.0, 12.0, 0.0]).with_parent("L_shoulder"),
            JointDesc::new("L_wrist", [0.0, 10.0, 0.0]).with_parent("L_elbow"),
        ],
        master_scale: master(1.0),
        selection: vec!["L_shoulder".into(), "L_elbow".into(), "L_wrist".into()],
    }
}

/// The request matching [`scenario_arm`].
pub fn scenario_request() -> LimbRequest {
    LimbRequest::new("Arm", 4, 3, 1.5)
}

/// Loads `desc` into a fresh scene and builds a limb with the default config.
pub fn build_limb(desc: &SkeletonDesc, request: &LimbRequest) -> RigResult<(SceneGraph, BendyLimb)> {
    let mut scene = load_skeleton(desc)?;
    let limb = create_bendy_limb(&mut scene, request)?;
    Ok((scene, limb))
}

/// A skeleton description written to a temporary directory.
pub struct SkeletonFile {
    pub root: TempDir,
    pub path: PathBuf,
}

impl SkeletonFile {
    /// Writes `desc` as `skeleton.json` in a new temporary directory.
    pub fn new(desc: &SkeletonDesc) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let path = root.path().join("skeleton.json");
        let json = desc.to_json_pretty().expect("Failed to serialize skeleton");
        fs::write(&path, json).expect("Failed to write skeleton file");
        Self { root, path }
    }

    /// Writes an extra file next to the skeleton and returns its path.
    pub fn add_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn dir(&self) -> &Path {
        self.root.path()
    }

    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_load() {
        for desc in [
            arm_skeleton("L", 12.0, 10.0, 1.0),
            leg_skeleton("R", -1.0),
            scenario_arm(),
        ] {
            assert!(load_skeleton(&desc).is_ok());
        }
    }

    #[test]
    fn test_skeleton_file_round_trip() {
        let file = SkeletonFile::new(&scenario_arm());
        let json = fs::read_to_string(&file.path).unwrap();
        assert_eq!(SkeletonDesc::from_json(&json).unwrap(), scenario_arm());
    }
}
