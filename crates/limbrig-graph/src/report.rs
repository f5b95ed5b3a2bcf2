//! Build reports.
//!
//! A [`BuildReport`] summarises one generated limb: names of the nodes an
//! animator looks for, node counts by kind and the canonical hash of the
//! generated subtree.

use std::collections::BTreeMap;

use limbrig_spec::{Direction, HalfBonePosition, LimbType, Segment};
use serde::{Deserialize, Serialize};

use crate::error::{RigError, RigResult};
use crate::half_bone::HalfBone;
use crate::hash::manifest_hash;
use crate::host::{NodeId, SceneHost};
use crate::orchestrator::BendyLimb;
use crate::scene::SubtreeManifest;
use crate::sub_limb::SubLimb;

/// Report schema version.
pub const REPORT_VERSION: u32 = 1;

/// One segment of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment: Segment,
    pub direction: Direction,
    pub resting_length: f64,
    pub spacing: f64,
    pub joint_count: usize,
    /// Skin chain, root to tip.
    pub skin_joints: Vec<String>,
    pub curve: String,
    pub ik_handle: String,
    pub bend_control: String,
    /// Math nodes of the squash/stretch network.
    pub network_nodes: usize,
}

/// One half-bone of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfBoneSummary {
    pub position: HalfBonePosition,
    pub joint: String,
    pub skin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aim_locator: Option<String>,
}

/// Summary of a generated limb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Report schema version (always 1).
    pub report_version: u32,
    pub side: String,
    pub limb_type: LimbType,
    pub top_group: String,
    pub segments: Vec<SegmentSummary>,
    pub half_bones: Vec<HalfBoneSummary>,
    /// Generated node counts keyed by node type name.
    pub node_counts: BTreeMap<String, usize>,
    pub connection_count: usize,
    /// Informational message reported by the host.
    pub message: String,
    /// Hex-encoded BLAKE3 hash of the canonicalized subtree manifest.
    pub graph_hash: String,
}

fn name(host: &dyn SceneHost, node: NodeId) -> RigResult<String> {
    Ok(host.name(node)?.to_string())
}

fn segment_summary(host: &dyn SceneHost, sub: &SubLimb) -> RigResult<SegmentSummary> {
    Ok(SegmentSummary {
        segment: sub.segment,
        direction: sub.direction,
        resting_length: sub.resting_translation,
        spacing: sub.spacing,
        joint_count: sub.chain.interior.len(),
        skin_joints: sub
            .chain
            .joints()
            .into_iter()
            .map(|j| name(host, j))
            .collect::<RigResult<_>>()?,
        curve: name(host, sub.ik.curve)?,
        ik_handle: name(host, sub.ik.handle)?,
        bend_control: name(host, sub.bend.control)?,
        network_nodes: sub.squash.len(),
    })
}

fn half_bone_summary(host: &dyn SceneHost, hb: &HalfBone) -> RigResult<HalfBoneSummary> {
    Ok(HalfBoneSummary {
        position: hb.position,
        joint: name(host, hb.joint)?,
        skin: name(host, hb.skin)?,
        control: hb.control.map(|c| name(host, c)).transpose()?,
        aim_locator: hb.aim_locator.map(|l| name(host, l)).transpose()?,
    })
}

impl BuildReport {
    /// Builds the report of `limb` from the manifest of its top group.
    pub fn new(
        host: &dyn SceneHost,
        limb: &BendyLimb,
        manifest: &SubtreeManifest,
    ) -> RigResult<Self> {
        let graph_hash = manifest_hash(manifest).map_err(|e| RigError::Report(e.to_string()))?;
        let node_counts = manifest
            .counts()
            .into_iter()
            .map(|(kind, count)| (kind.type_name().to_string(), count))
            .collect();

        Ok(Self {
            report_version: REPORT_VERSION,
            side: limb.names.side().to_string(),
            limb_type: limb.params.limb_type,
            top_group: name(host, limb.top_group)?,
            segments: vec![
                segment_summary(host, &limb.upper)?,
                segment_summary(host, &limb.lower)?,
            ],
            half_bones: limb
                .half_bones
                .iter()
                .map(|hb| half_bone_summary(host, hb))
                .collect::<RigResult<_>>()?,
            node_counts,
            connection_count: manifest.connections.len(),
            message: limb.message.clone(),
            graph_hash,
        })
    }

    /// Total generated node count.
    pub fn node_total(&self) -> usize {
        self.node_counts.values().sum()
    }

    pub fn segment(&self, segment: Segment) -> Option<&SegmentSummary> {
        self.segments.iter().find(|s| s.segment == segment)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_pretty(&self) -> RigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RigError::Report(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::create_bendy_limb;
    use crate::scene::load_skeleton;
    use limbrig_spec::{JointDesc, LimbRequest, MasterScaleDesc, SkeletonDesc};
    use pretty_assertions::assert_eq;

    fn leg(side: &str, sign: f64) -> SkeletonDesc {
        let n = |joint: &str| format!("{side}_{joint}");
        SkeletonDesc {
            joints: vec![
                JointDesc::new(n("hip"), [9.0 * sign, 95.0, 0.0])
                    .with_rotate([180.0, 0.0, 0.0])
                    .with_stretch_ratio(1.0),
                JointDesc::new(n("knee"), [0.0, 45.0 * sign, 0.0]).with_parent(n("hip")),
                JointDesc::new(n("ankle"), [0.0, 42.0 * sign, 0.0]).with_parent(n("knee")),
            ],
            master_scale: Some(MasterScaleDesc {
                name: "main_CTRL".into(),
                scale: 1.0,
            }),
            selection: vec![n("hip"), n("knee"), n("ankle")],
        }
    }

    fn report(side: &str, sign: f64) -> BuildReport {
        let mut scene = load_skeleton(&leg(side, sign)).unwrap();
        let limb = create_bendy_limb(&mut scene, &LimbRequest::new("Leg", 3, 2, 2.0)).unwrap();
        let manifest = scene.subtree_manifest(limb.top_group).unwrap();
        BuildReport::new(&scene, &limb, &manifest).unwrap()
    }

    #[test]
    fn test_leg_report() {
        let report = report("R", 1.0);
        assert_eq!(report.side, "R");
        assert_eq!(report.limb_type, LimbType::Leg);
        assert_eq!(report.top_group, "R_Leg_IkSpline_limb_OFFSET");
        assert_eq!(report.message, "R_Leg_IkSpline_Limb created");

        let upper = report.segment(Segment::Upper).unwrap();
        assert_eq!(upper.skin_joints.len(), 5);
        assert_eq!(upper.skin_joints[0], "R_upperLeg_01_notSKIN");
        assert_eq!(upper.curve, "R_upperLeg_crv");
        assert_eq!(upper.network_nodes, 4 + 3 + 3 + 2);

        let names: Vec<&str> = report.half_bones.iter().map(|h| h.joint.as_str()).collect();
        assert_eq!(names, ["R_hip_HalfBone", "R_knee_HalfBone", "R_ankle_HalfBone"]);
        assert_eq!(report.half_bones[1].control.as_deref(), Some("R_knee_HalfBone_CTRL"));
        assert_eq!(report.node_counts["ikHandle"], 2);
        assert_eq!(report.node_counts["pointOnCurveInfo"], 4 + 3);
        assert_eq!(report.graph_hash.len(), 64);
    }

    #[test]
    fn test_mirrored_leg_counts_negations() {
        let report = report("R", -1.0);
        let lower = report.segment(Segment::Lower).unwrap();
        assert_eq!(lower.direction, Direction::Negative);
        assert_eq!(lower.network_nodes, 3 + 2 + 2 + 2 + 2);
        assert_eq!(report.node_counts["multDoubleLinear"], 3 + 2);
    }

    #[test]
    fn test_report_is_deterministic() {
        let a = report("L", 1.0);
        let b = report("L", 1.0);
        assert_eq!(a, b);
        assert_ne!(a.graph_hash, report("L", -1.0).graph_hash);
    }

    #[test]
    fn test_report_json() {
        let json = report("L", 1.0).to_json_pretty().unwrap();
        let parsed: BuildReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.report_version, REPORT_VERSION);
        assert!(json.contains("\"graph_hash\""));
    }
}
