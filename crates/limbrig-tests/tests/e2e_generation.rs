//! End-to-end generation tests.
//!
//! Builds the reference arm (shoulder -> elbow 12 -> wrist 10, 4/3 joints)
//! and checks the produced subtree as an animator would see it.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p limbrig-tests --test e2e_generation
//! ```

use pretty_assertions::assert_eq;

use limbrig_graph::{Attr, Axis, BuildReport, HalfBone, NodeId, SceneGraph, SceneHost, SubLimb, Value};
use limbrig_spec::{Direction, HalfBonePosition, LimbRequest, Segment, SkeletonDesc};
use limbrig_tests::fixtures::{arm_skeleton, build_limb, leg_skeleton, scenario_arm, scenario_request};
use limbrig_tests::verify_determinism;

const EPS: f64 = 1e-5;

fn close3(a: [f64; 3], b: [f64; 3]) -> bool {
    a.iter().zip(&b).all(|(x, y)| (x - y).abs() < EPS)
}

fn names(scene: &SceneGraph, sub: &SubLimb) -> Vec<String> {
    sub.chain
        .joints()
        .into_iter()
        .map(|j| scene.name(j).unwrap().to_string())
        .collect()
}

fn float(scene: &SceneGraph, node: NodeId, attr: Attr) -> f64 {
    scene.get_attr(node.plug(attr)).unwrap().as_f64().unwrap()
}

// ============================================================================
// Reference arm
// ============================================================================

#[test]
fn test_scenario_arm_layout() {
    let (scene, limb) = build_limb(&scenario_arm(), &scenario_request()).unwrap();

    assert_eq!(limb.message, "L_Arm_IkSpline_Limb created");
    assert_eq!(scene.messages(), ["L_Arm_IkSpline_Limb created".to_string()]);

    let top = scene.find("L_Arm_IkSpline_limb_OFFSET").unwrap();
    assert_eq!(top, limb.top_group);
    let children: Vec<String> = scene
        .children(top)
        .unwrap()
        .into_iter()
        .map(|c| scene.name(c).unwrap().to_string())
        .collect();
    assert_eq!(
        children,
        [
            "L_upperArm_system",
            "L_lowerArm_system",
            "L_shoulder_HalfBone_OFFSET",
            "L_elbow_HalfBone_OFFSET",
            "L_wrist_HalfBone_OFFSET",
            "L_Arm_do_not_touch",
        ]
    );

    assert_eq!(
        names(&scene, &limb.upper),
        [
            "L_upperArm_01_notSKIN",
            "L_upperArm_02_SKIN",
            "L_upperArm_03_SKIN",
            "L_upperArm_04_SKIN",
            "L_upperArm_05_SKIN",
            "L_upperArm_tip_notSKIN",
        ]
    );
    assert_eq!(limb.lower.chain.len(), 5);
    assert!((limb.upper.spacing - 3.0).abs() < EPS);
    assert!((limb.lower.spacing - 10.0 / 3.0).abs() < EPS);
}

#[test]
fn test_scenario_arm_chain_spans_segment() {
    let (scene, limb) = build_limb(&scenario_arm(), &scenario_request()).unwrap();
    let manifest = scene.subtree_manifest(limb.top_group).unwrap();

    for (sub, length) in [(&limb.upper, 12.0), (&limb.lower, 10.0)] {
        let joints = sub.chain.joints();
        let stored: f64 = joints[1..]
            .iter()
            .map(|&j| {
                let name = scene.name(j).unwrap();
                manifest.node(name).unwrap().transform.unwrap()[0][1]
            })
            .sum();
        assert!((stored - length).abs() < EPS, "{stored} != {length}");

        let tip = scene.world_position(sub.chain.tip).unwrap();
        let control = scene.world_position(sub.tip_control.node).unwrap();
        assert!(close3(tip, control));
    }
}

#[test]
fn test_scenario_arm_rest_values_match_network() {
    let (scene, limb) = build_limb(&scenario_arm(), &scenario_request()).unwrap();
    let manifest = scene.subtree_manifest(limb.top_group).unwrap();

    for sub in [&limb.upper, &limb.lower] {
        for span in 0..sub.chain.interior.len() {
            let target = sub.chain.span_target(span);
            let entry = manifest.node(scene.name(target).unwrap()).unwrap();
            let stored = entry.transform.unwrap()[0][1];
            let live = float(&scene, target, Attr::Translate(Axis::Y));
            assert!((stored - live).abs() < EPS, "span {span}: {stored} vs {live}");
        }
        for &joint in &sub.chain.interior {
            assert!((float(&scene, joint, Attr::Scale(Axis::X)) - 1.0).abs() < EPS);
            assert!((float(&scene, joint, Attr::Scale(Axis::Z)) - 1.0).abs() < EPS);
        }
    }
}

#[test]
fn test_scenario_arm_mid_continuity() {
    let (scene, limb) = build_limb(&scenario_arm(), &scenario_request()).unwrap();
    let elbow = scene.world_position(limb.record.fk_mid).unwrap();
    assert!(close3(elbow, [5.0, 152.0, 0.0]));

    let mid: &HalfBone = limb.half_bone(HalfBonePosition::Mid);
    let control = mid.control.unwrap();
    assert_eq!(scene.parent(limb.upper.tip_control.group).unwrap(), Some(control));
    assert_eq!(scene.parent(limb.lower.root_control.group).unwrap(), Some(control));

    for node in [
        mid.joint,
        mid.skin,
        limb.upper.tip_control.node,
        limb.lower.root_control.node,
        limb.upper.chain.tip,
        limb.lower.chain.root,
    ] {
        assert!(close3(scene.world_position(node).unwrap(), elbow));
    }
}

#[test]
fn test_scenario_arm_live_stretch() {
    let (mut scene, limb) = build_limb(&scenario_arm(), &scenario_request()).unwrap();
    let condition = scene.find("L_shoulder_stretch_condition").unwrap();
    scene
        .set_attr(condition.plug(Attr::OutColorR), Value::Float(1.44))
        .unwrap();

    for sub in [&limb.upper, &limb.lower] {
        for &joint in &sub.chain.interior {
            let sx = float(&scene, joint, Attr::Scale(Axis::X));
            assert!((sx - 1.0 / 1.2).abs() < EPS);
        }
    }

    let master = scene.find("main_CTRL").unwrap();
    scene
        .set_attr(master.plug(Attr::Scale(Axis::Y)), Value::Float(2.0))
        .unwrap();
    let target = limb.upper.chain.span_target(0);
    assert!((float(&scene, target, Attr::Translate(Axis::Y)) - 1.5).abs() < EPS);
}

#[test]
fn test_scenario_arm_is_deterministic() {
    let result = verify_determinism(
        || {
            let (scene, limb) = build_limb(&scenario_arm(), &scenario_request()).unwrap();
            scene
                .subtree_manifest(limb.top_group)
                .unwrap()
                .to_json_pretty()
                .unwrap()
        },
        3,
    );
    result.assert_deterministic();

    let report = |desc: SkeletonDesc| {
        let (scene, limb) = build_limb(&desc, &scenario_request()).unwrap();
        let manifest = scene.subtree_manifest(limb.top_group).unwrap();
        BuildReport::new(&scene, &limb, &manifest).unwrap()
    };
    assert_eq!(
        report(scenario_arm()).graph_hash,
        report(scenario_arm()).graph_hash
    );
}

// ============================================================================
// Other limbs
// ============================================================================

#[test]
fn test_arm_with_clavicle_blends_parent() {
    let (scene, limb) =
        build_limb(&arm_skeleton("R", 14.0, 11.0, 1.0), &LimbRequest::new("Arm", 2, 2, 1.0))
            .unwrap();
    let root = limb.half_bone(HalfBonePosition::Root);
    let constraint = scene.find("R_shoulder_HalfBone_oriCstr").unwrap();
    let (targets, driven) = scene.constraint_targets(constraint).unwrap().unwrap();
    assert_eq!(targets, vec![scene.find("R_clavicle").unwrap(), limb.record.fk_root]);
    assert_eq!(driven, root.joint);
}

#[test]
fn test_leg_without_parent() {
    let (scene, limb) = build_limb(&leg_skeleton("L", 1.0), &LimbRequest::new("Leg", 5, 5, 2.0))
        .unwrap();
    assert_eq!(limb.message, "L_Leg_IkSpline_Limb created");
    assert_eq!(scene.name(limb.upper.system).unwrap(), "L_upperLeg_system");
    assert_eq!(scene.name(limb.half_bones[1].joint).unwrap(), "L_knee_HalfBone");

    let constraint = scene.find("L_hip_HalfBone_oriCstr").unwrap();
    let (targets, _) = scene.constraint_targets(constraint).unwrap().unwrap();
    assert_eq!(targets, vec![limb.record.fk_root]);
}

#[test]
fn test_mirrored_leg() {
    let (scene, limb) = build_limb(&leg_skeleton("R", -1.0), &LimbRequest::new("Leg", 3, 2, 2.0))
        .unwrap();

    for sub in [&limb.upper, &limb.lower] {
        assert_eq!(sub.direction, Direction::Negative);
        assert!(sub.spacing < 0.0);
        assert_eq!(sub.squash.negations.len(), sub.chain.interior.len());
        for span in 0..sub.chain.interior.len() {
            let ty = float(&scene, sub.chain.span_target(span), Attr::Translate(Axis::Y));
            assert!((ty - sub.spacing).abs() < EPS);
        }
    }

    let manifest = scene.subtree_manifest(limb.top_group).unwrap();
    let report = BuildReport::new(&scene, &limb, &manifest).unwrap();
    assert_eq!(report.segment(Segment::Lower).unwrap().direction, Direction::Negative);
}

#[test]
fn test_mirrored_leg_under_master_scale() {
    let (mut scene, limb) =
        build_limb(&leg_skeleton("R", -1.0), &LimbRequest::new("Leg", 3, 2, 2.0)).unwrap();
    let master = scene.find("main_CTRL").unwrap();

    for scale in [0.5, 2.0, 7.0] {
        scene
            .set_attr(master.plug(Attr::Scale(Axis::Y)), Value::Float(scale))
            .unwrap();
        for sub in [&limb.upper, &limb.lower] {
            for span in 0..sub.chain.interior.len() {
                let ty = float(&scene, sub.chain.span_target(span), Attr::Translate(Axis::Y));
                assert!(ty < 0.0, "scale {scale}: {ty}");
                assert!((ty - sub.spacing / scale).abs() < EPS, "scale {scale}: {ty}");
            }
        }
    }
}
