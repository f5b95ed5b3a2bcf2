//! End-to-end error tests.
//!
//! Every failure kind of a limb build, and the scene state each one leaves:
//! precondition failures create nothing, later failures keep the nodes
//! created before them.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p limbrig-tests --test e2e_errors
//! ```

use pretty_assertions::assert_eq;

use limbrig_graph::{create_bendy_limb, load_skeleton, RigError, SceneHost};
use limbrig_spec::{JointDesc, LimbRequest, SkeletonDesc};
use limbrig_tests::fixtures::{build_limb, leg_skeleton, scenario_arm, scenario_request};

fn expect_error(desc: &SkeletonDesc, request: &LimbRequest) -> RigError {
    build_limb(desc, request).unwrap_err()
}

// ============================================================================
// Preconditions
// ============================================================================

#[test]
fn test_selection_count() {
    for selection in [vec![], vec!["L_shoulder"], vec!["L_shoulder", "L_elbow"]] {
        let mut desc = scenario_arm();
        desc.selection = selection.iter().map(|s| s.to_string()).collect();
        let err = expect_error(&desc, &scenario_request());
        assert_eq!(
            err,
            RigError::InvalidSelectionCount {
                count: selection.len()
            }
        );
        assert!(err.is_precondition());
    }

    let mut desc = scenario_arm();
    desc.selection.push("main_CTRL".into());
    assert_eq!(expect_error(&desc, &scenario_request()).code(), "RIG_001");
}

#[test]
fn test_non_joint_selection() {
    let mut desc = scenario_arm();
    desc.joints[2] = desc.joints[2].clone().as_transform();
    let err = expect_error(&desc, &scenario_request());
    assert_eq!(err.code(), "RIG_002");
    assert!(err.to_string().contains("L_wrist"));
}

#[test]
fn test_precondition_failures_create_nothing() {
    let desc = scenario_arm();
    let requests = [
        LimbRequest::new("Tail", 4, 3, 1.5),
        LimbRequest::new("arm", 4, 3, 1.5),
        LimbRequest::new("Arm", 0, 3, 1.5),
        LimbRequest::new("Arm", 4, -2, 1.5),
        LimbRequest::new("Arm", 4, 3, 0.0),
        LimbRequest::new("Arm", 4, 3, -1.0),
    ];
    let codes = ["RIG_003", "RIG_003", "RIG_005", "RIG_005", "RIG_005", "RIG_005"];

    for (request, code) in requests.iter().zip(codes) {
        let mut scene = load_skeleton(&desc).unwrap();
        let before = scene.len();
        let err = create_bendy_limb(&mut scene, request).unwrap_err();
        assert_eq!(err.code(), code, "{request:?}");
        assert_eq!(scene.len(), before, "{request:?} created nodes");
    }
}

#[test]
fn test_invalid_limb_type_message() {
    let err = expect_error(&scenario_arm(), &LimbRequest::new("Tail", 4, 3, 1.5));
    assert_eq!(err.to_string(), "Invalid limb type 'Tail'. Use \"Arm\" or \"Leg\"");
}

// ============================================================================
// Mid-build failures
// ============================================================================

#[test]
fn test_missing_master_scale_keeps_partial_build() {
    let mut desc = scenario_arm();
    desc.master_scale = None;
    let mut scene = load_skeleton(&desc).unwrap();
    let err = create_bendy_limb(&mut scene, &scenario_request()).unwrap_err();

    assert_eq!(err.code(), "RIG_004");
    assert!(!err.is_precondition());
    assert!(scene.find("L_Arm_do_not_touch").is_some());
    assert!(scene.find("L_upperArm_system").is_some());
    assert!(scene.find("L_upperArm_crv").is_some());
    assert!(scene.find("L_lowerArm_system").is_none());
    assert!(scene.find("L_Arm_IkSpline_limb_OFFSET").is_none());
    assert!(scene.messages().is_empty());
}

#[test]
fn test_missing_stretch_ratio() {
    let mut desc = scenario_arm();
    desc.joints[0].stretch_ratio = None;
    let err = expect_error(&desc, &scenario_request());
    assert_eq!(err.code(), "RIG_004");
    assert!(err.to_string().contains("L_shoulder"));
}

#[test]
fn test_zero_length_lower_segment() {
    let mut desc = scenario_arm();
    desc.joints[2].translate = [0.0, 0.0, 0.0];
    let mut scene = load_skeleton(&desc).unwrap();
    let err = create_bendy_limb(&mut scene, &scenario_request()).unwrap_err();

    assert!(matches!(
        err,
        RigError::DegenerateParameter {
            name: "segment_length",
            ..
        }
    ));
    assert!(scene.find("L_upperArm_tip_notSKIN").is_some());
    assert!(scene.find("L_lowerArm_system").is_none());
}

#[test]
fn test_rebuild_on_same_selection_collides() {
    let mut scene = load_skeleton(&scenario_arm()).unwrap();
    create_bendy_limb(&mut scene, &scenario_request()).unwrap();
    let before = scene.len();

    let err = create_bendy_limb(&mut scene, &scenario_request()).unwrap_err();
    assert_eq!(err.code(), "HOST_003");
    assert_eq!(err.category(), "host");
    assert_eq!(scene.len(), before);
}

#[test]
fn test_arm_and_leg_coexist() {
    let mut desc = scenario_arm();
    let leg = leg_skeleton("L", 1.0);
    desc.joints.extend(leg.joints);
    let mut scene = load_skeleton(&desc).unwrap();
    create_bendy_limb(&mut scene, &scenario_request()).unwrap();

    let hip = scene.find("L_hip").unwrap();
    let knee = scene.find("L_knee").unwrap();
    let ankle = scene.find("L_ankle").unwrap();
    scene.select(&[hip, knee, ankle]).unwrap();
    let limb = create_bendy_limb(&mut scene, &LimbRequest::new("Leg", 3, 3, 2.0)).unwrap();
    assert_eq!(limb.message, "L_Leg_IkSpline_Limb created");
}

// ============================================================================
// Skeleton descriptions
// ============================================================================

#[test]
fn test_invalid_skeleton() {
    let cases = [
        SkeletonDesc {
            joints: vec![JointDesc::new("L_elbow", [0.0; 3]).with_parent("L_shoulder")],
            ..Default::default()
        },
        SkeletonDesc {
            joints: vec![
                JointDesc::new("L_shoulder", [0.0; 3]),
                JointDesc::new("L_shoulder", [0.0; 3]),
            ],
            ..Default::default()
        },
        SkeletonDesc {
            joints: vec![JointDesc::new("L shoulder", [0.0; 3])],
            ..Default::default()
        },
        SkeletonDesc {
            joints: vec![JointDesc::new("L_shoulder", [0.0; 3])],
            selection: vec!["L_hand".into()],
            ..Default::default()
        },
    ];
    for desc in cases {
        let err = load_skeleton(&desc).unwrap_err();
        assert_eq!(err.code(), "RIG_006");
        assert_eq!(err.category(), "skeleton");
    }
}
