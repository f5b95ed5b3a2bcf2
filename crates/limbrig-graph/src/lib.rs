//! Bendy Limb Rig Generator
//!
//! This crate builds an IK-spline "bendy limb" rig from three selected FK
//! joints (root, mid, tip). Each of the two segments gets a skin joint chain
//! driven by an IK spline whose curve is skinned to root, bend and tip control
//! joints, plus a live squash/stretch network. Half-bones on the three FK
//! joints keep the skin continuous across the shoulder/elbow/wrist (or
//! hip/knee/ankle).
//!
//! # Architecture
//!
//! The generator talks to a 3D host only through the [`SceneHost`] trait.
//! [`SceneGraph`] is an in-memory host that can build, inspect and evaluate a
//! rig without a 3D application:
//!
//! ```text
//! orchestrator -> sub_limb -> squash_stretch
//!              -> half_bone
//!     all of them -> primitives, constraints -> SceneHost
//! ```
//!
//! External signals (the master scale and the FK stretch ratio) are read
//! through a [`SignalProvider`], never created.
//!
//! # Example
//!
//! ```
//! use limbrig_graph::{create_bendy_limb, load_skeleton, BuildReport};
//! use limbrig_spec::{JointDesc, LimbRequest, MasterScaleDesc, SkeletonDesc};
//!
//! let desc = SkeletonDesc {
//!     joints: vec![
//!         JointDesc::new("L_shoulder", [5.0, 140.0, 0.0]).with_stretch_ratio(1.0),
//!         JointDesc::new("L_elbow", [0.0, 12.0, 0.0]).with_parent("L_shoulder"),
//!         JointDesc::new("L_wrist", [0.0, 10.0, 0.0]).with_parent("L_elbow"),
//!     ],
//!     master_scale: Some(MasterScaleDesc { name: "main_CTRL".into(), scale: 1.0 }),
//!     selection: vec!["L_shoulder".into(), "L_elbow".into(), "L_wrist".into()],
//! };
//!
//! let mut scene = load_skeleton(&desc).unwrap();
//! let limb = create_bendy_limb(&mut scene, &LimbRequest::new("Arm", 4, 3, 1.5)).unwrap();
//! assert_eq!(limb.message, "L_Arm_IkSpline_Limb created");
//!
//! let manifest = scene.subtree_manifest(limb.top_group).unwrap();
//! let report = BuildReport::new(&scene, &limb, &manifest).unwrap();
//! assert_eq!(report.segments[0].skin_joints.len(), 6);
//! ```
//!
//! # Crate Structure
//!
//! - [`host`] - Host contract and typed handles
//! - [`scene`] - In-memory host, skeleton loader and subtree manifests
//! - [`primitives`] - Duplicated joints, groups, controls and locators
//! - [`constraints`] - Point, orient-blend and aim constraints
//! - [`signals`] - External signal providers
//! - [`sub_limb`] - Segment builder
//! - [`squash_stretch`] - Squash/stretch network
//! - [`half_bone`] - Half-bone continuity joints
//! - [`orchestrator`] - Whole-limb generator
//! - [`report`] - Build reports
//! - [`hash`] - Canonical subtree hashing
//! - [`error`] - Error types

pub mod constraints;
pub mod error;
pub mod half_bone;
pub mod hash;
pub mod host;
pub mod orchestrator;
pub mod primitives;
pub mod report;
pub mod scene;
pub mod signals;
pub mod squash_stretch;
pub mod sub_limb;

pub use error::{HostError, HostResult, RigError, RigResult};
pub use half_bone::HalfBone;
pub use host::{Attr, Axis, NodeId, NodeKind, Plug, SceneHost, UtilityKind, Value};
pub use orchestrator::{create_bendy_limb, validate_request, BendyLimb, LimbBuilder};
pub use report::BuildReport;
pub use scene::{load_skeleton, SceneGraph, SubtreeManifest};
pub use signals::{ConventionSignals, FixedSignals, SignalProvider};
pub use squash_stretch::{volume_scale, SquashNetwork};
pub use sub_limb::{LimbRecord, SubLimb, SubLimbBuilder};
