//! Limb Rig Parameter Library
//!
//! This crate provides the types shared by the bendy-limb generator: build
//! parameters and their validation, the per-segment direction, IK spline twist
//! axis selection, build configuration, the naming convention for generated
//! nodes, and the skeleton description format.
//!
//! # Example
//!
//! ```
//! use limbrig_spec::{LimbRequest, LimbType, RigNames, Segment};
//!
//! let params = LimbRequest::new("Arm", 4, 3, 1.5).resolve().unwrap();
//! assert_eq!(params.limb_type, LimbType::Arm);
//!
//! let names = RigNames::new("L_shoulder", params.limb_type);
//! assert_eq!(names.segment(Segment::Upper).system(), "L_upperArm_system");
//! assert_eq!(names.top_group(), "L_Arm_IkSpline_limb_OFFSET");
//! ```
//!
//! # Modules
//!
//! - [`error`]: Parameter validation errors
//! - [`limb`]: Limb type, segment and half-bone position tags
//! - [`direction`]: Segment direction and twist axis selection
//! - [`params`]: Build requests and validated parameters
//! - [`config`]: Build configuration
//! - [`naming`]: Generated node names
//! - [`skeleton`]: Skeleton description files

pub mod config;
pub mod direction;
pub mod error;
pub mod limb;
pub mod naming;
pub mod params;
pub mod skeleton;

pub use config::{BuildConfig, DEFAULT_CURVE_SPANS};
pub use direction::{Direction, ForwardAxis, TwistAxes, WorldUpAxis, WorldUpType};
pub use error::ParamError;
pub use limb::{HalfBonePosition, LimbType, Segment};
pub use naming::{is_valid_node_name, side_token, HalfBoneNames, RigNames, SegmentNames};
pub use params::{LimbParams, LimbRequest};
pub use skeleton::{JointDesc, MasterScaleDesc, SkeletonDesc, TransformKind};
