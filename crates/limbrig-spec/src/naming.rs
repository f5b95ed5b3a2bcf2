//! Naming convention for generated nodes.
//!
//! Every generated name starts with the side token of the limb's root joint
//! (the text before its first underscore, e.g. `L` in `L_shoulder`). Names are
//! derived, never looked up, so every stage can recompute them.

use std::sync::OnceLock;

use regex::Regex;

use crate::limb::{HalfBonePosition, LimbType, Segment};

/// Node names accepted by the host: an identifier of letters, digits and underscores.
pub const NODE_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

static NODE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn node_name_regex() -> &'static Regex {
    NODE_NAME_REGEX.get_or_init(|| Regex::new(NODE_NAME_PATTERN).expect("invalid regex pattern"))
}

/// Checks if a string is a valid node name.
pub fn is_valid_node_name(name: &str) -> bool {
    node_name_regex().is_match(name)
}

/// Returns the side token of a joint name (text before the first underscore).
///
/// A name without an underscore is its own side token.
pub fn side_token(joint_name: &str) -> &str {
    joint_name.split('_').next().unwrap_or(joint_name)
}

/// Suffix for a constraint node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSuffix {
    Point,
    Orient,
    Aim,
}

impl ConstraintSuffix {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintSuffix::Point => "pntCstr",
            ConstraintSuffix::Orient => "oriCstr",
            ConstraintSuffix::Aim => "aimCstr",
        }
    }
}

/// Appends the offset-group suffix to a node name.
pub fn offset(name: &str) -> String {
    format!("{name}_OFFSET")
}

/// Returns the constraint name for a driven node.
pub fn constraint(driven: &str, suffix: ConstraintSuffix) -> String {
    format!("{driven}_{}", suffix.as_str())
}

/// Limb-level names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigNames {
    side: String,
    limb_type: LimbType,
}

impl RigNames {
    /// Derives the naming scheme from the limb's root joint name.
    pub fn new(root_joint_name: &str, limb_type: LimbType) -> Self {
        Self {
            side: side_token(root_joint_name).to_string(),
            limb_type,
        }
    }

    /// Side token without the trailing underscore.
    pub fn side(&self) -> &str {
        &self.side
    }

    pub fn limb_type(&self) -> LimbType {
        self.limb_type
    }

    /// Top group holding the whole limb.
    pub fn top_group(&self) -> String {
        format!("{}_{}_IkSpline_limb_OFFSET", self.side, self.limb_type)
    }

    /// Group for curves, handles and helper locators.
    pub fn do_not_touch(&self) -> String {
        format!("{}_{}_do_not_touch", self.side, self.limb_type)
    }

    /// Informational message reported once the limb is built.
    pub fn success_message(&self) -> String {
        format!("{}_{}_IkSpline_Limb created", self.side, self.limb_type)
    }

    /// Names for one segment.
    pub fn segment(&self, segment: Segment) -> SegmentNames {
        SegmentNames {
            prefix: format!("{}_{}{}", self.side, segment.as_str(), self.limb_type),
        }
    }

    /// Names for one half-bone.
    pub fn half_bone(&self, position: HalfBonePosition) -> HalfBoneNames {
        HalfBoneNames {
            joint: format!(
                "{}_{}_HalfBone",
                self.side,
                self.limb_type.half_bone_token(position)
            ),
        }
    }
}

/// Names of the nodes generated for one segment, e.g. `L_upperArm_*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentNames {
    prefix: String,
}

impl SegmentNames {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn with(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    pub fn system(&self) -> String {
        self.with("system")
    }

    pub fn root_control_joint(&self) -> String {
        self.with("Root_CTRL_JNT")
    }

    pub fn tip_control_joint(&self) -> String {
        self.with("Tip_CTRL_JNT")
    }

    pub fn bend_joint(&self) -> String {
        self.with("Bend_CTRL_JNT")
    }

    pub fn bend_control(&self) -> String {
        format!("{}_CTRL", self.bend_joint())
    }

    pub fn bend_up_locator(&self) -> String {
        format!("{}_aim_up_LOC", self.bend_joint())
    }

    /// Non-deforming chain root.
    pub fn skin_root(&self) -> String {
        self.with("01_notSKIN")
    }

    /// Deforming joint `index` (1-based); numbering continues after the chain root.
    pub fn skin_joint(&self, index: u32) -> String {
        self.with(&format!("{:02}_SKIN", index + 1))
    }

    /// Non-deforming chain tip.
    pub fn skin_tip(&self) -> String {
        self.with("tip_notSKIN")
    }

    pub fn ik_handle(&self) -> String {
        self.with("IK_HDL")
    }

    pub fn effector(&self) -> String {
        self.with("eff")
    }

    pub fn curve(&self) -> String {
        self.with("crv")
    }

    pub fn skin_cluster(&self) -> String {
        format!("{}_SKINCluster", self.curve())
    }

    pub fn rebuild(&self) -> String {
        format!("{}_rebuildCrv", self.curve())
    }

    /// Curve sample `index` (1-based).
    pub fn sample(&self, index: u32) -> String {
        self.with(&format!("poci_{index:02}"))
    }

    /// Span distance `index` (1-based).
    pub fn distance(&self, index: u32) -> String {
        self.with(&format!("dist_btw_{index:02}"))
    }

    /// Global-scale division for span `index` (1-based).
    pub fn global_scale(&self, index: u32) -> String {
        self.with(&format!("globalScale_{index:02}"))
    }

    /// Master-scale negation for span `index` (1-based).
    pub fn inverse_scale(&self, index: u32) -> String {
        self.with(&format!("inverseScale_{index:02}"))
    }

    pub fn volume_pow(&self) -> String {
        self.with("volumeConservation_pow")
    }

    pub fn volume_invert(&self) -> String {
        self.with("volumeConservation_invert")
    }
}

/// Names of the nodes generated for one half-bone, e.g. `L_elbow_HalfBone*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfBoneNames {
    joint: String,
}

impl HalfBoneNames {
    pub fn joint(&self) -> &str {
        &self.joint
    }

    pub fn offset(&self) -> String {
        offset(&self.joint)
    }

    pub fn control(&self) -> String {
        format!("{}_CTRL", self.joint)
    }

    pub fn skin(&self) -> String {
        format!("{}_SKIN", self.joint)
    }

    pub fn aim_locator(&self) -> String {
        format!("{}_SKIN_aim_LOC", self.joint)
    }
}
