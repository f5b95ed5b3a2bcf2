//! Skeleton description files.
//!
//! A skeleton description is the JSON stand-in for a host scene: the FK joints
//! the limb is built from, the external signals the rig reads, and the ordered
//! selection.
//!
//! ```json
//! {
//!   "joints": [
//!     { "name": "L_shoulder", "translate": [5, 140, 0], "stretch_ratio": 1.0 },
//!     { "name": "L_elbow", "parent": "L_shoulder", "translate": [0, 12, 0] },
//!     { "name": "L_wrist", "parent": "L_elbow", "translate": [0, 10, 0] }
//!   ],
//!   "master_scale": { "name": "main_CTRL", "scale": 1.0 },
//!   "selection": ["L_shoulder", "L_elbow", "L_wrist"]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::naming::is_valid_node_name;

fn default_radius() -> f64 {
    1.0
}

fn default_scale() -> f64 {
    1.0
}

/// Kind of a described transform node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    #[default]
    Joint,
    /// A plain transform (used to describe non-joint selections).
    Transform,
}

/// One transform node of the skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JointDesc {
    pub name: String,
    #[serde(default)]
    pub kind: TransformKind,
    /// Parent node name; must be declared earlier in the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Local translation.
    #[serde(default)]
    pub translate: [f64; 3],
    /// Local rotation in degrees, XYZ order.
    #[serde(default)]
    pub rotate: [f64; 3],
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Output of the stretchy-FK condition node driving this joint, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stretch_ratio: Option<f64>,
}

impl JointDesc {
    /// Creates a root joint at a local translation.
    pub fn new(name: impl Into<String>, translate: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            kind: TransformKind::Joint,
            parent: None,
            translate,
            rotate: [0.0; 3],
            radius: default_radius(),
            stretch_ratio: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_rotate(mut self, rotate: [f64; 3]) -> Self {
        self.rotate = rotate;
        self
    }

    pub fn with_stretch_ratio(mut self, ratio: f64) -> Self {
        self.stretch_ratio = Some(ratio);
        self
    }

    pub fn as_transform(mut self) -> Self {
        self.kind = TransformKind::Transform;
        self
    }
}

/// The master uniform-scale control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MasterScaleDesc {
    pub name: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

/// A skeleton description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkeletonDesc {
    pub joints: Vec<JointDesc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_scale: Option<MasterScaleDesc>,
    /// Ordered selection (root, mid, tip).
    #[serde(default)]
    pub selection: Vec<String>,
}

impl SkeletonDesc {
    /// Parses and checks a skeleton description.
    pub fn from_json(json: &str) -> Result<Self, ParamError> {
        let desc: Self =
            serde_json::from_str(json).map_err(|e| ParamError::ParseSkeleton(e.to_string()))?;
        desc.validate()?;
        Ok(desc)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, ParamError> {
        serde_json::to_string_pretty(self).map_err(|e| ParamError::ParseSkeleton(e.to_string()))
    }

    /// Looks up a joint by name.
    pub fn joint(&self, name: &str) -> Option<&JointDesc> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Checks names, parent ordering and selection references.
    ///
    /// Selection size and node kinds are build preconditions checked by the
    /// generator.
    pub fn validate(&self) -> Result<(), ParamError> {
        let mut seen = HashSet::new();
        let mut names: Vec<&str> = self.joints.iter().map(|j| j.name.as_str()).collect();
        if let Some(master) = &self.master_scale {
            names.push(&master.name);
        }

        for joint in &self.joints {
            if let Some(parent) = &joint.parent {
                if !seen.contains(parent.as_str()) {
                    return Err(ParamError::ParseSkeleton(format!(
                        "joint '{}' references parent '{}' before it is declared",
                        joint.name, parent
                    )));
                }
            }
            seen.insert(joint.name.as_str());
        }

        let mut unique = HashSet::new();
        for name in names {
            if !is_valid_node_name(name) {
                return Err(ParamError::ParseSkeleton(format!(
                    "invalid node name '{name}'"
                )));
            }
            if !unique.insert(name) {
                return Err(ParamError::ParseSkeleton(format!(
                    "duplicate node name '{name}'"
                )));
            }
        }

        for name in &self.selection {
            if !unique.contains(name.as_str()) {
                return Err(ParamError::ParseSkeleton(format!(
                    "selection references unknown node '{name}'"
                )));
            }
        }
        Ok(())
    }
}
