//! JSON output types for machine-readable CLI output.
//!
//! Every command accepts `--json` and then prints exactly one
//! [`JsonOutput`] document to stdout.

use limbrig_graph::{BuildReport, RigError};
use limbrig_spec::{LimbType, Segment};
use serde::{Deserialize, Serialize};

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "RIG_001", "HOST_003")
    pub code: String,
    /// Error category ("rig", "host" or "skeleton")
    pub category: String,
    /// Human-readable error message
    pub message: String,
}

impl From<&RigError> for JsonError {
    fn from(err: &RigError) -> Self {
        Self {
            code: err.code().to_string(),
            category: err.category().to_string(),
            message: err.to_string(),
        }
    }
}

/// Top-level JSON document printed by a command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonOutput<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

impl<T> JsonOutput<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(err: &RigError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(err.into()),
        }
    }
}

/// Result of `limbrig build --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildResult {
    pub report: BuildReport,
    /// Where the subtree manifest was written, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<String>,
}

/// Result of `limbrig validate --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidateResult {
    pub limb_type: LimbType,
    pub upper_joint_count: u32,
    pub lower_joint_count: u32,
    /// Selected FK joints, root to tip.
    pub selection: Vec<String>,
}

/// Live values of one skin joint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JointSample {
    pub segment: Segment,
    pub name: String,
    pub translate_y: f64,
    pub scale_x: f64,
}

/// Result of `limbrig inspect --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InspectResult {
    pub stretch_ratio: f64,
    pub master_scale: f64,
    pub joints: Vec<JointSample>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use limbrig_graph::HostError;

    #[test]
    fn test_failed_output_shape() {
        let err: RigError = HostError::NameCollision("L_Arm_do_not_touch".into()).into();
        let output: JsonOutput<BuildResult> = JsonOutput::failed(&err);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "HOST_003");
        assert_eq!(json["error"]["category"], "host");
        assert!(json.get("result").is_none());
    }
}
