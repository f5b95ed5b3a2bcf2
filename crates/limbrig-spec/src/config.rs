//! Build configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Span count the IK curves are rebuilt to.
pub const DEFAULT_CURVE_SPANS: u32 = 8;

fn default_curve_spans() -> u32 {
    DEFAULT_CURVE_SPANS
}

fn default_curve_degree() -> u32 {
    3
}

fn default_bend_control_radius() -> f64 {
    7.0
}

fn default_mid_control_radius() -> f64 {
    10.0
}

fn default_half_bone_radius_scale() -> f64 {
    2.0
}

fn default_skin_radius_scale() -> f64 {
    0.5
}

fn default_control_normal() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}

fn default_master_scale_node() -> String {
    "main_CTRL".to_string()
}

/// Tunables for the limb generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Span count of the rebuilt IK curve.
    #[serde(default = "default_curve_spans")]
    pub curve_spans: u32,
    /// Degree of the rebuilt IK curve.
    #[serde(default = "default_curve_degree")]
    pub curve_degree: u32,
    /// Radius of the bend joint's circle control.
    #[serde(default = "default_bend_control_radius")]
    pub bend_control_radius: f64,
    /// Radius of the mid half-bone's circle control.
    #[serde(default = "default_mid_control_radius")]
    pub mid_control_radius: f64,
    /// Half-bone joint radius, as a multiple of the control radius.
    #[serde(default = "default_half_bone_radius_scale")]
    pub half_bone_radius_scale: f64,
    /// Skin joint radius, as a multiple of the control radius.
    #[serde(default = "default_skin_radius_scale")]
    pub skin_radius_scale: f64,
    /// Normal of every circle control.
    #[serde(default = "default_control_normal")]
    pub control_normal: [f64; 3],
    /// Node carrying the rig's master uniform scale on scaleY.
    #[serde(default = "default_master_scale_node")]
    pub master_scale_node: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            curve_spans: default_curve_spans(),
            curve_degree: default_curve_degree(),
            bend_control_radius: default_bend_control_radius(),
            mid_control_radius: default_mid_control_radius(),
            half_bone_radius_scale: default_half_bone_radius_scale(),
            skin_radius_scale: default_skin_radius_scale(),
            control_normal: default_control_normal(),
            master_scale_node: default_master_scale_node(),
        }
    }
}

impl BuildConfig {
    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ParamError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ParamError::ParseConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ParamError> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    ParamError::ParseConfig(format!("{}: {}", path.display(), e))
                })?;
                Self::from_json(&json)
            }
            None => Ok(Self::default()),
        }
    }

    /// Sets the master scale node name.
    pub fn with_master_scale_node(mut self, name: impl Into<String>) -> Self {
        self.master_scale_node = name.into();
        self
    }

    /// Sets the curve span count.
    pub fn with_curve_spans(mut self, spans: u32) -> Self {
        self.curve_spans = spans;
        self
    }

    /// Validates the numeric fields.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.curve_spans == 0 {
            return Err(ParamError::degenerate(
                "curve_spans",
                0.0,
                "curve needs at least one span",
            ));
        }
        if self.curve_degree == 0 {
            return Err(ParamError::degenerate(
                "curve_degree",
                0.0,
                "curve degree must be at least 1",
            ));
        }
        for (name, value) in [
            ("bend_control_radius", self.bend_control_radius),
            ("mid_control_radius", self.mid_control_radius),
            ("half_bone_radius_scale", self.half_bone_radius_scale),
            ("skin_radius_scale", self.skin_radius_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParamError::degenerate(name, value, "must be positive"));
            }
        }
        Ok(())
    }
}
