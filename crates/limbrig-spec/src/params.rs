//! Limb build parameters.

use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::limb::{LimbType, Segment};

/// A limb build request as entered by the animator.
///
/// Values are unchecked; [`LimbRequest::resolve`] turns them into
/// [`LimbParams`] or reports the first failing precondition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimbRequest {
    /// Limb-type tag ("Arm" or "Leg").
    pub limb_type: String,
    /// Number of deforming joints on the upper segment.
    pub upper_joint_count: i64,
    /// Number of deforming joints on the lower segment.
    pub lower_joint_count: i64,
    /// Radius of the control joints.
    pub control_radius: f64,
}

impl LimbRequest {
    /// Creates a new request.
    pub fn new(
        limb_type: impl Into<String>,
        upper_joint_count: i64,
        lower_joint_count: i64,
        control_radius: f64,
    ) -> Self {
        Self {
            limb_type: limb_type.into(),
            upper_joint_count,
            lower_joint_count,
            control_radius,
        }
    }

    /// Parses the limb-type tag only.
    pub fn limb_type(&self) -> Result<LimbType, ParamError> {
        self.limb_type.parse()
    }

    /// Validates the request and returns typed parameters.
    ///
    /// The limb type is checked first, then joint counts, then the radius.
    pub fn resolve(&self) -> Result<LimbParams, ParamError> {
        let limb_type = self.limb_type()?;
        let upper_joint_count = joint_count("upper_joint_count", self.upper_joint_count)?;
        let lower_joint_count = joint_count("lower_joint_count", self.lower_joint_count)?;
        let params = LimbParams {
            limb_type,
            upper_joint_count,
            lower_joint_count,
            control_radius: self.control_radius,
        };
        params.validate()?;
        Ok(params)
    }
}

fn joint_count(name: &'static str, value: i64) -> Result<u32, ParamError> {
    if value < 1 {
        return Err(ParamError::degenerate(
            name,
            value as f64,
            "joint count must be at least 1",
        ));
    }
    u32::try_from(value)
        .map_err(|_| ParamError::degenerate(name, value as f64, "joint count is too large"))
}

/// Validated limb build parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimbParams {
    pub limb_type: LimbType,
    pub upper_joint_count: u32,
    pub lower_joint_count: u32,
    pub control_radius: f64,
}

impl LimbParams {
    /// Creates parameters and validates them.
    pub fn new(
        limb_type: LimbType,
        upper_joint_count: u32,
        lower_joint_count: u32,
        control_radius: f64,
    ) -> Result<Self, ParamError> {
        let params = Self {
            limb_type,
            upper_joint_count,
            lower_joint_count,
            control_radius,
        };
        params.validate()?;
        Ok(params)
    }

    /// Returns the deforming joint count for a segment.
    pub fn joint_count(&self, segment: Segment) -> u32 {
        match segment {
            Segment::Upper => self.upper_joint_count,
            Segment::Lower => self.lower_joint_count,
        }
    }

    /// Validates the numeric parameters.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.upper_joint_count == 0 {
            return Err(ParamError::degenerate(
                "upper_joint_count",
                0.0,
                "joint count must be at least 1",
            ));
        }
        if self.lower_joint_count == 0 {
            return Err(ParamError::degenerate(
                "lower_joint_count",
                0.0,
                "joint count must be at least 1",
            ));
        }
        if !self.control_radius.is_finite() || self.control_radius <= 0.0 {
            return Err(ParamError::degenerate(
                "control_radius",
                self.control_radius,
                "radius must be a positive number",
            ));
        }
        Ok(())
    }
}
