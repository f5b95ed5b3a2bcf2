//! Error types for limb parameter validation.

use thiserror::Error;

/// Errors raised while validating limb build parameters.
///
/// These are the checks that can run before anything is created in a scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// The limb-type tag is not one of the supported anatomical namings.
    #[error("Invalid limb type '{tag}'. Use \"Arm\" or \"Leg\"")]
    InvalidLimbType { tag: String },

    /// A numeric parameter would make the spacing or sampling math undefined.
    #[error("Degenerate parameter {name}: {reason} (got {value})")]
    DegenerateParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The skeleton description could not be parsed.
    #[error("Failed to parse skeleton description: {0}")]
    ParseSkeleton(String),

    /// The build config could not be parsed.
    #[error("Failed to parse build config: {0}")]
    ParseConfig(String),
}

impl ParamError {
    /// Creates a degenerate parameter error.
    pub fn degenerate(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::DegenerateParameter {
            name,
            value,
            reason,
        }
    }

    /// Returns the stable error code string (e.g., "LIMB_001").
    pub fn code(&self) -> &'static str {
        match self {
            ParamError::InvalidLimbType { .. } => "LIMB_001",
            ParamError::DegenerateParameter { .. } => "LIMB_002",
            ParamError::ParseSkeleton(_) => "LIMB_003",
            ParamError::ParseConfig(_) => "LIMB_004",
        }
    }
}
