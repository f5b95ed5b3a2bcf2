//! Limb type, segment and half-bone position tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

// =============================================================================
// Limb Types
// =============================================================================

/// Supported limb anatomies.
///
/// The limb type only changes generated name tokens, never the graph topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimbType {
    /// Shoulder -> elbow -> wrist.
    Arm,
    /// Hip -> knee -> ankle.
    Leg,
}

impl LimbType {
    /// All supported limb types.
    pub const ALL: [LimbType; 2] = [LimbType::Arm, LimbType::Leg];

    /// Returns the tag used in generated node names.
    pub fn as_str(&self) -> &'static str {
        match self {
            LimbType::Arm => "Arm",
            LimbType::Leg => "Leg",
        }
    }

    /// Returns the anatomical token for a half-bone position.
    pub fn half_bone_token(&self, position: HalfBonePosition) -> &'static str {
        match (self, position) {
            (LimbType::Arm, HalfBonePosition::Root) => "shoulder",
            (LimbType::Arm, HalfBonePosition::Mid) => "elbow",
            (LimbType::Arm, HalfBonePosition::Tip) => "wrist",
            (LimbType::Leg, HalfBonePosition::Root) => "hip",
            (LimbType::Leg, HalfBonePosition::Mid) => "knee",
            (LimbType::Leg, HalfBonePosition::Tip) => "ankle",
        }
    }
}

impl fmt::Display for LimbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LimbType {
    type Err = ParamError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "Arm" => Ok(LimbType::Arm),
            "Leg" => Ok(LimbType::Leg),
            _ => Err(ParamError::InvalidLimbType {
                tag: tag.to_string(),
            }),
        }
    }
}

// =============================================================================
// Segments
// =============================================================================

/// One of the two sub-limb segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Root joint -> mid joint (upper arm, thigh).
    Upper,
    /// Mid joint -> tip joint (forearm, shin).
    Lower,
}

impl Segment {
    /// Both segments in build order.
    pub const ALL: [Segment; 2] = [Segment::Upper, Segment::Lower];

    /// Returns the name token for this segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Upper => "upper",
            Segment::Lower => "lower",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a half-bone sits along the limb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfBonePosition {
    Root,
    Mid,
    Tip,
}

impl HalfBonePosition {
    /// All positions in build order.
    pub const ALL: [HalfBonePosition; 3] = [
        HalfBonePosition::Root,
        HalfBonePosition::Mid,
        HalfBonePosition::Tip,
    ];
}
