//! Segment direction and the IK spline advanced-twist axis selection.
//!
//! Mirrored limbs have joints translating along -Y. The direction is resolved
//! once per segment from its resting translation and threaded through every
//! stage that needs it (twist axes, scale negation, tip aim vector).

use serde::{Deserialize, Serialize};

/// Sign of a segment's resting translation along the limb axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Joints translate along +Y (zero counts as positive).
    Positive,
    /// Joints translate along -Y.
    Negative,
}

impl Direction {
    /// Resolves the direction of a resting translation.
    pub fn from_translation(translate_y: f64) -> Self {
        if translate_y < 0.0 {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }

    /// Returns +1.0 or -1.0.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }

    /// Returns true if the master scale has to be negated before dividing.
    pub fn negates_scale(&self) -> bool {
        matches!(self, Direction::Negative)
    }

    /// Local aim vector pointing down the limb.
    pub fn limb_axis(&self) -> [f64; 3] {
        [0.0, self.sign(), 0.0]
    }

    /// Advanced-twist settings for an IK spline on a segment with this direction.
    pub fn twist_axes(&self) -> TwistAxes {
        match self {
            Direction::Positive => TwistAxes {
                forward: ForwardAxis::PositiveY,
                up: WorldUpAxis::PositiveX,
                up_vector: [1.0, 0.0, 0.0],
            },
            Direction::Negative => TwistAxes {
                forward: ForwardAxis::NegativeY,
                up: WorldUpAxis::NegativeX,
                up_vector: [-1.0, 0.0, 0.0],
            },
        }
    }
}

/// Forward axis of an IK spline handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardAxis {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl ForwardAxis {
    /// Host enum index.
    pub fn index(&self) -> i64 {
        match self {
            ForwardAxis::PositiveX => 0,
            ForwardAxis::NegativeX => 1,
            ForwardAxis::PositiveY => 2,
            ForwardAxis::NegativeY => 3,
            ForwardAxis::PositiveZ => 4,
            ForwardAxis::NegativeZ => 5,
        }
    }
}

/// World-up axis of an IK spline handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldUpAxis {
    PositiveY,
    NegativeY,
    ClosestY,
    PositiveZ,
    NegativeZ,
    ClosestZ,
    PositiveX,
    NegativeX,
    ClosestX,
}

impl WorldUpAxis {
    /// Host enum index.
    pub fn index(&self) -> i64 {
        match self {
            WorldUpAxis::PositiveY => 0,
            WorldUpAxis::NegativeY => 1,
            WorldUpAxis::ClosestY => 2,
            WorldUpAxis::PositiveZ => 3,
            WorldUpAxis::NegativeZ => 4,
            WorldUpAxis::ClosestZ => 5,
            WorldUpAxis::PositiveX => 6,
            WorldUpAxis::NegativeX => 7,
            WorldUpAxis::ClosestX => 8,
        }
    }
}

/// World-up type of an IK spline handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldUpType {
    SceneUp,
    ObjectUp,
    ObjectUpStartEnd,
    ObjectRotationUp,
    /// Per-end world-up matrices; the one this tool uses.
    ObjectRotationUpStartEnd,
    Vector,
    VectorStartEnd,
    Relative,
}

impl WorldUpType {
    /// Host enum index.
    pub fn index(&self) -> i64 {
        match self {
            WorldUpType::SceneUp => 0,
            WorldUpType::ObjectUp => 1,
            WorldUpType::ObjectUpStartEnd => 2,
            WorldUpType::ObjectRotationUp => 3,
            WorldUpType::ObjectRotationUpStartEnd => 4,
            WorldUpType::Vector => 5,
            WorldUpType::VectorStartEnd => 6,
            WorldUpType::Relative => 7,
        }
    }
}

/// Resolved advanced-twist axis selection for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwistAxes {
    pub forward: ForwardAxis,
    pub up: WorldUpAxis,
    /// Start and end world-up vector.
    pub up_vector: [f64; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_translation() {
        assert_eq!(Direction::from_translation(12.0), Direction::Positive);
        assert_eq!(Direction::from_translation(0.0), Direction::Positive);
        assert_eq!(Direction::from_translation(-0.001), Direction::Negative);
    }

    #[test]
    fn test_twist_axes_indices() {
        let pos = Direction::Positive.twist_axes();
        assert_eq!(pos.forward.index(), 2);
        assert_eq!(pos.up.index(), 6);
        assert_eq!(pos.up_vector, [1.0, 0.0, 0.0]);

        let neg = Direction::Negative.twist_axes();
        assert_eq!(neg.forward.index(), 3);
        assert_eq!(neg.up.index(), 7);
        assert_eq!(neg.up_vector, [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_negates_scale() {
        assert!(!Direction::Positive.negates_scale());
        assert!(Direction::Negative.negates_scale());
        assert_eq!(Direction::Negative.limb_axis(), [0.0, -1.0, 0.0]);
        assert_eq!(WorldUpType::ObjectRotationUpStartEnd.index(), 4);
    }
}
