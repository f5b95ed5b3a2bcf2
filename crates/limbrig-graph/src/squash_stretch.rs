//! Squash-and-stretch network.
//!
//! Per segment of N deforming joints:
//!
//! ```text
//! curve.worldSpace -> poci_01 .. poci_{N+1}          (parameter i/N, percentage)
//! poci_i.position, poci_{i+1}.position -> dist_btw_i
//! dist_btw_i.distance / master scale -> globalScale_i.outputX -> chain[i+1].translateY
//! stretch ratio ^ 0.5 -> 1 / x -> scaleX, scaleZ of every deforming joint
//! ```
//!
//! Negative segments divide by the negated master scale so the live
//! translation keeps the resting sign.

use limbrig_spec::{Direction, SegmentNames};
use tracing::{debug, info};

use crate::error::{RigError, RigResult};
use crate::host::{Attr, Axis, MathOperation, NodeId, Plug, SceneHost, UtilityKind, Value};
use crate::signals::SignalProvider;
use crate::sub_limb::SkinJointChain;

/// Nodes of one segment's squash/stretch network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquashNetwork {
    /// Curve samples, N+1.
    pub samples: Vec<NodeId>,
    /// Span lengths, N.
    pub distances: Vec<NodeId>,
    /// Span length divided by the master scale, N.
    pub scale_divides: Vec<NodeId>,
    /// Master scale negations; empty for positive segments.
    pub negations: Vec<NodeId>,
    pub volume_pow: NodeId,
    pub volume_invert: NodeId,
}

#[allow(clippy::len_without_is_empty)]
impl SquashNetwork {
    /// Total node count.
    pub fn len(&self) -> usize {
        self.samples.len()
            + self.distances.len()
            + self.scale_divides.len()
            + self.negations.len()
            + 2
    }
}

/// Evenly spaced curve parameters `0, 1/n, .., 1` (n+1 values).
pub fn sample_parameters(n: u32) -> Vec<f64> {
    if n == 0 {
        return vec![0.0];
    }
    (0..=n).map(|i| f64::from(i) / f64::from(n)).collect()
}

/// Cross-axis scale preserving volume under a stretch ratio.
pub fn volume_scale(stretch_ratio: f64) -> f64 {
    1.0 / stretch_ratio.sqrt()
}

fn utility(
    host: &mut dyn SceneHost,
    kind: UtilityKind,
    name: &str,
    operation: Option<MathOperation>,
) -> RigResult<NodeId> {
    let node = host.create_utility(kind, name)?;
    if let Some(op) = operation {
        host.set_attr(node.plug(Attr::Operation), Value::Int(op.index()))?;
    }
    Ok(node)
}

/// Wires the live squash/stretch network for one segment.
///
/// `stretch_source` is the FK joint whose stretch ratio drives volume
/// conservation.
pub fn build_squash_stretch(
    host: &mut dyn SceneHost,
    signals: &dyn SignalProvider,
    names: &SegmentNames,
    curve: NodeId,
    direction: Direction,
    chain: &SkinJointChain,
    stretch_source: NodeId,
) -> RigResult<SquashNetwork> {
    let n = chain.interior.len();
    if n == 0 {
        return Err(RigError::degenerate(
            "joint_count",
            0.0,
            "curve sampling needs at least one span",
        ));
    }
    let n = u32::try_from(n)
        .map_err(|_| RigError::degenerate("joint_count", n as f64, "joint count is too large"))?;

    let mut samples = Vec::with_capacity(n as usize + 1);
    for (i, parameter) in sample_parameters(n).into_iter().enumerate() {
        let poci = utility(host, UtilityKind::PointOnCurveInfo, &names.sample(i as u32 + 1), None)?;
        host.connect(curve.plug(Attr::WorldSpace), poci.plug(Attr::InputCurve))?;
        host.set_attr(poci.plug(Attr::TurnOnPercentage), Value::Bool(true))?;
        host.set_attr(poci.plug(Attr::Parameter), Value::Float(parameter))?;
        samples.push(poci);
    }
    debug!(segment = names.prefix(), samples = samples.len(), "curve samples created");

    let master_scale: Plug = signals.master_scale(&*host)?;

    let mut distances = Vec::with_capacity(n as usize);
    let mut scale_divides = Vec::with_capacity(n as usize);
    let mut negations = Vec::new();
    for span in 0..n as usize {
        let index = span as u32 + 1;
        let dist = utility(host, UtilityKind::DistanceBetween, &names.distance(index), None)?;
        host.connect(samples[span].plug(Attr::Position), dist.plug(Attr::Point1))?;
        host.connect(samples[span + 1].plug(Attr::Position), dist.plug(Attr::Point2))?;

        let divide = utility(
            host,
            UtilityKind::MultiplyDivide,
            &names.global_scale(index),
            Some(MathOperation::Divide),
        )?;
        host.connect(dist.plug(Attr::Distance), divide.plug(Attr::Input1X))?;

        if direction.negates_scale() {
            let negate =
                utility(host, UtilityKind::MultDoubleLinear, &names.inverse_scale(index), None)?;
            host.set_attr(negate.plug(Attr::Input2), Value::Float(-1.0))?;
            host.connect(master_scale, negate.plug(Attr::Input1))?;
            host.connect(negate.plug(Attr::Output), divide.plug(Attr::Input2X))?;
            negations.push(negate);
        } else {
            host.connect(master_scale, divide.plug(Attr::Input2X))?;
        }

        host.connect(
            divide.plug(Attr::OutputX),
            chain.span_target(span).plug(Attr::Translate(Axis::Y)),
        )?;
        distances.push(dist);
        scale_divides.push(divide);
    }

    let stretch_ratio = signals.stretch_ratio(&*host, stretch_source)?;
    let volume_pow = utility(
        host,
        UtilityKind::MultiplyDivide,
        &names.volume_pow(),
        Some(MathOperation::Power),
    )?;
    host.connect(stretch_ratio, volume_pow.plug(Attr::Input1X))?;
    host.set_attr(volume_pow.plug(Attr::Input2X), Value::Float(0.5))?;

    let volume_invert = utility(
        host,
        UtilityKind::MultiplyDivide,
        &names.volume_invert(),
        Some(MathOperation::Divide),
    )?;
    host.set_attr(volume_invert.plug(Attr::Input1X), Value::Float(1.0))?;
    host.connect(volume_pow.plug(Attr::OutputX), volume_invert.plug(Attr::Input2X))?;

    for joint in &chain.interior {
        for axis in [Axis::X, Axis::Z] {
            host.connect(volume_invert.plug(Attr::OutputX), joint.plug(Attr::Scale(axis)))?;
        }
    }

    let network = SquashNetwork {
        samples,
        distances,
        scale_divides,
        negations,
        volume_pow,
        volume_invert,
    };
    info!(
        segment = names.prefix(),
        spans = n,
        nodes = network.len(),
        negated = direction.negates_scale(),
        "squash/stretch network wired"
    );
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_parameters() {
        assert_eq!(sample_parameters(4), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(sample_parameters(1), vec![0.0, 1.0]);
        let three = sample_parameters(3);
        assert_eq!(three.len(), 4);
        assert_eq!(three[3], 1.0);
    }

    #[test]
    fn test_volume_scale() {
        assert_eq!(volume_scale(1.0), 1.0);
        assert!((volume_scale(4.0) - 0.5).abs() < 1e-12);
        assert!((volume_scale(0.25) - 2.0).abs() < 1e-12);
    }
}
