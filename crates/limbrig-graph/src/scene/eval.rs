//! Pull evaluation of the math-node network.

use nalgebra::{Matrix4, Point3};

use super::{NodeData, SceneGraph};
use crate::error::{HostError, HostResult};
use crate::host::{Attr, MathOperation, NodeId, NodeKind, Plug, Value, ValueType};

/// Upstream chain length after which evaluation reports a cycle.
const MAX_DEPTH: usize = 256;

impl SceneGraph {
    /// Evaluates a scalar plug, following connections upstream.
    pub fn evaluate(&self, plug: Plug) -> HostResult<f64> {
        self.eval_scalar(plug, 0)
    }

    /// Evaluates a vector plug, following connections upstream.
    pub fn evaluate_vector(&self, plug: Plug) -> HostResult<[f64; 3]> {
        let p = self.eval_vector(plug, 0)?;
        Ok([p.x, p.y, p.z])
    }

    /// World-space CVs of a curve, deformed by its skin cluster.
    pub fn curve_points(&self, curve: NodeId) -> HostResult<Vec<[f64; 3]>> {
        Ok(self
            .live_cvs(curve)?
            .iter()
            .map(|p| [p.x, p.y, p.z])
            .collect())
    }

    fn fail(&self, plug: Plug, reason: impl Into<String>) -> HostError {
        HostError::evaluation(self.plug_name(plug), reason)
    }

    fn eval_scalar(&self, plug: Plug, depth: usize) -> HostResult<f64> {
        if depth > MAX_DEPTH {
            return Err(self.fail(plug, "dependency cycle"));
        }
        if let Some(src) = self.source(plug) {
            if src.attr.value_type() == ValueType::Vector {
                return Err(self.fail(plug, "vector source feeds a scalar plug"));
            }
            return self.eval_scalar(src, depth + 1);
        }

        let kind = self.node(plug.node)?.kind;
        let input = |attr: Attr| self.eval_scalar(plug.node.plug(attr), depth + 1);
        match (kind, plug.attr) {
            (NodeKind::MultiplyDivide, Attr::OutputX) => {
                let op = input(Attr::Operation)? as i64;
                let a = input(Attr::Input1X)?;
                let b = input(Attr::Input2X)?;
                match MathOperation::from_index(op) {
                    Some(MathOperation::Multiply) => Ok(a * b),
                    Some(MathOperation::Divide) if b == 0.0 => {
                        Err(self.fail(plug, "division by zero"))
                    }
                    Some(MathOperation::Divide) => Ok(a / b),
                    Some(MathOperation::Power) => {
                        let value = a.powf(b);
                        if value.is_finite() {
                            Ok(value)
                        } else {
                            Err(self.fail(plug, format!("{a} ^ {b} is not finite")))
                        }
                    }
                    None => Ok(a),
                }
            }
            (NodeKind::MultDoubleLinear, Attr::Output) => {
                Ok(input(Attr::Input1)? * input(Attr::Input2)?)
            }
            (NodeKind::DistanceBetween, Attr::Distance) => {
                let a = self.eval_vector(plug.node.plug(Attr::Point1), depth + 1)?;
                let b = self.eval_vector(plug.node.plug(Attr::Point2), depth + 1)?;
                Ok((b - a).norm())
            }
            _ => self
                .stored(plug)?
                .as_f64()
                .ok_or_else(|| self.fail(plug, "not a scalar attribute")),
        }
    }

    fn eval_vector(&self, plug: Plug, depth: usize) -> HostResult<Point3<f64>> {
        if depth > MAX_DEPTH {
            return Err(self.fail(plug, "dependency cycle"));
        }
        if let Some(src) = self.source(plug) {
            return self.eval_vector(src, depth + 1);
        }

        let kind = self.node(plug.node)?.kind;
        match (kind, plug.attr) {
            (NodeKind::PointOnCurveInfo, Attr::Position) => {
                let curve_plug = self
                    .source(plug.node.plug(Attr::InputCurve))
                    .ok_or_else(|| self.fail(plug, "no input curve"))?;
                let cvs = self.live_cvs(curve_plug.node)?;
                let parameter = self.eval_scalar(plug.node.plug(Attr::Parameter), depth + 1)?;
                let percentage =
                    self.eval_scalar(plug.node.plug(Attr::TurnOnPercentage), depth + 1)? != 0.0;
                let fraction = if percentage {
                    parameter
                } else {
                    parameter / (cvs.len().max(2) - 1) as f64
                };
                point_at_fraction(&cvs, fraction).ok_or_else(|| self.fail(plug, "empty curve"))
            }
            _ => match self.stored(plug)? {
                Value::Vector(v) => Ok(Point3::from(v)),
                _ => Err(self.fail(plug, "not a vector attribute")),
            },
        }
    }

    /// Deformed CVs in world space.
    fn live_cvs(&self, curve: NodeId) -> HostResult<Vec<Point3<f64>>> {
        let cvs = match &self.node(curve)?.data {
            NodeData::Curve { cvs } => cvs,
            _ => return Err(self.fail(curve.plug(Attr::WorldSpace), "not a curve")),
        };
        let curve_world = self.world_matrix(curve)?;

        let Some(skin) = self.skin_of(curve) else {
            return Ok(cvs.iter().map(|cv| curve_world.transform_point(cv)).collect());
        };
        let deforms = skin
            .influences
            .iter()
            .zip(&skin.bind_inverse)
            .map(|(influence, inverse)| Ok(self.world_matrix(*influence)? * inverse))
            .collect::<HostResult<Vec<Matrix4<f64>>>>()?;

        Ok(cvs
            .iter()
            .zip(&skin.weights)
            .map(|(cv, weights)| {
                let bound = curve_world.transform_point(cv);
                let mut sum = Point3::origin().coords;
                for (deform, weight) in deforms.iter().zip(weights) {
                    sum += deform.transform_point(&bound).coords * *weight;
                }
                Point3::from(sum)
            })
            .collect())
    }
}

/// Point at an arc-length fraction of a polyline, clamped to [0, 1].
pub(crate) fn point_at_fraction(points: &[Point3<f64>], fraction: f64) -> Option<Point3<f64>> {
    let first = *points.first()?;
    let lengths: Vec<f64> = points.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
    let total: f64 = lengths.iter().sum();
    if total <= 0.0 {
        return Some(first);
    }

    let mut remaining = fraction.clamp(0.0, 1.0) * total;
    for (i, length) in lengths.iter().enumerate() {
        if remaining <= *length {
            let t = if *length > 0.0 { remaining / length } else { 0.0 };
            return Some(points[i] + (points[i + 1] - points[i]) * t);
        }
        remaining -= length;
    }
    points.last().copied()
}
