//! The host contract.
//!
//! The generator never evaluates anything itself. It creates nodes, parents
//! them, sets attributes, wires connections and asks for constraints through
//! [`SceneHost`]; the host's own runtime evaluates the resulting network every
//! frame. Nodes and attributes are addressed through typed, non-owning handles
//! ([`NodeId`], [`Attr`], [`Plug`]); the scene owns every node.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HostResult;

// =============================================================================
// Handles
// =============================================================================

/// Opaque handle to a node owned by the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    /// Returns a plug on this node.
    pub fn plug(self, attr: Attr) -> Plug {
        Plug { node: self, attr }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node types the generator creates or consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Joint,
    Transform,
    Locator,
    /// Closed circle curve used as a control shape.
    Circle,
    /// Open spline curve.
    Curve,
    IkHandle,
    IkEffector,
    PointConstraint,
    OrientConstraint,
    AimConstraint,
    SkinCluster,
    RebuildCurve,
    PointOnCurveInfo,
    DistanceBetween,
    MultiplyDivide,
    MultDoubleLinear,
    Condition,
}

impl NodeKind {
    /// Returns true for nodes that live in the transform hierarchy.
    pub fn is_dag(&self) -> bool {
        matches!(
            self,
            NodeKind::Joint
                | NodeKind::Transform
                | NodeKind::Locator
                | NodeKind::Circle
                | NodeKind::Curve
                | NodeKind::IkHandle
                | NodeKind::IkEffector
        )
    }

    /// Returns true for constraint nodes.
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            NodeKind::PointConstraint | NodeKind::OrientConstraint | NodeKind::AimConstraint
        )
    }

    /// Host type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Joint => "joint",
            NodeKind::Transform => "transform",
            NodeKind::Locator => "locator",
            NodeKind::Circle => "circle",
            NodeKind::Curve => "nurbsCurve",
            NodeKind::IkHandle => "ikHandle",
            NodeKind::IkEffector => "ikEffector",
            NodeKind::PointConstraint => "pointConstraint",
            NodeKind::OrientConstraint => "orientConstraint",
            NodeKind::AimConstraint => "aimConstraint",
            NodeKind::SkinCluster => "skinCluster",
            NodeKind::RebuildCurve => "rebuildCurve",
            NodeKind::PointOnCurveInfo => "pointOnCurveInfo",
            NodeKind::DistanceBetween => "distanceBetween",
            NodeKind::MultiplyDivide => "multiplyDivide",
            NodeKind::MultDoubleLinear => "multDoubleLinear",
            NodeKind::Condition => "condition",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Utility (math) node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UtilityKind {
    PointOnCurveInfo,
    DistanceBetween,
    MultiplyDivide,
    MultDoubleLinear,
    Condition,
}

impl From<UtilityKind> for NodeKind {
    fn from(kind: UtilityKind) -> Self {
        match kind {
            UtilityKind::PointOnCurveInfo => NodeKind::PointOnCurveInfo,
            UtilityKind::DistanceBetween => NodeKind::DistanceBetween,
            UtilityKind::MultiplyDivide => NodeKind::MultiplyDivide,
            UtilityKind::MultDoubleLinear => NodeKind::MultDoubleLinear,
            UtilityKind::Condition => NodeKind::Condition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Typed attribute identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attr {
    // Transforms
    Translate(Axis),
    Rotate(Axis),
    Scale(Axis),
    InheritsTransform,
    WorldMatrix,
    // Joints
    Radius,
    // Curves
    WorldSpace,
    Spans,
    Degree,
    // Constraints
    InterpType,
    // pointOnCurveInfo
    InputCurve,
    Parameter,
    TurnOnPercentage,
    Position,
    // distanceBetween
    Point1,
    Point2,
    Distance,
    // multiplyDivide
    Operation,
    Input1X,
    Input2X,
    OutputX,
    // multDoubleLinear
    Input1,
    Input2,
    Output,
    // condition
    OutColorR,
    // IK spline advanced twist
    TwistControlEnable,
    WorldUpType,
    ForwardAxis,
    WorldUpAxis,
    WorldUpVector(Axis),
    WorldUpVectorEnd(Axis),
    WorldUpMatrix,
    WorldUpMatrixEnd,
}

impl Attr {
    /// Host attribute name (e.g. "translateY", "dWorldUpMatrixEnd").
    pub fn name(&self) -> String {
        match self {
            Attr::Translate(a) => format!("translate{}", a.suffix()),
            Attr::Rotate(a) => format!("rotate{}", a.suffix()),
            Attr::Scale(a) => format!("scale{}", a.suffix()),
            Attr::InheritsTransform => "inheritsTransform".into(),
            Attr::WorldMatrix => "worldMatrix".into(),
            Attr::Radius => "radius".into(),
            Attr::WorldSpace => "worldSpace".into(),
            Attr::Spans => "spans".into(),
            Attr::Degree => "degree".into(),
            Attr::InterpType => "interpType".into(),
            Attr::InputCurve => "inputCurve".into(),
            Attr::Parameter => "parameter".into(),
            Attr::TurnOnPercentage => "turnOnPercentage".into(),
            Attr::Position => "position".into(),
            Attr::Point1 => "point1".into(),
            Attr::Point2 => "point2".into(),
            Attr::Distance => "distance".into(),
            Attr::Operation => "operation".into(),
            Attr::Input1X => "input1X".into(),
            Attr::Input2X => "input2X".into(),
            Attr::OutputX => "outputX".into(),
            Attr::Input1 => "input1".into(),
            Attr::Input2 => "input2".into(),
            Attr::Output => "output".into(),
            Attr::OutColorR => "outColorR".into(),
            Attr::TwistControlEnable => "dTwistControlEnable".into(),
            Attr::WorldUpType => "dWorldUpType".into(),
            Attr::ForwardAxis => "dForwardAxis".into(),
            Attr::WorldUpAxis => "dWorldUpAxis".into(),
            Attr::WorldUpVector(a) => format!("dWorldUpVector{}", a.suffix()),
            Attr::WorldUpVectorEnd(a) => format!("dWorldUpVectorEnd{}", a.suffix()),
            Attr::WorldUpMatrix => "dWorldUpMatrix".into(),
            Attr::WorldUpMatrixEnd => "dWorldUpMatrixEnd".into(),
        }
    }

    /// Type of the values this attribute carries.
    pub fn value_type(&self) -> ValueType {
        match self {
            Attr::InheritsTransform | Attr::TurnOnPercentage | Attr::TwistControlEnable => {
                ValueType::Bool
            }
            Attr::Spans
            | Attr::Degree
            | Attr::InterpType
            | Attr::Operation
            | Attr::WorldUpType
            | Attr::ForwardAxis
            | Attr::WorldUpAxis => ValueType::Int,
            Attr::Position | Attr::Point1 | Attr::Point2 => ValueType::Vector,
            Attr::WorldMatrix | Attr::WorldUpMatrix | Attr::WorldUpMatrixEnd => ValueType::Matrix,
            Attr::WorldSpace | Attr::InputCurve => ValueType::Curve,
            _ => ValueType::Float,
        }
    }

    /// Computed attributes can be read and connected from, never set or driven.
    pub fn is_output(&self) -> bool {
        matches!(
            self,
            Attr::WorldMatrix
                | Attr::WorldSpace
                | Attr::Position
                | Attr::Distance
                | Attr::OutputX
                | Attr::Output
        )
    }

    /// Returns true if a node of `kind` has this attribute.
    pub fn applies_to(&self, kind: NodeKind) -> bool {
        match self {
            Attr::Translate(_)
            | Attr::Rotate(_)
            | Attr::Scale(_)
            | Attr::InheritsTransform
            | Attr::WorldMatrix => kind.is_dag(),
            Attr::Radius => kind == NodeKind::Joint,
            Attr::WorldSpace => kind == NodeKind::Curve,
            Attr::Spans | Attr::Degree => {
                matches!(kind, NodeKind::Curve | NodeKind::RebuildCurve)
            }
            Attr::InterpType => kind == NodeKind::OrientConstraint,
            Attr::InputCurve | Attr::Parameter | Attr::TurnOnPercentage | Attr::Position => {
                kind == NodeKind::PointOnCurveInfo
            }
            Attr::Point1 | Attr::Point2 | Attr::Distance => kind == NodeKind::DistanceBetween,
            Attr::Operation | Attr::Input1X | Attr::Input2X | Attr::OutputX => {
                kind == NodeKind::MultiplyDivide
            }
            Attr::Input1 | Attr::Input2 | Attr::Output => kind == NodeKind::MultDoubleLinear,
            Attr::OutColorR => kind == NodeKind::Condition,
            Attr::TwistControlEnable
            | Attr::WorldUpType
            | Attr::ForwardAxis
            | Attr::WorldUpAxis
            | Attr::WorldUpVector(_)
            | Attr::WorldUpVectorEnd(_)
            | Attr::WorldUpMatrix
            | Attr::WorldUpMatrixEnd => kind == NodeKind::IkHandle,
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Attribute value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Float,
    Int,
    Bool,
    Vector,
    Matrix,
    Curve,
}

impl ValueType {
    /// Returns true if a connection from `self` into `dst` is allowed.
    pub fn connects_to(&self, dst: ValueType) -> bool {
        let numeric = |t: ValueType| matches!(t, ValueType::Float | ValueType::Int | ValueType::Bool);
        *self == dst || (numeric(*self) && numeric(dst))
    }
}

/// A settable attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Vector([f64; 3]),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Vector(_) => ValueType::Vector,
        }
    }

    /// Numeric view of a scalar value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Vector(_) => None,
        }
    }

    /// Returns true if this value can be stored in an attribute of type `ty`.
    pub fn fits(&self, ty: ValueType) -> bool {
        match (self, ty) {
            (Value::Vector(_), ValueType::Vector) => true,
            (Value::Vector(_), _) => false,
            (_, ValueType::Float | ValueType::Int | ValueType::Bool) => true,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// A node attribute: the unit of connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Plug {
    pub node: NodeId,
    pub attr: Attr,
}

// =============================================================================
// Operation options
// =============================================================================

/// multiplyDivide operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOperation {
    Multiply,
    Divide,
    Power,
}

impl MathOperation {
    pub fn index(&self) -> i64 {
        match self {
            MathOperation::Multiply => 1,
            MathOperation::Divide => 2,
            MathOperation::Power => 3,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            1 => Some(MathOperation::Multiply),
            2 => Some(MathOperation::Divide),
            3 => Some(MathOperation::Power),
            _ => None,
        }
    }
}

/// Rotation interpolation of a multi-target orient constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpType {
    NoFlip,
    Average,
    Shortest,
    Longest,
}

impl InterpType {
    pub fn index(&self) -> i64 {
        match self {
            InterpType::NoFlip => 0,
            InterpType::Average => 1,
            InterpType::Shortest => 2,
            InterpType::Longest => 3,
        }
    }
}

/// Which parts of a transform `match_transform` copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchFlags {
    pub position: bool,
    pub rotation: bool,
    pub scale: bool,
}

impl MatchFlags {
    pub const POSITION: MatchFlags = MatchFlags {
        position: true,
        rotation: false,
        scale: false,
    };

    /// Position and rotation; scale stays untouched so it never cascades.
    pub const POSITION_ROTATION: MatchFlags = MatchFlags {
        position: true,
        rotation: true,
        scale: false,
    };
}

/// Up-vector source of an aim constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldUp {
    /// Scene +Y.
    Scene,
    /// `vector` expressed in `object`'s rotation space.
    ObjectRotation { object: NodeId, vector: [f64; 3] },
}

/// Aim constraint options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimOptions {
    /// Local axis pointed at the target.
    pub aim_vector: [f64; 3],
    /// Local axis aligned with the world-up direction.
    pub up_vector: [f64; 3],
    pub world_up: WorldUp,
    pub maintain_offset: bool,
}

/// Nodes returned by an IK spline handle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IkSplineHandle {
    pub handle: NodeId,
    pub effector: NodeId,
    pub curve: NodeId,
}

/// Curve rebuild options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildOptions {
    pub spans: u32,
    pub degree: u32,
}

// =============================================================================
// Host trait
// =============================================================================

/// Operations the generator needs from a 3D host.
///
/// Constraint and curve evaluation, skinning and the IK solver belong to the
/// host. Implementations must reject names that are invalid or already in use.
pub trait SceneHost {
    // --- lookup ---

    fn name(&self, node: NodeId) -> HostResult<&str>;
    fn kind(&self, node: NodeId) -> HostResult<NodeKind>;
    fn find(&self, name: &str) -> Option<NodeId>;
    /// Current selection, in selection order.
    fn selection(&self) -> Vec<NodeId>;
    fn parent(&self, node: NodeId) -> HostResult<Option<NodeId>>;
    fn children(&self, node: NodeId) -> HostResult<Vec<NodeId>>;
    /// Nodes of `kind` feeding any attribute of `node`.
    fn source_nodes(&self, node: NodeId, kind: NodeKind) -> HostResult<Vec<NodeId>>;

    // --- creation ---

    /// Duplicates a transform node without its children, under the same parent.
    fn duplicate(&mut self, source: NodeId, name: &str) -> HostResult<NodeId>;
    /// Creates an empty transform at the world origin.
    fn create_group(&mut self, name: &str) -> HostResult<NodeId>;
    fn create_locator(&mut self, name: &str) -> HostResult<NodeId>;
    fn create_circle(&mut self, name: &str, normal: [f64; 3], radius: f64) -> HostResult<NodeId>;
    fn create_utility(&mut self, kind: UtilityKind, name: &str) -> HostResult<NodeId>;
    fn rename(&mut self, node: NodeId, name: &str) -> HostResult<()>;

    // --- hierarchy and transforms ---

    /// Parents `child` under `parent` (or the world), preserving its world transform.
    fn reparent(&mut self, child: NodeId, parent: Option<NodeId>) -> HostResult<()>;
    fn match_transform(&mut self, target: NodeId, source: NodeId, flags: MatchFlags)
        -> HostResult<()>;
    /// Bakes scale into the node so its scale reads 1.
    fn freeze_scale(&mut self, node: NodeId) -> HostResult<()>;
    /// Zeroes translation and rotation and sets scale to 1.
    fn reset_transform(&mut self, node: NodeId) -> HostResult<()>;

    // --- attributes ---

    fn get_attr(&self, plug: Plug) -> HostResult<Value>;
    fn set_attr(&mut self, plug: Plug, value: Value) -> HostResult<()>;
    /// Connects `src` into `dst`, replacing any existing input of `dst`.
    fn connect(&mut self, src: Plug, dst: Plug) -> HostResult<()>;

    // --- constraints ---

    fn point_constraint(
        &mut self,
        name: &str,
        targets: &[NodeId],
        driven: NodeId,
        maintain_offset: bool,
    ) -> HostResult<NodeId>;
    fn orient_constraint(
        &mut self,
        name: &str,
        targets: &[NodeId],
        driven: NodeId,
        maintain_offset: bool,
    ) -> HostResult<NodeId>;
    fn aim_constraint(
        &mut self,
        name: &str,
        target: NodeId,
        driven: NodeId,
        options: AimOptions,
    ) -> HostResult<NodeId>;

    // --- curves and IK ---

    /// Creates an IK spline handle from `start` to `end`, with a curve through the chain.
    fn create_ik_spline(&mut self, name: &str, start: NodeId, end: NodeId)
        -> HostResult<IkSplineHandle>;
    /// Smooth-binds a curve to influence joints.
    fn skin_curve(&mut self, name: &str, curve: NodeId, influences: &[NodeId])
        -> HostResult<NodeId>;
    fn rebuild_curve(&mut self, name: &str, curve: NodeId, options: RebuildOptions)
        -> HostResult<NodeId>;

    // --- feedback ---

    /// Host-level informational message.
    fn display_info(&mut self, message: &str);
}
