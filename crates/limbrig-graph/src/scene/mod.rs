//! In-memory reference host.
//!
//! [`SceneGraph`] implements [`SceneHost`] well enough to build, inspect and
//! evaluate a limb rig without a 3D application:
//!
//! - names are unique and must be valid identifiers
//! - reparenting preserves world transforms
//! - constraints snap their driven node once, when they are created
//! - curves keep their CVs in local space and deform through their skin cluster
//! - the math-node network is evaluated on demand by [`SceneGraph::evaluate`]
//!
//! Transform evaluation reads the stored channel values; channels driven by a
//! connection are resolved through the evaluator.

mod eval;
mod loader;
mod manifest;
pub mod transform;

use std::collections::BTreeMap;

use limbrig_spec::is_valid_node_name;
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use tracing::{debug, info};

use crate::error::{HostError, HostResult};
use crate::host::{
    AimOptions, Attr, IkSplineHandle, MatchFlags, NodeId, NodeKind, Plug, RebuildOptions,
    SceneHost, UtilityKind, Value, ValueType, WorldUp,
};
use transform::{aim_rotation, blend_rotations, compose, decompose, position, LocalTransform};

pub use loader::load_skeleton;
pub use manifest::{ConnectionEntry, ConstraintEntry, NodeEntry, SubtreeManifest};

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeData {
    None,
    Circle {
        normal: [f64; 3],
        radius: f64,
    },
    /// Open curve with CVs in local space.
    Curve {
        cvs: Vec<Point3<f64>>,
    },
    IkHandle {
        start: NodeId,
        end: NodeId,
        effector: NodeId,
        curve: NodeId,
    },
    Constraint {
        targets: Vec<NodeId>,
        driven: NodeId,
        maintain_offset: bool,
    },
    Skin(SkinBinding),
    Rebuild {
        curve: NodeId,
    },
}

/// Smooth bind of a curve to influence transforms.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SkinBinding {
    pub curve: NodeId,
    pub influences: Vec<NodeId>,
    /// Inverse world matrix of each influence at bind time.
    pub bind_inverse: Vec<Matrix4<f64>>,
    /// Per-CV influence weights, each row summing to 1.
    pub weights: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: LocalTransform,
    pub attrs: BTreeMap<Attr, Value>,
    pub data: NodeData,
}

impl Node {
    fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            parent: None,
            children: Vec::new(),
            local: LocalTransform::identity(),
            attrs: BTreeMap::new(),
            data: NodeData::None,
        }
    }
}

/// Default value of a stored attribute.
fn default_value(attr: Attr) -> Value {
    match attr {
        Attr::Radius | Attr::Input2X | Attr::Input2 => Value::Float(1.0),
        Attr::Degree => Value::Int(3),
        Attr::Spans => Value::Int(1),
        Attr::InterpType | Attr::Operation => Value::Int(1),
        Attr::TurnOnPercentage | Attr::TwistControlEnable => Value::Bool(false),
        Attr::Point1 | Attr::Point2 | Attr::Position => Value::Vector([0.0; 3]),
        _ => match attr.value_type() {
            ValueType::Int => Value::Int(0),
            ValueType::Bool => Value::Bool(false),
            _ => Value::Float(0.0),
        },
    }
}

/// Converts a value to the storage type of an attribute.
fn coerce(value: Value, ty: ValueType) -> Value {
    match (value, ty) {
        (Value::Vector(v), _) => Value::Vector(v),
        (v, ValueType::Int) => Value::Int(v.as_f64().map(|f| f.round() as i64).unwrap_or(0)),
        (v, ValueType::Bool) => Value::Bool(v.as_f64().is_some_and(|f| f != 0.0)),
        (v, _) => Value::Float(v.as_f64().unwrap_or(0.0)),
    }
}

/// In-memory scene implementing [`SceneHost`].
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    names: BTreeMap<String, NodeId>,
    /// Incoming connection of each driven plug (destination -> source).
    connections: BTreeMap<Plug, Plug>,
    selection: Vec<NodeId>,
    messages: Vec<String>,
}

impl SceneGraph {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the scene.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Informational messages reported through `display_info`.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Iterates over every node handle, in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId::new)
    }

    /// Replaces the selection.
    pub fn select(&mut self, nodes: &[NodeId]) -> HostResult<()> {
        for node in nodes {
            self.node(*node)?;
        }
        self.selection = nodes.to_vec();
        Ok(())
    }

    /// Creates a joint under `parent` with a local translation.
    pub fn create_joint(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        translate: [f64; 3],
    ) -> HostResult<NodeId> {
        let id = self.insert(Node::new(name, NodeKind::Joint))?;
        if let Some(parent) = parent {
            self.attach(id, parent)?;
        }
        self.node_mut(id)?.local.translation = Vector3::from(translate);
        Ok(id)
    }

    /// Creates a plain transform under `parent` with a local translation.
    pub fn create_transform(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        translate: [f64; 3],
    ) -> HostResult<NodeId> {
        let id = self.insert(Node::new(name, NodeKind::Transform))?;
        if let Some(parent) = parent {
            self.attach(id, parent)?;
        }
        self.node_mut(id)?.local.translation = Vector3::from(translate);
        Ok(id)
    }

    /// Returns the source plug connected into `plug`, if any.
    pub fn source(&self, plug: Plug) -> Option<Plug> {
        self.connections.get(&plug).copied()
    }

    /// Plugs driven by `plug`.
    pub fn destinations(&self, plug: Plug) -> Vec<Plug> {
        self.connections
            .iter()
            .filter(|(_, src)| **src == plug)
            .map(|(dst, _)| *dst)
            .collect()
    }

    /// Every connection as (source, destination).
    pub fn connections(&self) -> impl Iterator<Item = (Plug, Plug)> + '_ {
        self.connections.iter().map(|(dst, src)| (*src, *dst))
    }

    /// All descendants of `node`, depth first, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> HostResult<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(node)?.children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.node(next)?.children.iter().rev().copied());
        }
        Ok(out)
    }

    /// World matrix of a transform node.
    pub fn world_matrix(&self, node: NodeId) -> HostResult<Matrix4<f64>> {
        let n = self.node(node)?;
        let local = n.local.matrix();
        match n.parent {
            Some(parent) if n.local.inherits => Ok(self.world_matrix(parent)? * local),
            _ => Ok(local),
        }
    }

    /// World position of a transform node.
    pub fn world_position(&self, node: NodeId) -> HostResult<[f64; 3]> {
        let p = position(&self.world_matrix(node)?);
        Ok([p.x, p.y, p.z])
    }

    /// World rotation of a transform node.
    pub fn world_rotation(&self, node: NodeId) -> HostResult<UnitQuaternion<f64>> {
        Ok(decompose(&self.world_matrix(node)?).1)
    }

    /// Constraint targets and driven node, if `node` is a constraint.
    pub fn constraint_targets(&self, node: NodeId) -> HostResult<Option<(Vec<NodeId>, NodeId)>> {
        match &self.node(node)?.data {
            NodeData::Constraint {
                targets, driven, ..
            } => Ok(Some((targets.clone(), *driven))),
            _ => Ok(None),
        }
    }

    /// Constraint nodes driving `node`.
    pub fn constraints_on(&self, node: NodeId) -> Vec<NodeId> {
        self.node_ids()
            .filter(|id| {
                matches!(
                    self.nodes[id.index() as usize].data,
                    NodeData::Constraint { driven, .. } if driven == node
                )
            })
            .collect()
    }

    /// Influences of the skin cluster bound to `curve`.
    pub fn skin_influences(&self, curve: NodeId) -> Vec<NodeId> {
        self.skin_of(curve)
            .map(|skin| skin.influences.clone())
            .unwrap_or_default()
    }

    /// CV count of a curve node.
    pub fn curve_cv_count(&self, curve: NodeId) -> HostResult<usize> {
        match &self.node(curve)?.data {
            NodeData::Curve { cvs } => Ok(cvs.len()),
            _ => Err(self.mismatch(curve, Attr::WorldSpace)),
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    pub(crate) fn node(&self, id: NodeId) -> HostResult<&Node> {
        self.nodes
            .get(id.index() as usize)
            .ok_or(HostError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> HostResult<&mut Node> {
        self.nodes
            .get_mut(id.index() as usize)
            .ok_or(HostError::NodeNotFound(id))
    }

    pub(crate) fn name_of(&self, id: NodeId) -> String {
        self.node(id)
            .map(|n| n.name.clone())
            .unwrap_or_else(|_| id.to_string())
    }

    pub(crate) fn plug_name(&self, plug: Plug) -> String {
        format!("{}.{}", self.name_of(plug.node), plug.attr)
    }

    fn mismatch(&self, node: NodeId, attr: Attr) -> HostError {
        match self.node(node) {
            Ok(n) => HostError::AttributeMismatch {
                node: n.name.clone(),
                kind: n.kind,
                attr,
            },
            Err(err) => err,
        }
    }

    fn check_name(&self, name: &str) -> HostResult<()> {
        if !is_valid_node_name(name) {
            return Err(HostError::InvalidName(name.to_string()));
        }
        if self.names.contains_key(name) {
            return Err(HostError::NameCollision(name.to_string()));
        }
        Ok(())
    }

    fn insert(&mut self, node: Node) -> HostResult<NodeId> {
        self.check_name(&node.name)?;
        let id = NodeId::new(self.nodes.len() as u32);
        self.names.insert(node.name.clone(), id);
        self.nodes.push(node);
        Ok(id)
    }

    /// First free `<base><n>` name, starting at 1.
    fn auto_name(&self, base: &str) -> String {
        (1..)
            .map(|i| format!("{base}{i}"))
            .find(|name| !self.names.contains_key(name))
            .unwrap_or_else(|| base.to_string())
    }

    fn require_dag(&self, node: NodeId) -> HostResult<()> {
        let n = self.node(node)?;
        if n.kind.is_dag() {
            Ok(())
        } else {
            Err(self.mismatch(node, Attr::WorldMatrix))
        }
    }

    /// Links `child` under `parent` without touching its local transform.
    fn attach(&mut self, child: NodeId, parent: NodeId) -> HostResult<()> {
        self.require_dag(parent)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn detach(&mut self, child: NodeId) -> HostResult<()> {
        if let Some(parent) = self.node(child)?.parent {
            self.node_mut(parent)?.children.retain(|c| *c != child);
            self.node_mut(child)?.parent = None;
        }
        Ok(())
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> HostResult<bool> {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.node(id)?.parent;
        }
        Ok(false)
    }

    /// Sets the local transform so the node's world matrix equals `world`.
    fn set_world_matrix(&mut self, node: NodeId, world: &Matrix4<f64>) -> HostResult<()> {
        let n = self.node(node)?;
        let local = match n.parent {
            Some(parent) if n.local.inherits => {
                let parent_world = self.world_matrix(parent)?;
                let inverse = parent_world.try_inverse().ok_or_else(|| {
                    HostError::evaluation(self.name_of(parent), "singular world matrix")
                })?;
                inverse * world
            }
            _ => *world,
        };
        self.node_mut(node)?.local.set_matrix(&local);
        Ok(())
    }

    fn skin_of(&self, curve: NodeId) -> Option<&SkinBinding> {
        self.nodes.iter().find_map(|n| match &n.data {
            NodeData::Skin(skin) if skin.curve == curve => Some(skin),
            _ => None,
        })
    }

    fn create_constraint(
        &mut self,
        kind: NodeKind,
        name: &str,
        targets: &[NodeId],
        driven: NodeId,
        maintain_offset: bool,
    ) -> HostResult<NodeId> {
        self.require_dag(driven)?;
        if targets.is_empty() {
            return Err(HostError::not_connectable(
                "",
                self.name_of(driven),
                "constraint needs at least one target",
            ));
        }
        for target in targets {
            self.require_dag(*target)?;
        }
        let mut node = Node::new(name, kind);
        node.data = NodeData::Constraint {
            targets: targets.to_vec(),
            driven,
            maintain_offset,
        };
        let id = self.insert(node)?;
        debug!(
            constraint = name,
            kind = %kind,
            driven = %self.name_of(driven),
            targets = targets.len(),
            "constraint created"
        );
        Ok(id)
    }

    fn stored(&self, plug: Plug) -> HostResult<Value> {
        let node = self.node(plug.node)?;
        let local = &node.local;
        let value = match plug.attr {
            Attr::Translate(axis) => Value::Float(local.translation[axis.index()]),
            Attr::Rotate(axis) => Value::Float(local.rotate_degrees()[axis.index()]),
            Attr::Scale(axis) => Value::Float(local.scale[axis.index()]),
            Attr::InheritsTransform => Value::Bool(local.inherits),
            attr => match attr.value_type() {
                ValueType::Matrix | ValueType::Curve => {
                    return Err(HostError::InvalidValue {
                        node: node.name.clone(),
                        attr,
                        reason: format!("{} attributes can only be connected", type_label(attr)),
                    })
                }
                _ => node
                    .attrs
                    .get(&attr)
                    .copied()
                    .unwrap_or_else(|| default_value(attr)),
            },
        };
        Ok(value)
    }

    fn check_attr(&self, plug: Plug) -> HostResult<()> {
        let kind = self.node(plug.node)?.kind;
        if plug.attr.applies_to(kind) {
            Ok(())
        } else {
            Err(self.mismatch(plug.node, plug.attr))
        }
    }
}

fn type_label(attr: Attr) -> &'static str {
    match attr.value_type() {
        ValueType::Matrix => "matrix",
        ValueType::Curve => "curve",
        ValueType::Vector => "vector",
        _ => "scalar",
    }
}

impl SceneHost for SceneGraph {
    fn name(&self, node: NodeId) -> HostResult<&str> {
        Ok(&self.node(node)?.name)
    }

    fn kind(&self, node: NodeId) -> HostResult<NodeKind> {
        Ok(self.node(node)?.kind)
    }

    fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }

    fn parent(&self, node: NodeId) -> HostResult<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    fn children(&self, node: NodeId) -> HostResult<Vec<NodeId>> {
        Ok(self.node(node)?.children.clone())
    }

    fn source_nodes(&self, node: NodeId, kind: NodeKind) -> HostResult<Vec<NodeId>> {
        self.node(node)?;
        let mut sources: Vec<NodeId> = Vec::new();
        for (dst, src) in &self.connections {
            if dst.node == node && self.node(src.node)?.kind == kind && !sources.contains(&src.node)
            {
                sources.push(src.node);
            }
        }
        Ok(sources)
    }

    fn duplicate(&mut self, source: NodeId, name: &str) -> HostResult<NodeId> {
        self.require_dag(source)?;
        let original = self.node(source)?;
        let mut copy = Node::new(name, original.kind);
        copy.local = original.local;
        copy.attrs = original.attrs.clone();
        if let NodeData::Circle { .. } = original.data {
            copy.data = original.data.clone();
        }
        let parent = original.parent;
        let id = self.insert(copy)?;
        if let Some(parent) = parent {
            self.attach(id, parent)?;
        }
        Ok(id)
    }

    fn create_group(&mut self, name: &str) -> HostResult<NodeId> {
        self.insert(Node::new(name, NodeKind::Transform))
    }

    fn create_locator(&mut self, name: &str) -> HostResult<NodeId> {
        self.insert(Node::new(name, NodeKind::Locator))
    }

    fn create_circle(&mut self, name: &str, normal: [f64; 3], radius: f64) -> HostResult<NodeId> {
        let mut node = Node::new(name, NodeKind::Circle);
        node.data = NodeData::Circle { normal, radius };
        self.insert(node)
    }

    fn create_utility(&mut self, kind: UtilityKind, name: &str) -> HostResult<NodeId> {
        self.insert(Node::new(name, kind.into()))
    }

    fn rename(&mut self, node: NodeId, name: &str) -> HostResult<()> {
        let old = self.node(node)?.name.clone();
        if old == name {
            return Ok(());
        }
        self.check_name(name)?;
        self.names.remove(&old);
        self.names.insert(name.to_string(), node);
        self.node_mut(node)?.name = name.to_string();
        Ok(())
    }

    fn reparent(&mut self, child: NodeId, parent: Option<NodeId>) -> HostResult<()> {
        self.require_dag(child)?;
        let world = self.world_matrix(child)?;
        if let Some(parent) = parent {
            self.require_dag(parent)?;
            if self.is_ancestor(child, parent)? {
                return Err(HostError::ParentCycle {
                    child: self.name_of(child),
                    parent: self.name_of(parent),
                });
            }
        }
        self.detach(child)?;
        if let Some(parent) = parent {
            self.attach(child, parent)?;
        }
        self.set_world_matrix(child, &world)
    }

    fn match_transform(
        &mut self,
        target: NodeId,
        source: NodeId,
        flags: MatchFlags,
    ) -> HostResult<()> {
        self.require_dag(target)?;
        self.require_dag(source)?;
        let (t, r, s) = decompose(&self.world_matrix(target)?);
        let (st, sr, ss) = decompose(&self.world_matrix(source)?);
        let world = compose(
            if flags.position { &st } else { &t },
            if flags.rotation { &sr } else { &r },
            if flags.scale { &ss } else { &s },
        );
        self.set_world_matrix(target, &world)
    }

    fn freeze_scale(&mut self, node: NodeId) -> HostResult<()> {
        self.require_dag(node)?;
        let scale = self.node(node)?.local.scale;
        let children = self.node(node)?.children.clone();
        for child in children {
            let local = &mut self.node_mut(child)?.local;
            local.translation.component_mul_assign(&scale);
        }
        self.node_mut(node)?.local.scale = Vector3::new(1.0, 1.0, 1.0);
        Ok(())
    }

    fn reset_transform(&mut self, node: NodeId) -> HostResult<()> {
        self.require_dag(node)?;
        self.node_mut(node)?.local.reset();
        Ok(())
    }

    fn get_attr(&self, plug: Plug) -> HostResult<Value> {
        self.check_attr(plug)?;
        let ty = plug.attr.value_type();
        if self.connections.contains_key(&plug) || plug.attr.is_output() {
            return match ty {
                ValueType::Vector => Ok(Value::Vector(self.evaluate_vector(plug)?)),
                ValueType::Matrix | ValueType::Curve => self.stored(plug),
                _ => Ok(coerce(Value::Float(self.evaluate(plug)?), ty)),
            };
        }
        self.stored(plug)
    }

    fn set_attr(&mut self, plug: Plug, value: Value) -> HostResult<()> {
        self.check_attr(plug)?;
        let attr = plug.attr;
        let ty = attr.value_type();
        let invalid = |reason: &str| HostError::InvalidValue {
            node: self.name_of(plug.node),
            attr,
            reason: reason.to_string(),
        };
        if attr.is_output() {
            return Err(invalid("attribute is computed"));
        }
        if self.connections.contains_key(&plug) {
            return Err(invalid("attribute is driven by a connection"));
        }
        if !value.fits(ty) {
            return Err(invalid("value type does not fit the attribute"));
        }
        let value = coerce(value, ty);

        let node = self.node_mut(plug.node)?;
        match (attr, value) {
            (Attr::Translate(axis), Value::Float(v)) => node.local.translation[axis.index()] = v,
            (Attr::Rotate(axis), Value::Float(v)) => node.local.set_rotate_degrees(axis.index(), v),
            (Attr::Scale(axis), Value::Float(v)) => node.local.scale[axis.index()] = v,
            (Attr::InheritsTransform, Value::Bool(v)) => node.local.inherits = v,
            (attr, value) => {
                node.attrs.insert(attr, value);
            }
        }
        Ok(())
    }

    fn connect(&mut self, src: Plug, dst: Plug) -> HostResult<()> {
        self.check_attr(src)?;
        self.check_attr(dst)?;
        let refuse = |reason: &str| {
            HostError::not_connectable(self.plug_name(src), self.plug_name(dst), reason)
        };
        if src == dst {
            return Err(refuse("a plug cannot drive itself"));
        }
        if dst.attr.is_output() {
            return Err(refuse("destination is a computed attribute"));
        }
        if !src.attr.value_type().connects_to(dst.attr.value_type()) {
            return Err(refuse("attribute types are incompatible"));
        }
        self.connections.insert(dst, src);
        Ok(())
    }

    fn point_constraint(
        &mut self,
        name: &str,
        targets: &[NodeId],
        driven: NodeId,
        maintain_offset: bool,
    ) -> HostResult<NodeId> {
        let id =
            self.create_constraint(NodeKind::PointConstraint, name, targets, driven, maintain_offset)?;
        if !maintain_offset {
            let mut sum = Vector3::zeros();
            for target in targets {
                sum += position(&self.world_matrix(*target)?).coords;
            }
            let (_, r, s) = decompose(&self.world_matrix(driven)?);
            let world = compose(&(sum / targets.len() as f64), &r, &s);
            self.set_world_matrix(driven, &world)?;
        }
        Ok(id)
    }

    fn orient_constraint(
        &mut self,
        name: &str,
        targets: &[NodeId],
        driven: NodeId,
        maintain_offset: bool,
    ) -> HostResult<NodeId> {
        let id = self.create_constraint(
            NodeKind::OrientConstraint,
            name,
            targets,
            driven,
            maintain_offset,
        )?;
        if !maintain_offset {
            let rotations = targets
                .iter()
                .map(|t| self.world_rotation(*t))
                .collect::<HostResult<Vec<_>>>()?;
            let (t, _, s) = decompose(&self.world_matrix(driven)?);
            let world = compose(&t, &blend_rotations(&rotations), &s);
            self.set_world_matrix(driven, &world)?;
        }
        Ok(id)
    }

    fn aim_constraint(
        &mut self,
        name: &str,
        target: NodeId,
        driven: NodeId,
        options: AimOptions,
    ) -> HostResult<NodeId> {
        let id = self.create_constraint(
            NodeKind::AimConstraint,
            name,
            &[target],
            driven,
            options.maintain_offset,
        )?;
        if let WorldUp::ObjectRotation { object, .. } = options.world_up {
            self.require_dag(object)?;
        }
        if !options.maintain_offset {
            let (t, r, s) = decompose(&self.world_matrix(driven)?);
            let direction = position(&self.world_matrix(target)?).coords - t;
            let world_up = match options.world_up {
                WorldUp::Scene => Vector3::y(),
                WorldUp::ObjectRotation { object, vector } => {
                    self.world_rotation(object)? * Vector3::from(vector)
                }
            };
            let rotation = aim_rotation(
                &direction,
                &world_up,
                &Vector3::from(options.aim_vector),
                &Vector3::from(options.up_vector),
            )
            .unwrap_or(r);
            self.set_world_matrix(driven, &compose(&t, &rotation, &s))?;
        }
        Ok(id)
    }

    fn create_ik_spline(
        &mut self,
        name: &str,
        start: NodeId,
        end: NodeId,
    ) -> HostResult<IkSplineHandle> {
        let invalid = || HostError::InvalidChain {
            start: self.name_of(start),
            end: self.name_of(end),
        };
        for joint in [start, end] {
            if self.kind(joint)? != NodeKind::Joint {
                return Err(invalid());
            }
        }
        let mut chain = vec![end];
        let mut current = end;
        while current != start {
            current = self.node(current)?.parent.ok_or_else(invalid)?;
            chain.push(current);
        }
        if chain.len() < 2 {
            return Err(invalid());
        }
        chain.reverse();

        let cvs = chain
            .iter()
            .map(|j| Ok(position(&self.world_matrix(*j)?)))
            .collect::<HostResult<Vec<_>>>()?;
        let end_world = self.world_matrix(end)?;

        let mut handle_node = Node::new(name, NodeKind::IkHandle);
        handle_node.local.set_matrix(&end_world);
        let handle = self.insert(handle_node)?;

        let effector_name = self.auto_name("effector");
        let effector = self.insert(Node::new(&effector_name, NodeKind::IkEffector))?;
        if let Some(parent) = self.node(end)?.parent {
            self.attach(effector, parent)?;
        }
        self.set_world_matrix(effector, &end_world)?;

        let curve_name = self.auto_name("curve");
        let spans = cvs.len() as i64 - 1;
        let mut curve_node = Node::new(&curve_name, NodeKind::Curve);
        curve_node.data = NodeData::Curve { cvs };
        curve_node.attrs.insert(Attr::Spans, Value::Int(spans));
        let curve = self.insert(curve_node)?;

        self.node_mut(handle)?.data = NodeData::IkHandle {
            start,
            end,
            effector,
            curve,
        };
        debug!(handle = name, joints = chain.len(), "ik spline created");
        Ok(IkSplineHandle {
            handle,
            effector,
            curve,
        })
    }

    fn skin_curve(
        &mut self,
        name: &str,
        curve: NodeId,
        influences: &[NodeId],
    ) -> HostResult<NodeId> {
        let cvs = match &self.node(curve)?.data {
            NodeData::Curve { cvs } => cvs.clone(),
            _ => return Err(self.mismatch(curve, Attr::WorldSpace)),
        };
        if influences.is_empty() {
            return Err(HostError::not_connectable(
                "",
                self.name_of(curve),
                "skin cluster needs at least one influence",
            ));
        }
        let curve_world = self.world_matrix(curve)?;
        let mut bind_inverse = Vec::with_capacity(influences.len());
        let mut bind_positions = Vec::with_capacity(influences.len());
        for influence in influences {
            if self.kind(*influence)? != NodeKind::Joint {
                return Err(self.mismatch(*influence, Attr::Radius));
            }
            let world = self.world_matrix(*influence)?;
            bind_positions.push(position(&world));
            bind_inverse.push(world.try_inverse().ok_or_else(|| {
                HostError::evaluation(self.name_of(*influence), "singular world matrix")
            })?);
        }

        let weights = cvs
            .iter()
            .map(|cv| {
                let world_cv = curve_world.transform_point(cv);
                inverse_distance_weights(&world_cv, &bind_positions)
            })
            .collect();

        let mut node = Node::new(name, NodeKind::SkinCluster);
        node.data = NodeData::Skin(SkinBinding {
            curve,
            influences: influences.to_vec(),
            bind_inverse,
            weights,
        });
        self.insert(node)
    }

    fn rebuild_curve(
        &mut self,
        name: &str,
        curve: NodeId,
        options: RebuildOptions,
    ) -> HostResult<NodeId> {
        if self.kind(curve)? != NodeKind::Curve {
            return Err(self.mismatch(curve, Attr::Spans));
        }
        let mut node = Node::new(name, NodeKind::RebuildCurve);
        node.data = NodeData::Rebuild { curve };
        node.attrs.insert(Attr::Spans, Value::Int(options.spans as i64));
        node.attrs.insert(Attr::Degree, Value::Int(options.degree as i64));
        let id = self.insert(node)?;

        let attrs = &mut self.node_mut(curve)?.attrs;
        attrs.insert(Attr::Spans, Value::Int(options.spans as i64));
        attrs.insert(Attr::Degree, Value::Int(options.degree as i64));
        Ok(id)
    }

    fn display_info(&mut self, message: &str) {
        info!("{message}");
        self.messages.push(message.to_string());
    }
}

/// Normalised inverse-square-distance weights; a coincident influence takes all weight.
fn inverse_distance_weights(point: &Point3<f64>, influences: &[Point3<f64>]) -> Vec<f64> {
    let distances: Vec<f64> = influences
        .iter()
        .map(|p| (p - point).norm_squared())
        .collect();
    if let Some(hit) = distances.iter().position(|d| *d < 1e-12) {
        return (0..influences.len())
            .map(|i| if i == hit { 1.0 } else { 0.0 })
            .collect();
    }
    let raw: Vec<f64> = distances.iter().map(|d| 1.0 / d).collect();
    let total: f64 = raw.iter().sum();
    raw.iter().map(|w| w / total).collect()
}
