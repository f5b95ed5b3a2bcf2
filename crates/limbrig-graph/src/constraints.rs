//! Constraint wiring.
//!
//! Constraint names are derived from the driven node's name.

use limbrig_spec::naming::{self, ConstraintSuffix};

use crate::error::RigResult;
use crate::host::{AimOptions, Attr, InterpType, NodeId, SceneHost, Value, WorldUp};

/// Local +X, the up axis of every aim in the rig.
pub const UP_AXIS: [f64; 3] = [1.0, 0.0, 0.0];

/// Position-only tracking of one or more targets.
pub fn point(host: &mut dyn SceneHost, targets: &[NodeId], driven: NodeId) -> RigResult<NodeId> {
    let name = naming::constraint(host.name(driven)?, ConstraintSuffix::Point);
    Ok(host.point_constraint(&name, targets, driven, false)?)
}

/// Orientation blend of `targets` with shortest-path interpolation.
pub fn orient_blend(
    host: &mut dyn SceneHost,
    targets: &[NodeId],
    driven: NodeId,
    maintain_offset: bool,
) -> RigResult<NodeId> {
    let name = naming::constraint(host.name(driven)?, ConstraintSuffix::Orient);
    let constraint = host.orient_constraint(&name, targets, driven, maintain_offset)?;
    host.set_attr(
        constraint.plug(Attr::InterpType),
        Value::Int(InterpType::Shortest.index()),
    )?;
    Ok(constraint)
}

/// Aims `aim_vector` of `driven` at `target`, with local +X leaning toward
/// `up_object`'s +X.
pub fn aim_at(
    host: &mut dyn SceneHost,
    target: NodeId,
    driven: NodeId,
    aim_vector: [f64; 3],
    up_object: NodeId,
) -> RigResult<NodeId> {
    let name = naming::constraint(host.name(driven)?, ConstraintSuffix::Aim);
    let options = AimOptions {
        aim_vector,
        up_vector: UP_AXIS,
        world_up: WorldUp::ObjectRotation {
            object: up_object,
            vector: UP_AXIS,
        },
        maintain_offset: false,
    };
    Ok(host.aim_constraint(&name, target, driven, options)?)
}
