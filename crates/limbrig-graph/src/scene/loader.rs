//! Builds a [`SceneGraph`] from a skeleton description.

use limbrig_spec::{SkeletonDesc, TransformKind};
use tracing::debug;

use super::transform::LocalTransform;
use super::SceneGraph;
use crate::error::{RigError, RigResult};
use crate::host::{Attr, Axis, NodeId, SceneHost, UtilityKind, Value};

/// Suffix of the condition node standing in for an upstream stretchy-FK setup.
pub const STRETCH_CONDITION_SUFFIX: &str = "stretch_condition";

/// Loads a skeleton description into a fresh scene.
///
/// Joints with a stretch ratio get a `condition` node driving their scaleY.
/// The master scale control becomes a group with a uniform scale.
pub fn load_skeleton(desc: &SkeletonDesc) -> RigResult<SceneGraph> {
    desc.validate()?;
    let mut scene = SceneGraph::new();

    for joint in &desc.joints {
        let parent = match &joint.parent {
            Some(name) => Some(
                scene
                    .find(name)
                    .ok_or_else(|| RigError::Skeleton(format!("unknown parent '{name}'")))?,
            ),
            None => None,
        };
        let id = match joint.kind {
            TransformKind::Joint => scene.create_joint(&joint.name, parent, joint.translate)?,
            TransformKind::Transform => {
                scene.create_transform(&joint.name, parent, joint.translate)?
            }
        };
        scene.node_mut(id)?.local =
            LocalTransform::from_translate_rotate(joint.translate, joint.rotate);
        if joint.kind == TransformKind::Joint {
            scene.set_attr(id.plug(Attr::Radius), Value::Float(joint.radius))?;
        }

        if let Some(ratio) = joint.stretch_ratio {
            let condition = scene.create_utility(
                UtilityKind::Condition,
                &format!("{}_{STRETCH_CONDITION_SUFFIX}", joint.name),
            )?;
            scene.set_attr(condition.plug(Attr::OutColorR), Value::Float(ratio))?;
            scene.connect(condition.plug(Attr::OutColorR), id.plug(Attr::Scale(Axis::Y)))?;
        }
    }

    if let Some(master) = &desc.master_scale {
        let id = scene.create_group(&master.name)?;
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            scene.set_attr(id.plug(Attr::Scale(axis)), Value::Float(master.scale))?;
        }
    }

    let selection = desc
        .selection
        .iter()
        .map(|name| {
            scene
                .find(name)
                .ok_or_else(|| RigError::Skeleton(format!("unknown selected node '{name}'")))
        })
        .collect::<RigResult<Vec<NodeId>>>()?;
    scene.select(&selection)?;

    debug!(
        nodes = scene.len(),
        selected = selection.len(),
        "skeleton loaded"
    );
    Ok(scene)
}
