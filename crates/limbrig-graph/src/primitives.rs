//! Positioned and parented transform nodes.

use limbrig_spec::naming;
use tracing::debug;

use crate::error::RigResult;
use crate::host::{Attr, MatchFlags, NodeId, SceneHost, Value};

/// A node wrapped 1:1 by its offset group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub group: NodeId,
    pub node: NodeId,
}

/// Duplicates a joint without its children and gives it a display radius.
///
/// Scale is frozen so the copy never inherits the source's stretch.
pub fn duplicate_joint(
    host: &mut dyn SceneHost,
    source: NodeId,
    name: &str,
    radius: f64,
) -> RigResult<NodeId> {
    let joint = host.duplicate(source, name)?;
    host.set_attr(joint.plug(Attr::Radius), Value::Float(radius))?;
    host.freeze_scale(joint)?;
    Ok(joint)
}

/// Empty group at the world origin.
pub fn empty_group(host: &mut dyn SceneHost, name: &str) -> RigResult<NodeId> {
    Ok(host.create_group(name)?)
}

/// Empty group placed at `target`'s position and rotation, with unit scale.
pub fn aligned_group(host: &mut dyn SceneHost, name: &str, target: NodeId) -> RigResult<NodeId> {
    let group = host.create_group(name)?;
    host.match_transform(group, target, MatchFlags::POSITION_ROTATION)?;
    host.freeze_scale(group)?;
    Ok(group)
}

/// Wraps `node` in a new `<name>_OFFSET` group aligned to it.
///
/// The group takes the node's former parent; the node keeps its world transform.
pub fn offset_group(host: &mut dyn SceneHost, node: NodeId) -> RigResult<Offset> {
    let name = naming::offset(host.name(node)?);
    let parent = host.parent(node)?;
    let group = aligned_group(host, &name, node)?;
    if parent.is_some() {
        host.reparent(group, parent)?;
    }
    host.reparent(node, Some(group))?;
    debug!(group = %name, "offset group created");
    Ok(Offset { group, node })
}

/// Circle control nested under `parent` with a zeroed local transform.
pub fn circle_control(
    host: &mut dyn SceneHost,
    name: &str,
    parent: NodeId,
    normal: [f64; 3],
    radius: f64,
) -> RigResult<NodeId> {
    let control = host.create_circle(name, normal, radius)?;
    host.reparent(control, Some(parent))?;
    host.reset_transform(control)?;
    host.freeze_scale(control)?;
    Ok(control)
}

/// Locator nested under `parent` with a zeroed local transform.
pub fn locator(host: &mut dyn SceneHost, name: &str, parent: NodeId) -> RigResult<NodeId> {
    let loc = host.create_locator(name)?;
    host.reparent(loc, Some(parent))?;
    host.reset_transform(loc)?;
    Ok(loc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Axis;
    use crate::scene::SceneGraph;

    fn rotated_joint(scene: &mut SceneGraph) -> (NodeId, NodeId) {
        let root = scene.create_joint("L_shoulder", None, [5.0, 140.0, 0.0]).unwrap();
        scene
            .set_attr(root.plug(Attr::Rotate(Axis::Z)), Value::Float(-90.0))
            .unwrap();
        let mid = scene.create_joint("L_elbow", Some(root), [0.0, 12.0, 0.0]).unwrap();
        (root, mid)
    }

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_offset_group_wraps_in_place() {
        let mut scene = SceneGraph::new();
        let (root, mid) = rotated_joint(&mut scene);
        let before = scene.world_position(mid).unwrap();

        let offset = offset_group(&mut scene, mid).unwrap();
        assert_eq!(scene.name(offset.group).unwrap(), "L_elbow_OFFSET");
        assert_eq!(scene.parent(offset.group).unwrap(), Some(root));
        assert_eq!(scene.parent(mid).unwrap(), Some(offset.group));
        assert!(close(scene.world_position(mid).unwrap(), before));
        assert!(close(scene.world_position(offset.group).unwrap(), before));

        // The node sits at the group's origin.
        let ty = scene.get_attr(mid.plug(Attr::Translate(Axis::Y))).unwrap();
        assert!(ty.as_f64().unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_joint() {
        let mut scene = SceneGraph::new();
        let (root, _) = rotated_joint(&mut scene);
        let copy = duplicate_joint(&mut scene, root, "L_upperArm_Root_CTRL_JNT", 1.5).unwrap();
        assert_eq!(
            scene.get_attr(copy.plug(Attr::Radius)).unwrap(),
            Value::Float(1.5)
        );
        assert!(scene.children(copy).unwrap().is_empty());
        assert!(close(scene.world_position(copy).unwrap(), [5.0, 140.0, 0.0]));
    }

    #[test]
    fn test_circle_control_is_zeroed_under_parent() {
        let mut scene = SceneGraph::new();
        let (root, _) = rotated_joint(&mut scene);
        let ctrl = circle_control(&mut scene, "ctrl", root, [0.0, 1.0, 0.0], 7.0).unwrap();
        assert_eq!(scene.parent(ctrl).unwrap(), Some(root));
        assert!(close(scene.world_position(ctrl).unwrap(), [5.0, 140.0, 0.0]));
        let rz = scene.get_attr(ctrl.plug(Attr::Rotate(Axis::Z))).unwrap();
        assert!(rz.as_f64().unwrap().abs() < 1e-9);
    }
}
