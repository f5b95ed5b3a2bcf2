//! Half-bone continuity joints.
//!
//! One half-bone sits on each FK joint of the limb. It follows the FK joint's
//! position and blends the orientations of the FK joint and the joint before
//! it, so the skin around the shoulder, elbow and wrist does not collapse when
//! the limb bends. The segment control groups hang off the half-bones:
//!
//! | Position | Blend            | Carries                                   |
//! |----------|------------------|-------------------------------------------|
//! | root     | FK parent, root  | upper root control                        |
//! | mid      | root, mid        | circle control; upper tip and lower root  |
//! | tip      | mid, tip         | aim locator; lower tip control under skin |

use limbrig_spec::{BuildConfig, HalfBonePosition, HalfBoneNames, RigNames};
use tracing::{debug, warn};

use crate::constraints;
use crate::error::RigResult;
use crate::host::{Attr, Axis, NodeId, SceneHost, Value};
use crate::primitives;
use crate::sub_limb::LimbRecord;

/// Nodes generated for one half-bone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfBone {
    pub position: HalfBonePosition,
    pub offset: NodeId,
    pub joint: NodeId,
    /// Circle control, mid position only.
    pub control: Option<NodeId>,
    /// Non-deforming skin duplicate.
    pub skin: NodeId,
    /// Aim target of the skin duplicate, tip position only.
    pub aim_locator: Option<NodeId>,
}

/// FK joint the half-bone sits on and the joint whose orientation it blends in.
fn pivots(
    host: &dyn SceneHost,
    position: HalfBonePosition,
    record: &LimbRecord,
) -> RigResult<(NodeId, Option<NodeId>)> {
    Ok(match position {
        HalfBonePosition::Root => {
            let parent = host.parent(record.fk_root)?;
            let parent = match parent {
                Some(p) if host.kind(p)?.is_dag() => Some(p),
                _ => None,
            };
            (record.fk_root, parent)
        }
        HalfBonePosition::Mid => (record.fk_mid, Some(record.fk_root)),
        HalfBonePosition::Tip => (record.fk_tip, Some(record.fk_mid)),
    })
}

/// Builds the half-bone at `position` and hangs the matching segment controls off it.
pub fn build_half_bone(
    host: &mut dyn SceneHost,
    position: HalfBonePosition,
    names: &RigNames,
    record: &LimbRecord,
    config: &BuildConfig,
    radius: f64,
) -> RigResult<HalfBone> {
    let hb: HalfBoneNames = names.half_bone(position);
    let (pivot, previous) = pivots(host, position, record)?;

    let joint = primitives::duplicate_joint(
        host,
        pivot,
        hb.joint(),
        radius * config.half_bone_radius_scale,
    )?;
    let offset = primitives::aligned_group(host, &hb.offset(), joint)?;
    host.reparent(joint, Some(offset))?;

    constraints::point(host, &[pivot], joint)?;
    let blend = match previous {
        Some(previous) => vec![previous, pivot],
        None => {
            warn!(
                joint = %host.name(pivot)?,
                "limb root has no parent transform, half-bone follows it alone"
            );
            vec![pivot]
        }
    };
    constraints::orient_blend(host, &blend, joint, true)?;

    let mut control = None;
    let skin_parent = match position {
        HalfBonePosition::Root => {
            host.reparent(record.upper.root_control.group, Some(joint))?;
            joint
        }
        HalfBonePosition::Mid => {
            let ctrl = primitives::circle_control(
                host,
                &hb.control(),
                joint,
                config.control_normal,
                config.mid_control_radius,
            )?;
            host.reparent(record.upper.tip_control.group, Some(ctrl))?;
            host.reparent(record.lower.root_control.group, Some(ctrl))?;
            control = Some(ctrl);
            ctrl
        }
        HalfBonePosition::Tip => joint,
    };

    let skin = primitives::duplicate_joint(
        host,
        joint,
        &hb.skin(),
        radius * config.skin_radius_scale,
    )?;
    host.reparent(skin, Some(skin_parent))?;

    let mut aim_locator = None;
    if position == HalfBonePosition::Tip {
        let lower = &record.lower;
        let loc = primitives::locator(host, &hb.aim_locator(), joint)?;
        host.set_attr(loc.plug(Attr::Translate(Axis::Y)), Value::Float(lower.spacing))?;
        constraints::aim_at(host, loc, skin, lower.direction.limb_axis(), pivot)?;
        host.reparent(lower.tip_control.group, Some(skin))?;
        aim_locator = Some(loc);
    }

    debug!(half_bone = hb.joint(), ?position, "half-bone created");
    Ok(HalfBone {
        position,
        offset,
        joint,
        control,
        skin,
        aim_locator,
    })
}
