//! Sub-limb builder.
//!
//! One segment (upper or lower) of a bendy limb consists of:
//!
//! - a system group aligned to the segment's FK root joint
//! - root and tip control joints, each wrapped in an offset group
//! - a bend driver joint that tracks the midpoint of the two controls and aims
//!   at the tip, with a circle control for manual offsets
//! - a skin joint chain driven by an IK spline whose curve is skinned to the
//!   root control, bend and tip control joints
//! - the squash/stretch network on the skin chain
//!
//! The segment's direction is resolved once from the resting translation of
//! its FK tip joint and threaded through every stage that depends on it.

use limbrig_spec::naming;
use limbrig_spec::{BuildConfig, Direction, RigNames, Segment, SegmentNames, WorldUpType};
use tracing::{debug, info};

use crate::constraints;
use crate::error::{RigError, RigResult};
use crate::host::{Attr, Axis, MatchFlags, NodeId, RebuildOptions, SceneHost, Value};
use crate::primitives::{self, Offset};
use crate::signals::SignalProvider;
use crate::squash_stretch::{build_squash_stretch, SquashNetwork};

/// Shortest resting segment length the spacing math accepts.
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// The bend driver of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BendDriver {
    pub joint: NodeId,
    /// Group positioned and aimed by constraints.
    pub offset: NodeId,
    pub control: NodeId,
    /// World-up reference of the aim, blended from both control groups.
    pub up_locator: NodeId,
}

/// The joints driven by the IK spline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinJointChain {
    /// Non-deforming chain root.
    pub root: NodeId,
    /// Deforming joints, root to tip.
    pub interior: Vec<NodeId>,
    /// Non-deforming chain tip, snapped to the tip control joint.
    pub tip: NodeId,
}

#[allow(clippy::len_without_is_empty)]
impl SkinJointChain {
    /// All joints, root to tip.
    pub fn joints(&self) -> Vec<NodeId> {
        let mut joints = Vec::with_capacity(self.interior.len() + 2);
        joints.push(self.root);
        joints.extend(&self.interior);
        joints.push(self.tip);
        joints
    }

    pub fn len(&self) -> usize {
        self.interior.len() + 2
    }

    /// Joint whose translateY is driven by span `span` (0-based).
    ///
    /// The first deforming joint sits on the chain root, so span k drives
    /// the joint two places further down the chain.
    pub fn span_target(&self, span: usize) -> NodeId {
        self.interior.get(span + 1).copied().unwrap_or(self.tip)
    }
}

/// The IK spline of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IkSpline {
    pub handle: NodeId,
    pub effector: NodeId,
    pub curve: NodeId,
    pub skin_cluster: NodeId,
    pub rebuild: NodeId,
}

/// Everything generated for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SubLimb {
    pub segment: Segment,
    pub direction: Direction,
    /// Resting translateY of the segment's FK tip joint.
    pub resting_translation: f64,
    /// Resting translateY between consecutive skin joints.
    pub spacing: f64,
    pub system: NodeId,
    pub root_control: Offset,
    pub tip_control: Offset,
    pub bend: BendDriver,
    pub chain: SkinJointChain,
    pub ik: IkSpline,
    pub squash: SquashNetwork,
}

impl SubLimb {
    /// The part of this segment the half-bone stage reads.
    pub fn record(&self, fk_root: NodeId, fk_tip: NodeId) -> SegmentRecord {
        SegmentRecord {
            fk_root,
            fk_tip,
            joint_count: self.chain.interior.len() as u32,
            direction: self.direction,
            spacing: self.spacing,
            system: self.system,
            root_control: self.root_control,
            tip_control: self.tip_control,
        }
    }
}

/// Read-only summary of one built segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRecord {
    pub fk_root: NodeId,
    pub fk_tip: NodeId,
    pub joint_count: u32,
    pub direction: Direction,
    pub spacing: f64,
    pub system: NodeId,
    pub root_control: Offset,
    pub tip_control: Offset,
}

/// Segment records threaded from the segment stage into the half-bone stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbRecord {
    pub fk_root: NodeId,
    pub fk_mid: NodeId,
    pub fk_tip: NodeId,
    pub upper: SegmentRecord,
    pub lower: SegmentRecord,
}

impl LimbRecord {
    pub fn segment(&self, segment: Segment) -> &SegmentRecord {
        match segment {
            Segment::Upper => &self.upper,
            Segment::Lower => &self.lower,
        }
    }
}

/// Builds one segment of a bendy limb.
///
/// # Example
///
/// ```ignore
/// let upper = SubLimbBuilder::new(Segment::Upper, &names, fk_root, fk_mid, do_not_touch, &config)
///     .joint_count(4)
///     .radius(1.5)
///     .build(&mut scene, &signals)?;
/// ```
#[derive(Debug, Clone)]
pub struct SubLimbBuilder<'a> {
    segment: Segment,
    names: SegmentNames,
    fk_root: NodeId,
    fk_tip: NodeId,
    do_not_touch: NodeId,
    stretch_source: NodeId,
    joint_count: u32,
    radius: f64,
    config: &'a BuildConfig,
}

impl<'a> SubLimbBuilder<'a> {
    /// Creates a builder for the segment running from `fk_root` to `fk_tip`.
    pub fn new(
        segment: Segment,
        names: &RigNames,
        fk_root: NodeId,
        fk_tip: NodeId,
        do_not_touch: NodeId,
        config: &'a BuildConfig,
    ) -> Self {
        Self {
            segment,
            names: names.segment(segment),
            fk_root,
            fk_tip,
            do_not_touch,
            stretch_source: fk_root,
            joint_count: 1,
            radius: 1.0,
            config,
        }
    }

    /// Number of deforming skin joints.
    pub fn joint_count(mut self, count: u32) -> Self {
        self.joint_count = count;
        self
    }

    /// Radius of the control joints.
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// FK joint whose driving condition carries the stretch ratio.
    ///
    /// Defaults to the segment's own FK root.
    pub fn stretch_source(mut self, joint: NodeId) -> Self {
        self.stretch_source = joint;
        self
    }

    /// Builds the segment.
    pub fn build(
        &self,
        host: &mut dyn SceneHost,
        signals: &dyn SignalProvider,
    ) -> RigResult<SubLimb> {
        if self.joint_count == 0 {
            return Err(RigError::degenerate(
                "joint_count",
                0.0,
                "joint count must be at least 1",
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(RigError::degenerate(
                "control_radius",
                self.radius,
                "radius must be a positive number",
            ));
        }

        let resting = host
            .get_attr(self.fk_tip.plug(Attr::Translate(Axis::Y)))?
            .as_f64()
            .unwrap_or(0.0);
        if resting.abs() < MIN_SEGMENT_LENGTH {
            return Err(RigError::degenerate(
                "segment_length",
                resting,
                "segment tip joint has no translation along the limb axis",
            ));
        }
        let direction = Direction::from_translation(resting);
        let spacing = resting / f64::from(self.joint_count);

        let system = primitives::aligned_group(host, &self.names.system(), self.fk_root)?;
        let root_control =
            self.control_joint(host, self.fk_root, &self.names.root_control_joint(), system)?;
        let tip_control =
            self.control_joint(host, self.fk_tip, &self.names.tip_control_joint(), system)?;

        let bend = self.bend_driver(host, system, &root_control, &tip_control, direction)?;
        let chain = self.skin_chain(host, system, &root_control, &tip_control, spacing)?;
        let (handle, effector, curve, skin_cluster) = self.ik_spline(
            host,
            &chain,
            root_control.node,
            bend.joint,
            tip_control.node,
            direction,
        )?;

        let squash = build_squash_stretch(
            host,
            signals,
            &self.names,
            curve,
            direction,
            &chain,
            self.stretch_source,
        )?;
        let rebuild = self.refine_curve(host, curve)?;

        info!(
            segment = %self.segment,
            joints = chain.len(),
            spacing,
            ?direction,
            "segment built"
        );
        Ok(SubLimb {
            segment: self.segment,
            direction,
            resting_translation: resting,
            spacing,
            system,
            root_control,
            tip_control,
            bend,
            chain,
            ik: IkSpline {
                handle,
                effector,
                curve,
                skin_cluster,
                rebuild,
            },
            squash,
        })
    }

    fn control_joint(
        &self,
        host: &mut dyn SceneHost,
        source: NodeId,
        name: &str,
        system: NodeId,
    ) -> RigResult<Offset> {
        let joint = primitives::duplicate_joint(host, source, name, self.radius)?;
        let offset = primitives::offset_group(host, joint)?;
        host.reparent(offset.group, Some(system))?;
        Ok(offset)
    }

    fn bend_driver(
        &self,
        host: &mut dyn SceneHost,
        system: NodeId,
        root_control: &Offset,
        tip_control: &Offset,
        direction: Direction,
    ) -> RigResult<BendDriver> {
        let ends = [root_control.group, tip_control.group];
        let joint =
            primitives::duplicate_joint(host, self.fk_root, &self.names.bend_joint(), self.radius)?;
        let offset = primitives::empty_group(host, &naming::offset(&self.names.bend_joint()))?;
        constraints::point(host, &ends, offset)?;

        let up_locator = host.create_locator(&self.names.bend_up_locator())?;
        host.reparent(up_locator, Some(self.do_not_touch))?;
        constraints::point(host, &ends, up_locator)?;
        constraints::orient_blend(host, &ends, up_locator, false)?;

        constraints::aim_at(host, tip_control.group, offset, direction.limb_axis(), up_locator)?;

        host.reparent(joint, Some(offset))?;
        host.reset_transform(joint)?;
        host.freeze_scale(joint)?;
        host.reparent(offset, Some(system))?;

        let control = primitives::circle_control(
            host,
            &self.names.bend_control(),
            offset,
            self.config.control_normal,
            self.config.bend_control_radius,
        )?;
        host.reparent(joint, Some(control))?;

        debug!(segment = %self.segment, "bend driver created");
        Ok(BendDriver {
            joint,
            offset,
            control,
            up_locator,
        })
    }

    fn skin_chain(
        &self,
        host: &mut dyn SceneHost,
        system: NodeId,
        root_control: &Offset,
        tip_control: &Offset,
        spacing: f64,
    ) -> RigResult<SkinJointChain> {
        let radius = self.radius * self.config.skin_radius_scale;
        let root =
            primitives::duplicate_joint(host, root_control.node, &self.names.skin_root(), radius)?;
        host.reparent(root, Some(system))?;

        let mut interior = Vec::with_capacity(self.joint_count as usize);
        let mut previous = root;
        // The first deforming joint shares the root position, so the spline's
        // first bone has zero length and a host solver cannot orient it.
        for index in 1..=self.joint_count {
            let translate_y = if index == 1 { 0.0 } else { spacing };
            let name = self.names.skin_joint(index);
            let joint = self.chain_joint(host, root, previous, &name, radius, translate_y)?;
            interior.push(joint);
            previous = joint;
        }

        let tip = self.chain_joint(host, root, previous, &self.names.skin_tip(), radius, spacing)?;
        host.match_transform(tip, tip_control.node, MatchFlags::POSITION)?;

        debug!(segment = %self.segment, joints = interior.len() + 2, "skin chain created");
        Ok(SkinJointChain {
            root,
            interior,
            tip,
        })
    }

    fn chain_joint(
        &self,
        host: &mut dyn SceneHost,
        template: NodeId,
        parent: NodeId,
        name: &str,
        radius: f64,
        translate_y: f64,
    ) -> RigResult<NodeId> {
        let joint = primitives::duplicate_joint(host, template, name, radius)?;
        host.reparent(joint, Some(parent))?;
        host.reset_transform(joint)?;
        host.set_attr(joint.plug(Attr::Translate(Axis::Y)), Value::Float(translate_y))?;
        Ok(joint)
    }

    fn ik_spline(
        &self,
        host: &mut dyn SceneHost,
        chain: &SkinJointChain,
        root_control: NodeId,
        bend: NodeId,
        tip_control: NodeId,
        direction: Direction,
    ) -> RigResult<(NodeId, NodeId, NodeId, NodeId)> {
        let ik = host.create_ik_spline(&self.names.ik_handle(), chain.root, chain.tip)?;
        host.rename(ik.curve, &self.names.curve())?;
        host.rename(ik.effector, &self.names.effector())?;
        host.reparent(ik.effector, Some(chain.tip))?;
        host.reparent(ik.curve, Some(self.do_not_touch))?;
        host.reparent(ik.handle, Some(self.do_not_touch))?;

        let skin_cluster = host.skin_curve(
            &self.names.skin_cluster(),
            ik.curve,
            &[root_control, bend, tip_control],
        )?;

        let axes = direction.twist_axes();
        let handle = ik.handle;
        host.set_attr(handle.plug(Attr::TwistControlEnable), Value::Bool(true))?;
        host.set_attr(
            handle.plug(Attr::WorldUpType),
            Value::Int(WorldUpType::ObjectRotationUpStartEnd.index()),
        )?;
        host.set_attr(handle.plug(Attr::ForwardAxis), Value::Int(axes.forward.index()))?;
        host.set_attr(handle.plug(Attr::WorldUpAxis), Value::Int(axes.up.index()))?;
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let component = Value::Float(axes.up_vector[axis.index()]);
            host.set_attr(handle.plug(Attr::WorldUpVector(axis)), component)?;
            host.set_attr(handle.plug(Attr::WorldUpVectorEnd(axis)), component)?;
        }
        host.connect(root_control.plug(Attr::WorldMatrix), handle.plug(Attr::WorldUpMatrix))?;
        host.connect(tip_control.plug(Attr::WorldMatrix), handle.plug(Attr::WorldUpMatrixEnd))?;

        debug!(segment = %self.segment, handle = %self.names.ik_handle(), "ik spline created");
        Ok((ik.handle, ik.effector, ik.curve, skin_cluster))
    }

    fn refine_curve(&self, host: &mut dyn SceneHost, curve: NodeId) -> RigResult<NodeId> {
        host.set_attr(curve.plug(Attr::InheritsTransform), Value::Bool(false))?;
        let rebuild = host.rebuild_curve(
            &self.names.rebuild(),
            curve,
            RebuildOptions {
                spans: self.config.curve_spans,
                degree: self.config.curve_degree,
            },
        )?;
        Ok(rebuild)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NodeKind;
    use crate::scene::{load_skeleton, SceneGraph};
    use crate::signals::ConventionSignals;
    use limbrig_spec::{JointDesc, LimbType, MasterScaleDesc, SkeletonDesc};
    use pretty_assertions::assert_eq;

    fn skeleton(side: &str, sign: f64) -> SkeletonDesc {
        let name = |joint: &str| format!("{side}_{joint}");
        SkeletonDesc {
            joints: vec![
                JointDesc::new(name("shoulder"), [5.0 * sign, 140.0, 0.0])
                    .with_rotate([0.0, 0.0, -90.0 * sign])
                    .with_stretch_ratio(1.0),
                JointDesc::new(name("elbow"), [0.0, 12.0 * sign, 0.0]).with_parent(name("shoulder")),
                JointDesc::new(name("wrist"), [0.0, 10.0 * sign, 0.0]).with_parent(name("elbow")),
            ],
            master_scale: Some(MasterScaleDesc {
                name: "main_CTRL".into(),
                scale: 1.0,
            }),
            selection: vec![name("shoulder"), name("elbow"), name("wrist")],
        }
    }

    fn build_upper(side: &str, sign: f64, joints: u32) -> (SceneGraph, SubLimb) {
        let mut scene = load_skeleton(&skeleton(side, sign)).unwrap();
        let selection = scene.selection();
        let names = RigNames::new(side, LimbType::Arm);
        let do_not_touch = scene.create_group(&names.do_not_touch()).unwrap();
        let config = BuildConfig::default();
        let upper = SubLimbBuilder::new(
            Segment::Upper,
            &names,
            selection[0],
            selection[1],
            do_not_touch,
            &config,
        )
        .joint_count(joints)
        .radius(1.5)
        .build(&mut scene, &ConventionSignals::default())
        .unwrap();
        (scene, upper)
    }

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn test_skin_chain_layout() {
        let (scene, upper) = build_upper("L", 1.0, 4);
        assert_eq!(upper.direction, Direction::Positive);
        assert_eq!(upper.chain.len(), 6);
        assert!((upper.spacing - 3.0).abs() < 1e-12);

        let names: Vec<&str> = upper
            .chain
            .joints()
            .into_iter()
            .map(|j| scene.name(j).unwrap())
            .collect();
        assert_eq!(
            names,
            [
                "L_upperArm_01_notSKIN",
                "L_upperArm_02_SKIN",
                "L_upperArm_03_SKIN",
                "L_upperArm_04_SKIN",
                "L_upperArm_05_SKIN",
                "L_upperArm_tip_notSKIN",
            ]
        );

        let resting: f64 = upper
            .chain
            .joints()
            .into_iter()
            .skip(1)
            .map(|j| scene.node(j).unwrap().local.translation.y)
            .sum();
        assert!((resting - 12.0).abs() < 1e-6);

        let tip = scene.world_position(upper.chain.tip).unwrap();
        let control = scene.world_position(upper.tip_control.node).unwrap();
        assert!(close(tip, control));
    }

    #[test]
    fn test_hierarchy() {
        let (scene, upper) = build_upper("L", 1.0, 3);
        assert_eq!(scene.name(upper.system).unwrap(), "L_upperArm_system");
        assert_eq!(scene.parent(upper.root_control.group).unwrap(), Some(upper.system));
        assert_eq!(scene.parent(upper.tip_control.group).unwrap(), Some(upper.system));
        assert_eq!(scene.parent(upper.chain.root).unwrap(), Some(upper.system));
        assert_eq!(scene.parent(upper.bend.offset).unwrap(), Some(upper.system));
        assert_eq!(scene.parent(upper.bend.control).unwrap(), Some(upper.bend.offset));
        assert_eq!(scene.parent(upper.bend.joint).unwrap(), Some(upper.bend.control));
        assert_eq!(scene.parent(upper.ik.effector).unwrap(), Some(upper.chain.tip));

        let do_not_touch = scene.find("L_Arm_do_not_touch").unwrap();
        for node in [upper.ik.handle, upper.ik.curve, upper.bend.up_locator] {
            assert_eq!(scene.parent(node).unwrap(), Some(do_not_touch));
        }
    }

    #[test]
    fn test_bend_driver_sits_between_controls() {
        let (scene, upper) = build_upper("L", 1.0, 4);
        // Shoulder at (5, 140) pointing along +X after the -90 degree roll.
        assert!(close(scene.world_position(upper.bend.joint).unwrap(), [11.0, 140.0, 0.0]));
        assert!(close(scene.world_position(upper.bend.up_locator).unwrap(), [11.0, 140.0, 0.0]));
        assert_eq!(scene.constraints_on(upper.bend.offset).len(), 2);
    }

    #[test]
    fn test_ik_spline_settings() {
        let (scene, upper) = build_upper("L", 1.0, 4);
        let handle = upper.ik.handle;
        let get = |attr| scene.get_attr(handle.plug(attr)).unwrap();
        assert_eq!(get(Attr::TwistControlEnable), Value::Bool(true));
        assert_eq!(get(Attr::WorldUpType), Value::Int(4));
        assert_eq!(get(Attr::ForwardAxis), Value::Int(2));
        assert_eq!(get(Attr::WorldUpAxis), Value::Int(6));
        assert_eq!(get(Attr::WorldUpVector(Axis::X)), Value::Float(1.0));
        assert_eq!(get(Attr::WorldUpVectorEnd(Axis::X)), Value::Float(1.0));
        assert_eq!(
            scene.source(handle.plug(Attr::WorldUpMatrix)),
            Some(upper.root_control.node.plug(Attr::WorldMatrix))
        );
        assert_eq!(
            scene.source(handle.plug(Attr::WorldUpMatrixEnd)),
            Some(upper.tip_control.node.plug(Attr::WorldMatrix))
        );

        assert_eq!(scene.name(upper.ik.curve).unwrap(), "L_upperArm_crv");
        assert_eq!(
            scene.skin_influences(upper.ik.curve),
            vec![upper.root_control.node, upper.bend.joint, upper.tip_control.node]
        );
        assert_eq!(
            scene.get_attr(upper.ik.curve.plug(Attr::Spans)).unwrap(),
            Value::Int(8)
        );
        assert_eq!(
            scene.get_attr(upper.ik.curve.plug(Attr::InheritsTransform)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(scene.kind(upper.ik.rebuild).unwrap(), NodeKind::RebuildCurve);
    }

    #[test]
    fn test_mirrored_segment_negates_scale() {
        let (scene, upper) = build_upper("R", -1.0, 4);
        assert_eq!(upper.direction, Direction::Negative);
        assert!((upper.spacing + 3.0).abs() < 1e-12);
        assert_eq!(upper.squash.negations.len(), 4);
        assert_eq!(
            scene.get_attr(upper.ik.handle.plug(Attr::ForwardAxis)).unwrap(),
            Value::Int(3)
        );
        assert_eq!(
            scene.get_attr(upper.ik.handle.plug(Attr::WorldUpVector(Axis::X))).unwrap(),
            Value::Float(-1.0)
        );

        let live = scene
            .evaluate(upper.squash.scale_divides[0].plug(Attr::OutputX))
            .unwrap();
        assert!((live + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_squash_network_rest_values() {
        let (scene, upper) = build_upper("L", 1.0, 4);
        assert_eq!(upper.squash.samples.len(), 5);
        assert_eq!(upper.squash.distances.len(), 4);
        assert!(upper.squash.negations.is_empty());

        for span in 0..4 {
            let target = upper.chain.span_target(span);
            let live = scene.get_attr(target.plug(Attr::Translate(Axis::Y))).unwrap();
            assert!((live.as_f64().unwrap() - 3.0).abs() < 1e-6);
        }
        for joint in &upper.chain.interior {
            let sx = scene.get_attr(joint.plug(Attr::Scale(Axis::X))).unwrap();
            assert!((sx.as_f64().unwrap() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_first_deforming_joint_shares_root() {
        let (scene, upper) = build_upper("L", 1.0, 4);
        let first = upper.chain.interior[0];
        assert_eq!(
            scene.get_attr(first.plug(Attr::Translate(Axis::Y))).unwrap(),
            Value::Float(0.0)
        );
        assert!(close(
            scene.world_position(first).unwrap(),
            scene.world_position(upper.chain.root).unwrap()
        ));
        assert_eq!(upper.chain.len(), upper.chain.joints().len());
        // 5 samples, 4 distances, 4 divides, pow and invert.
        assert_eq!(upper.squash.len(), 15);

        let (_, mirrored) = build_upper("R", -1.0, 4);
        assert_eq!(mirrored.squash.len(), 19);
    }

    #[test]
    fn test_zero_length_segment_is_degenerate() {
        let mut desc = skeleton("L", 1.0);
        desc.joints[1].translate = [0.0, 0.0, 0.0];
        let mut scene = load_skeleton(&desc).unwrap();
        let selection = scene.selection();
        let names = RigNames::new("L", LimbType::Arm);
        let do_not_touch = scene.create_group("dnt").unwrap();
        let config = BuildConfig::default();
        let err = SubLimbBuilder::new(
            Segment::Upper,
            &names,
            selection[0],
            selection[1],
            do_not_touch,
            &config,
        )
        .joint_count(4)
        .build(&mut scene, &ConventionSignals::default())
        .unwrap_err();
        assert_eq!(err.code(), "RIG_005");
        assert!(scene.find("L_upperArm_system").is_none());
    }

    #[test]
    fn test_missing_master_scale_leaves_partial_segment() {
        let mut desc = skeleton("L", 1.0);
        desc.master_scale = None;
        let mut scene = load_skeleton(&desc).unwrap();
        let selection = scene.selection();
        let names = RigNames::new("L", LimbType::Arm);
        let do_not_touch = scene.create_group("dnt").unwrap();
        let config = BuildConfig::default();
        let err = SubLimbBuilder::new(
            Segment::Upper,
            &names,
            selection[0],
            selection[1],
            do_not_touch,
            &config,
        )
        .joint_count(2)
        .build(&mut scene, &ConventionSignals::default())
        .unwrap_err();
        assert_eq!(err.code(), "RIG_004");
        assert!(scene.find("L_upperArm_crv").is_some());
        assert!(scene.find("L_upperArm_poci_03").is_some());
        assert!(scene.find("L_upperArm_dist_btw_01").is_none());
    }
}
