//! Bendy limb orchestrator.
//!
//! Runs the whole generator against a host:
//!
//! ```text
//! validate selection -> upper segment -> lower segment
//!     -> root, mid, tip half-bones -> top group -> info message
//! ```
//!
//! Selection count, node types and parameters are checked before anything is
//! created. Failures after that point leave the partial rig in the scene.

use limbrig_spec::{BuildConfig, HalfBonePosition, LimbParams, LimbRequest, RigNames, Segment};
use tracing::{debug, info};

use crate::error::{RigError, RigResult};
use crate::half_bone::{build_half_bone, HalfBone};
use crate::host::{NodeId, NodeKind, SceneHost};
use crate::primitives;
use crate::signals::{ConventionSignals, SignalProvider};
use crate::sub_limb::{LimbRecord, SubLimb, SubLimbBuilder};

/// A generated bendy limb.
#[derive(Debug, Clone, PartialEq)]
pub struct BendyLimb {
    pub names: RigNames,
    pub params: LimbParams,
    /// Group holding the whole limb.
    pub top_group: NodeId,
    /// Group for curves, handles and helper locators.
    pub do_not_touch: NodeId,
    pub upper: SubLimb,
    pub lower: SubLimb,
    /// Root, mid and tip half-bones.
    pub half_bones: [HalfBone; 3],
    pub record: LimbRecord,
    /// Message reported through the host once the limb is built.
    pub message: String,
}

impl BendyLimb {
    pub fn segment(&self, segment: Segment) -> &SubLimb {
        match segment {
            Segment::Upper => &self.upper,
            Segment::Lower => &self.lower,
        }
    }

    pub fn half_bone(&self, position: HalfBonePosition) -> &HalfBone {
        match position {
            HalfBonePosition::Root => &self.half_bones[0],
            HalfBonePosition::Mid => &self.half_bones[1],
            HalfBonePosition::Tip => &self.half_bones[2],
        }
    }
}

/// Returns the selected root, mid and tip joints.
pub fn validate_selection(host: &dyn SceneHost) -> RigResult<[NodeId; 3]> {
    let selection = host.selection();
    let [root, mid, tip] = selection[..] else {
        return Err(RigError::InvalidSelectionCount {
            count: selection.len(),
        });
    };
    for node in [root, mid, tip] {
        let kind = host.kind(node)?;
        if kind != NodeKind::Joint {
            return Err(RigError::InvalidNodeType {
                node: host.name(node)?.to_string(),
                kind,
            });
        }
    }
    Ok([root, mid, tip])
}

/// Runs every check that precedes node creation.
///
/// Order: selection count, node types, limb type, joint counts and radius.
pub fn validate_request(
    host: &dyn SceneHost,
    request: &LimbRequest,
) -> RigResult<(LimbParams, [NodeId; 3])> {
    let joints = validate_selection(host)?;
    let params = request.resolve()?;
    Ok((params, joints))
}

/// Builds a bendy limb on the current selection with the default config and
/// convention-based signals.
pub fn create_bendy_limb(host: &mut dyn SceneHost, request: &LimbRequest) -> RigResult<BendyLimb> {
    LimbBuilder::new().build(host, request)
}

/// Configurable limb generator.
///
/// # Example
///
/// ```ignore
/// let limb = LimbBuilder::with_config(config)
///     .signals(FixedSignals { master_scale, stretch_ratio })
///     .build(&mut scene, &LimbRequest::new("Arm", 4, 3, 1.5))?;
/// ```
#[derive(Default)]
pub struct LimbBuilder {
    config: BuildConfig,
    signals: Option<Box<dyn SignalProvider>>,
}

impl LimbBuilder {
    /// Creates a builder with the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with the given config.
    pub fn with_config(config: BuildConfig) -> Self {
        Self {
            config,
            signals: None,
        }
    }

    /// Replaces the convention-based signal lookup.
    pub fn signals(mut self, signals: impl SignalProvider + 'static) -> Self {
        self.signals = Some(Box::new(signals));
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Builds the limb on the host's current selection.
    pub fn build(&self, host: &mut dyn SceneHost, request: &LimbRequest) -> RigResult<BendyLimb> {
        let (params, [fk_root, fk_mid, fk_tip]) = validate_request(&*host, request)?;
        self.config.validate()?;

        let convention;
        let signals: &dyn SignalProvider = match &self.signals {
            Some(signals) => signals.as_ref(),
            None => {
                convention = ConventionSignals::from_config(&self.config);
                &convention
            }
        };

        let names = RigNames::new(host.name(fk_root)?, params.limb_type);
        debug!(side = names.side(), limb = %params.limb_type, "building bendy limb");
        let do_not_touch = primitives::empty_group(host, &names.do_not_touch())?;

        let upper = SubLimbBuilder::new(
            Segment::Upper,
            &names,
            fk_root,
            fk_mid,
            do_not_touch,
            &self.config,
        )
        .joint_count(params.upper_joint_count)
        .radius(params.control_radius)
        .build(host, signals)?;

        let lower = SubLimbBuilder::new(
            Segment::Lower,
            &names,
            fk_mid,
            fk_tip,
            do_not_touch,
            &self.config,
        )
        .joint_count(params.lower_joint_count)
        .radius(params.control_radius)
        .stretch_source(fk_root)
        .build(host, signals)?;

        let record = LimbRecord {
            fk_root,
            fk_mid,
            fk_tip,
            upper: upper.record(fk_root, fk_mid),
            lower: lower.record(fk_mid, fk_tip),
        };

        let radius = params.control_radius;
        let root_hb =
            build_half_bone(host, HalfBonePosition::Root, &names, &record, &self.config, radius)?;
        let mid_hb =
            build_half_bone(host, HalfBonePosition::Mid, &names, &record, &self.config, radius)?;
        let tip_hb =
            build_half_bone(host, HalfBonePosition::Tip, &names, &record, &self.config, radius)?;

        let top_group = primitives::empty_group(host, &names.top_group())?;
        for child in [
            upper.system,
            lower.system,
            root_hb.offset,
            mid_hb.offset,
            tip_hb.offset,
            do_not_touch,
        ] {
            host.reparent(child, Some(top_group))?;
        }

        let message = names.success_message();
        host.display_info(&message);
        info!(
            top_group = %names.top_group(),
            upper_joints = upper.chain.len(),
            lower_joints = lower.chain.len(),
            "bendy limb built"
        );

        Ok(BendyLimb {
            names,
            params,
            top_group,
            do_not_touch,
            upper,
            lower,
            half_bones: [root_hb, mid_hb, tip_hb],
            record,
            message,
        })
    }
}
