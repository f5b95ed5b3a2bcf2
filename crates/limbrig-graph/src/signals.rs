//! External signals read by the squash/stretch network.
//!
//! The rig reads two signals it never creates: the master uniform scale and
//! the stretch ratio of the FK root. Both are resolved through a
//! [`SignalProvider`] at wiring time, so a missing signal aborts the build
//! after the nodes before it already exist.

use limbrig_spec::BuildConfig;
use tracing::debug;

use crate::error::{RigError, RigResult};
use crate::host::{Attr, Axis, NodeId, NodeKind, Plug, SceneHost};

/// Resolves the external signals of one build.
pub trait SignalProvider {
    /// Plug carrying the rig's master uniform scale.
    fn master_scale(&self, host: &dyn SceneHost) -> RigResult<Plug>;

    /// Plug carrying the live stretch ratio of the limb's FK root joint.
    fn stretch_ratio(&self, host: &dyn SceneHost, fk_root: NodeId) -> RigResult<Plug>;
}

/// Looks signals up by the rig's naming conventions.
///
/// The master scale is `<master_scale_node>.scaleY`; the stretch ratio is the
/// `outColorR` of the condition node feeding the FK root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionSignals {
    master_scale_node: String,
}

impl ConventionSignals {
    pub fn new(master_scale_node: impl Into<String>) -> Self {
        Self {
            master_scale_node: master_scale_node.into(),
        }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(config.master_scale_node.clone())
    }
}

impl Default for ConventionSignals {
    fn default() -> Self {
        Self::from_config(&BuildConfig::default())
    }
}

impl SignalProvider for ConventionSignals {
    fn master_scale(&self, host: &dyn SceneHost) -> RigResult<Plug> {
        let node = host.find(&self.master_scale_node).ok_or_else(|| {
            RigError::missing_signal(
                "master scale",
                format!("no node named '{}'", self.master_scale_node),
            )
        })?;
        if !host.kind(node)?.is_dag() {
            return Err(RigError::missing_signal(
                "master scale",
                format!("'{}' has no scaleY", self.master_scale_node),
            ));
        }
        debug!(node = %self.master_scale_node, "master scale resolved");
        Ok(node.plug(Attr::Scale(Axis::Y)))
    }

    fn stretch_ratio(&self, host: &dyn SceneHost, fk_root: NodeId) -> RigResult<Plug> {
        let condition = host
            .source_nodes(fk_root, NodeKind::Condition)?
            .first()
            .copied()
            .ok_or_else(|| {
                let root = host.name(fk_root).unwrap_or("<unknown>");
                RigError::missing_signal(
                    "stretch ratio",
                    format!("no condition node drives '{root}'"),
                )
            })?;
        debug!(condition = %host.name(condition)?, "stretch ratio resolved");
        Ok(condition.plug(Attr::OutColorR))
    }
}

/// Explicit signal plugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSignals {
    pub master_scale: Plug,
    pub stretch_ratio: Plug,
}

impl SignalProvider for FixedSignals {
    fn master_scale(&self, host: &dyn SceneHost) -> RigResult<Plug> {
        host.kind(self.master_scale.node)?;
        Ok(self.master_scale)
    }

    fn stretch_ratio(&self, host: &dyn SceneHost, _fk_root: NodeId) -> RigResult<Plug> {
        host.kind(self.stretch_ratio.node)?;
        Ok(self.stretch_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::UtilityKind;
    use crate::scene::SceneGraph;

    #[test]
    fn test_convention_lookup() {
        let mut scene = SceneGraph::new();
        let root = scene.create_joint("L_shoulder", None, [0.0; 3]).unwrap();
        let master = scene.create_group("main_CTRL").unwrap();
        let cond = scene.create_utility(UtilityKind::Condition, "cond").unwrap();
        scene.connect(cond.plug(Attr::OutColorR), root.plug(Attr::Scale(Axis::Y))).unwrap();

        let signals = ConventionSignals::default();
        assert_eq!(
            signals.master_scale(&scene).unwrap(),
            master.plug(Attr::Scale(Axis::Y))
        );
        assert_eq!(
            signals.stretch_ratio(&scene, root).unwrap(),
            cond.plug(Attr::OutColorR)
        );
    }

    #[test]
    fn test_missing_signals() {
        let mut scene = SceneGraph::new();
        let root = scene.create_joint("L_shoulder", None, [0.0; 3]).unwrap();
        let signals = ConventionSignals::new("world_CTRL");

        let err = signals.master_scale(&scene).unwrap_err();
        assert_eq!(err.code(), "RIG_004");
        assert!(err.to_string().contains("world_CTRL"));

        let err = signals.stretch_ratio(&scene, root).unwrap_err();
        assert!(err.to_string().contains("L_shoulder"));
    }

    #[test]
    fn test_fixed_signals() {
        let mut scene = SceneGraph::new();
        let root = scene.create_joint("root", None, [0.0; 3]).unwrap();
        let scale = scene.create_group("scale").unwrap();
        let signals = FixedSignals {
            master_scale: scale.plug(Attr::Scale(Axis::Y)),
            stretch_ratio: root.plug(Attr::Scale(Axis::Y)),
        };
        assert_eq!(signals.stretch_ratio(&scene, root).unwrap(), root.plug(Attr::Scale(Axis::Y)));
    }
}
