//! Serializable snapshot of a generated subtree.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{NodeData, SceneGraph};
use crate::error::HostResult;
use crate::host::{NodeId, NodeKind, Value};

/// Decimal places kept for transform channels and attribute values.
const PRECISION: f64 = 1e6;

fn round(value: f64) -> f64 {
    let rounded = (value * PRECISION).round() / PRECISION;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn round3(v: [f64; 3]) -> [f64; 3] {
    [round(v[0]), round(v[1]), round(v[2])]
}

/// One node of the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Local translate/rotate/scale; absent for non-transform nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<[[f64; 3]; 3]>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, Value>,
}

/// One connection of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub source: String,
    pub destination: String,
}

/// One constraint, skin cluster or rebuild relationship.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstraintEntry {
    pub node: String,
    pub driven: String,
    pub targets: Vec<String>,
}

/// Names, kinds, hierarchy, local transforms, attributes and wiring under one root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtreeManifest {
    pub root: String,
    pub nodes: Vec<NodeEntry>,
    pub connections: Vec<ConnectionEntry>,
    pub relationships: Vec<ConstraintEntry>,
}

impl SubtreeManifest {
    /// Serializes to pretty JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Node counts by kind.
    pub fn counts(&self) -> BTreeMap<NodeKind, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn node(&self, name: &str) -> Option<&NodeEntry> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

impl SceneGraph {
    /// Snapshot of everything that belongs to the subtree under `root`.
    ///
    /// Membership starts from the transform descendants of `root`, then pulls in
    /// constraints driving them, skin clusters and rebuilds on their curves, and
    /// every non-transform node wired to a member.
    pub fn subtree_manifest(&self, root: NodeId) -> HostResult<SubtreeManifest> {
        let mut members: BTreeSet<NodeId> = BTreeSet::new();
        members.insert(root);
        members.extend(self.descendants(root)?);

        for id in self.node_ids() {
            let linked = match &self.node(id)?.data {
                NodeData::Constraint { driven, .. } => members.contains(driven),
                NodeData::Skin(skin) => members.contains(&skin.curve),
                NodeData::Rebuild { curve } => members.contains(curve),
                _ => false,
            };
            if linked {
                members.insert(id);
            }
        }

        loop {
            let mut added = false;
            for (src, dst) in self.connections() {
                for (candidate, other) in [(src.node, dst.node), (dst.node, src.node)] {
                    if members.contains(&other)
                        && !members.contains(&candidate)
                        && !self.node(candidate)?.kind.is_dag()
                    {
                        members.insert(candidate);
                        added = true;
                    }
                }
            }
            if !added {
                break;
            }
        }

        let mut nodes = Vec::with_capacity(members.len());
        let mut relationships = Vec::new();
        for id in &members {
            let node = self.node(*id)?;
            let transform = node.kind.is_dag().then(|| {
                let local = &node.local;
                [
                    round3([local.translation.x, local.translation.y, local.translation.z]),
                    round3(local.rotate_degrees()),
                    round3([local.scale.x, local.scale.y, local.scale.z]),
                ]
            });
            let attrs = node
                .attrs
                .iter()
                .map(|(attr, value)| {
                    let value = match *value {
                        Value::Float(f) => Value::Float(round(f)),
                        Value::Vector(v) => Value::Vector(round3(v)),
                        other => other,
                    };
                    (attr.name(), value)
                })
                .collect();
            nodes.push(NodeEntry {
                name: node.name.clone(),
                kind: node.kind,
                parent: node.parent.map(|p| self.name_of(p)),
                transform,
                attrs,
            });

            let relation = match &node.data {
                NodeData::Constraint {
                    targets, driven, ..
                } => Some((*driven, targets.clone())),
                NodeData::Skin(skin) => Some((skin.curve, skin.influences.clone())),
                NodeData::Rebuild { curve } => Some((*curve, Vec::new())),
                NodeData::IkHandle { start, end, .. } => Some((*start, vec![*end])),
                _ => None,
            };
            if let Some((driven, targets)) = relation {
                relationships.push(ConstraintEntry {
                    node: node.name.clone(),
                    driven: self.name_of(driven),
                    targets: targets.iter().map(|t| self.name_of(*t)).collect(),
                });
            }
        }
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        relationships.sort();

        let mut connections: Vec<ConnectionEntry> = self
            .connections()
            .filter(|(src, dst)| members.contains(&src.node) || members.contains(&dst.node))
            .map(|(src, dst)| ConnectionEntry {
                source: self.plug_name(src),
                destination: self.plug_name(dst),
            })
            .collect();
        connections.sort();

        Ok(SubtreeManifest {
            root: self.name_of(root),
            nodes,
            connections,
            relationships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Attr, Axis, SceneHost, UtilityKind};

    #[test]
    fn test_manifest_membership() {
        let mut scene = SceneGraph::new();
        let top = scene.create_group("top").unwrap();
        let joint = scene.create_joint("j", Some(top), [0.0, 3.0, 0.0]).unwrap();
        let outside = scene.create_joint("outside", None, [0.0; 3]).unwrap();
        let md = scene.create_utility(UtilityKind::MultiplyDivide, "md").unwrap();
        scene.create_utility(UtilityKind::MultiplyDivide, "unrelated").unwrap();
        scene.connect(md.plug(Attr::OutputX), joint.plug(Attr::Translate(Axis::Y))).unwrap();
        scene.connect(outside.plug(Attr::Radius), md.plug(Attr::Input1X)).unwrap();
        scene.point_constraint("j_pntCstr", &[outside], joint, true).unwrap();

        let manifest = scene.subtree_manifest(top).unwrap();
        let names: Vec<&str> = manifest.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["j", "j_pntCstr", "md", "top"]);
        assert_eq!(manifest.connections.len(), 2);
        assert_eq!(manifest.relationships.len(), 1);
        assert_eq!(manifest.relationships[0].targets, ["outside".to_string()]);

        let j = manifest.node("j").unwrap();
        assert_eq!(j.parent.as_deref(), Some("top"));
        assert_eq!(j.transform.unwrap()[0], [0.0, 3.0, 0.0]);
        assert!(manifest.node("md").unwrap().transform.is_none());
        assert_eq!(manifest.counts()[&NodeKind::Joint], 1);
    }
}
