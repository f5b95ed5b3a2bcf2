//! Error types for rig generation and the host contract.

use limbrig_spec::ParamError;
use thiserror::Error;

use crate::host::{Attr, NodeId, NodeKind};

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Result type for rig generation.
pub type RigResult<T> = Result<T, RigError>;

/// Errors reported by a [`SceneHost`](crate::host::SceneHost).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// A handle does not refer to a live node.
    #[error("Node {0} does not exist")]
    NodeNotFound(NodeId),

    /// No node carries the requested name.
    #[error("No node named '{0}'")]
    NameNotFound(String),

    /// The host's name uniqueness rule rejected a name.
    #[error("A node named '{0}' already exists")]
    NameCollision(String),

    /// The name is not a valid node identifier.
    #[error("Invalid node name '{0}'")]
    InvalidName(String),

    /// The node does not carry the attribute.
    #[error("Node '{node}' ({kind}) has no attribute '{attr}'")]
    AttributeMismatch {
        node: String,
        kind: NodeKind,
        attr: Attr,
    },

    /// The value type does not fit the attribute.
    #[error("Cannot set '{node}.{attr}': {reason}")]
    InvalidValue {
        node: String,
        attr: Attr,
        reason: String,
    },

    /// A connection was refused.
    #[error("Cannot connect '{src}' to '{dst}': {reason}")]
    NotConnectable {
        src: String,
        dst: String,
        reason: String,
    },

    /// Reparenting would create a cycle.
    #[error("Cannot parent '{child}' under its own descendant '{parent}'")]
    ParentCycle { child: String, parent: String },

    /// An IK chain request does not describe a parent chain.
    #[error("'{end}' is not a descendant of '{start}'")]
    InvalidChain { start: String, end: String },

    /// Live evaluation of a plug failed.
    #[error("Failed to evaluate '{plug}': {reason}")]
    Evaluation { plug: String, reason: String },
}

impl HostError {
    /// Creates a connection error.
    pub fn not_connectable(
        src: impl Into<String>,
        dst: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::NotConnectable {
            src: src.into(),
            dst: dst.into(),
            reason: reason.into(),
        }
    }

    /// Creates an evaluation error.
    pub fn evaluation(plug: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Evaluation {
            plug: plug.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code string (e.g., "HOST_003").
    pub fn code(&self) -> &'static str {
        match self {
            HostError::NodeNotFound(_) => "HOST_001",
            HostError::NameNotFound(_) => "HOST_002",
            HostError::NameCollision(_) => "HOST_003",
            HostError::InvalidName(_) => "HOST_004",
            HostError::AttributeMismatch { .. } => "HOST_005",
            HostError::InvalidValue { .. } => "HOST_006",
            HostError::NotConnectable { .. } => "HOST_007",
            HostError::ParentCycle { .. } => "HOST_008",
            HostError::InvalidChain { .. } => "HOST_009",
            HostError::Evaluation { .. } => "HOST_010",
        }
    }
}

/// Errors that abort a limb build.
///
/// Selection count, node type and limb type are checked before any node is
/// created. Missing external signals and degenerate parameters can surface
/// mid-build; nodes created up to that point stay in the scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RigError {
    /// The selection does not hold exactly the root, mid and tip joints.
    #[error("Please select exactly 3 FK joints of the limb (got {count})")]
    InvalidSelectionCount { count: usize },

    /// A selected node is not a joint.
    #[error("Selected node '{node}' is a {kind}, not a joint")]
    InvalidNodeType { node: String, kind: NodeKind },

    /// The limb-type tag is not one of the supported namings.
    #[error("Invalid limb type '{tag}'. Use \"Arm\" or \"Leg\"")]
    InvalidLimbType { tag: String },

    /// An upstream signal the squash network reads is absent.
    #[error("Missing external signal {signal}: {detail}")]
    MissingExternalSignal {
        signal: &'static str,
        detail: String,
    },

    /// A parameter makes the spacing or sampling math undefined.
    #[error("Degenerate parameter {name}: {reason} (got {value})")]
    DegenerateParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The skeleton description could not be loaded.
    #[error("Invalid skeleton: {0}")]
    Skeleton(String),

    /// The build report could not be serialized.
    #[error("Failed to serialize build report: {0}")]
    Report(String),

    /// The host refused an operation.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl RigError {
    /// Creates a missing external signal error.
    pub fn missing_signal(signal: &'static str, detail: impl Into<String>) -> Self {
        Self::MissingExternalSignal {
            signal,
            detail: detail.into(),
        }
    }

    /// Creates a degenerate parameter error.
    pub fn degenerate(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::DegenerateParameter {
            name,
            value,
            reason,
        }
    }

    /// Returns the stable error code string (e.g., "RIG_001").
    pub fn code(&self) -> &'static str {
        match self {
            RigError::InvalidSelectionCount { .. } => "RIG_001",
            RigError::InvalidNodeType { .. } => "RIG_002",
            RigError::InvalidLimbType { .. } => "RIG_003",
            RigError::MissingExternalSignal { .. } => "RIG_004",
            RigError::DegenerateParameter { .. } => "RIG_005",
            RigError::Skeleton(_) => "RIG_006",
            RigError::Report(_) => "RIG_007",
            RigError::Host(err) => err.code(),
        }
    }

    /// Returns the error category.
    pub fn category(&self) -> &'static str {
        match self {
            RigError::Host(_) => "host",
            RigError::Skeleton(_) => "skeleton",
            _ => "rig",
        }
    }

    /// Returns true for errors raised before any node is created.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            RigError::InvalidSelectionCount { .. }
                | RigError::InvalidNodeType { .. }
                | RigError::InvalidLimbType { .. }
        )
    }
}

impl From<ParamError> for RigError {
    fn from(err: ParamError) -> Self {
        match err {
            ParamError::InvalidLimbType { tag } => RigError::InvalidLimbType { tag },
            ParamError::DegenerateParameter {
                name,
                value,
                reason,
            } => RigError::DegenerateParameter {
                name,
                value,
                reason,
            },
            ParamError::ParseSkeleton(msg) | ParamError::ParseConfig(msg) => {
                RigError::Skeleton(msg)
            }
        }
    }
}
