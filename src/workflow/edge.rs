//! Workflow edge definitions for connecting nodes.
//!
//! Edges run from an output handle of one node to the input of another.
//! Plain nodes expose one implicit output; condition nodes branch through the
//! named `yes` / `no` handles.

use serde::{Deserialize, Serialize};

use crate::{DesignerError, Result, workflow::node::NodeId};

/// Unique identifier for an edge within a workflow.
pub type EdgeId = String;

/// Name of a connection port on a node.
pub type HandleId = String;

/// Named output handles of a condition node.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::Display, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BranchHandle {
    Yes,
    No,
}

impl BranchHandle {
    /// Edge label conventionally shown on this branch.
    pub fn label(&self) -> &'static str {
        match self {
            BranchHandle::Yes => "Yes",
            BranchHandle::No => "No",
        }
    }
}

/// One end of an edge: a node and, optionally, which of its handles.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_id: Option<HandleId>,
}

impl Endpoint {
    /// Endpoint on the implicit handle of a node.
    pub fn node(node_id: impl Into<NodeId>) -> Self {
        Self {
            node_id: node_id.into(),
            handle_id: None,
        }
    }

    /// Endpoint on a named handle of a node.
    pub fn handle(
        node_id: impl Into<NodeId>,
        handle_id: impl Into<HandleId>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            handle_id: Some(handle_id.into()),
        }
    }

    /// The condition branch this endpoint names, if any.
    pub fn branch(&self) -> Option<BranchHandle> {
        self.handle_id.as_deref().and_then(|h| h.parse().ok())
    }
}

#[derive(Deserialize)]
struct EdgeMetadata {
    id: EdgeId,
    source: Endpoint,
    target: Endpoint,
    #[serde(default)]
    animated: bool,
    #[serde(default)]
    label: Option<String>,
}

/// A directed connection between two node handles.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "EdgeMetadata")]
pub struct GraphEdge {
    /// Unique edge identifier.
    pub id: EdgeId,
    pub source: Endpoint,
    pub target: Endpoint,
    /// Presentational only; freshly drawn edges are animated.
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphEdge {
    pub fn new(
        id: impl Into<EdgeId>,
        source: Endpoint,
        target: Endpoint,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            target,
            animated: false,
            label: None,
        }
    }

    pub fn with_label(
        mut self,
        label: impl Into<String>,
    ) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn animated(
        mut self,
        animated: bool,
    ) -> Self {
        self.animated = animated;
        self
    }

    /// Whether either end of this edge is the node `nid`.
    pub fn touches(
        &self,
        nid: &str,
    ) -> bool {
        self.source.node_id == nid || self.target.node_id == nid
    }
}

impl TryFrom<EdgeMetadata> for GraphEdge {
    type Error = DesignerError;

    fn try_from(meta: EdgeMetadata) -> Result<Self> {
        if meta.id.is_empty() {
            return Err(DesignerError::Edge("missing id in edge".into()));
        }
        if meta.source.node_id.is_empty() || meta.target.node_id.is_empty() {
            return Err(DesignerError::Edge(format!("edge {} has an empty endpoint", meta.id)));
        }
        Ok(Self {
            id: meta.id,
            source: meta.source,
            target: meta.target,
            animated: meta.animated,
            label: meta.label,
        })
    }
}
