//! Change notifications emitted by the graph store.
//!
//! Every successful mutation broadcasts one [`GraphEvent`] to all subscribers.
//! No-op calls (stale ids, rejected connections) emit nothing.

use crate::workflow::{
    edge::EdgeId,
    node::{NodeId, NodeKind},
};

#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    NodeCreated {
        id: NodeId,
        kind: NodeKind,
    },
    NodeMoved(NodeId),
    NodeUpdated(NodeId),
    /// A node was removed together with the listed incident edges.
    NodeDeleted {
        id: NodeId,
        edges: Vec<EdgeId>,
    },
    EdgeCreated(EdgeId),
    EdgeDeleted(EdgeId),
    SelectionChanged(Option<NodeId>),
    /// The whole graph was replaced by a loaded document.
    Loaded,
}

impl GraphEvent {
    pub fn str(&self) -> &str {
        match self {
            GraphEvent::NodeCreated { .. } => "NodeCreated",
            GraphEvent::NodeMoved(_) => "NodeMoved",
            GraphEvent::NodeUpdated(_) => "NodeUpdated",
            GraphEvent::NodeDeleted { .. } => "NodeDeleted",
            GraphEvent::EdgeCreated(_) => "EdgeCreated",
            GraphEvent::EdgeDeleted(_) => "EdgeDeleted",
            GraphEvent::SelectionChanged(_) => "SelectionChanged",
            GraphEvent::Loaded => "Loaded",
        }
    }

    /// Whether the event changed the persisted document, as opposed to
    /// transient editor state such as the selection.
    pub fn is_structural(&self) -> bool {
        !matches!(self, GraphEvent::SelectionChanged(_))
    }
}
