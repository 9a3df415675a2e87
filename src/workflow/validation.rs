//! Connection rules for the workflow graph.
//!
//! Checks whether an edge between two endpoints respects the node roles:
//! triggers take no input, end nodes emit no output, and condition nodes
//! only branch through their `yes` / `no` handles.

use thiserror::Error;

use crate::workflow::{
    edge::{BranchHandle, Endpoint},
    node::{NodeId, NodeKind},
};

/// Reason a connection attempt was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("node {0} not found")]
    UnknownNode(NodeId),
    #[error("cannot connect node {0} to itself")]
    SelfLoop(NodeId),
    #[error("trigger node {0} has no input")]
    TriggerInput(NodeId),
    #[error("end node {0} has no output")]
    EndOutput(NodeId),
    #[error("condition node {0} must connect through its yes or no handle")]
    MissingBranch(NodeId),
    #[error("node {node} has no handle '{handle}'")]
    UnknownHandle {
        node: NodeId,
        handle: String,
    },
    #[error("connection already exists")]
    Duplicate,
    #[error("branch '{handle}' of condition node {node} is already connected")]
    BranchOccupied {
        node: NodeId,
        handle: BranchHandle,
    },
}

/// Validates an edge against the roles of its endpoint nodes.
///
/// Does not look at the rest of the graph: existence, duplicates and branch
/// occupancy are the store's concern.
///
/// | Source      | Source handle | Target      | Target handle |
/// |-------------|---------------|-------------|---------------|
/// | Trigger     | none          | not Trigger | none          |
/// | Agent       | none          |             |               |
/// | Action      | none          |             |               |
/// | Condition   | `yes` / `no`  |             |               |
/// | End         | never         |             |               |
pub fn validate_connection(
    source: &Endpoint,
    source_kind: NodeKind,
    target: &Endpoint,
    target_kind: NodeKind,
) -> Result<(), ConnectError> {
    if source.node_id == target.node_id {
        return Err(ConnectError::SelfLoop(source.node_id.clone()));
    }
    if !source_kind.has_output() {
        return Err(ConnectError::EndOutput(source.node_id.clone()));
    }
    if !target_kind.accepts_input() {
        return Err(ConnectError::TriggerInput(target.node_id.clone()));
    }

    match (source_kind, source.handle_id.as_deref()) {
        (NodeKind::Condition, None) => return Err(ConnectError::MissingBranch(source.node_id.clone())),
        (NodeKind::Condition, Some(handle)) if source.branch().is_none() => return Err(unknown_handle(source, handle)),
        (NodeKind::Condition, Some(_)) => {}
        (_, Some(handle)) => return Err(unknown_handle(source, handle)),
        (_, None) => {}
    }

    if let Some(handle) = target.handle_id.as_deref() {
        return Err(unknown_handle(target, handle));
    }

    Ok(())
}

fn unknown_handle(
    endpoint: &Endpoint,
    handle: &str,
) -> ConnectError {
    ConnectError::UnknownHandle {
        node: endpoint.node_id.clone(),
        handle: handle.to_string(),
    }
}
