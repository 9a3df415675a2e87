//! Structural report over a workflow document.
//!
//! Builds a directed graph (using petgraph) from the document and points out
//! shapes that are legal to author but probably unintended: nodes no trigger
//! can reach, nodes other than `end` with nowhere to go, and cycles. The
//! report is advisory and never blocks an edit.

use std::collections::HashMap;

use petgraph::{
    algo::is_cyclic_directed,
    graph::{DiGraph, NodeIndex},
    visit::Dfs,
};
use serde::Serialize;

use crate::{
    model::GraphDocument,
    workflow::node::{NodeId, NodeKind},
};

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphReport {
    /// nodes not reachable from any trigger, in document order
    pub unreachable: Vec<NodeId>,
    /// non-end nodes without outgoing edges, in document order
    pub dead_ends: Vec<NodeId>,
    pub has_cycle: bool,
}

impl GraphReport {
    pub fn is_clean(&self) -> bool {
        self.unreachable.is_empty() && self.dead_ends.is_empty() && !self.has_cycle
    }
}

pub fn analyze(doc: &GraphDocument) -> GraphReport {
    let mut graph: DiGraph<(NodeId, NodeKind), ()> = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();

    for node in doc.nodes.iter() {
        let idx = graph.add_node((node.id.clone(), node.kind()));
        index.insert(node.id.as_str(), idx);
    }
    for edge in doc.edges.iter() {
        if let (Some(s), Some(t)) = (index.get(edge.source.node_id.as_str()), index.get(edge.target.node_id.as_str())) {
            graph.add_edge(*s, *t, ());
        }
    }

    let mut reached = vec![false; graph.node_count()];
    for root in graph.node_indices().filter(|idx| graph[*idx].1 == NodeKind::Trigger) {
        let mut dfs = Dfs::new(&graph, root);
        while let Some(idx) = dfs.next(&graph) {
            reached[idx.index()] = true;
        }
    }

    let unreachable = graph.node_indices().filter(|idx| !reached[idx.index()]).map(|idx| graph[idx].0.clone()).collect();
    let dead_ends = graph
        .node_indices()
        .filter(|idx| graph[*idx].1 != NodeKind::End && graph.neighbors(*idx).next().is_none())
        .map(|idx| graph[idx].0.clone())
        .collect();

    GraphReport {
        unreachable,
        dead_ends,
        has_cycle: is_cyclic_directed(&graph),
    }
}
