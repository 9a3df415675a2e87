//! Authoritative owner of the workflow graph being edited.
//!
//! Nodes and edges are kept in id-keyed maps with per-node adjacency sets, so
//! every gesture-driven mutation (move, connect, delete) touches only the
//! entries involved instead of scanning the whole graph. Insertion order is
//! tracked with a sequence number and restored when the graph is listed or
//! serialized.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use tracing::{debug, trace};

use crate::{
    DesignerError, Result,
    common::BroadcastQueue,
    config::ConnectionConfig,
    events::GraphEvent,
    model::GraphDocument,
    utils,
    workflow::{
        edge::{EdgeId, Endpoint, GraphEdge},
        node::{GraphNode, NodeDataPatch, NodeId, NodeKind, Position},
        template::template_for,
        validation::{ConnectError, validate_connection},
    },
};

struct Entry<T> {
    seq: u64,
    item: T,
}

/// Node and edge collections plus the indexes derived from them.
#[derive(Default)]
struct Graph {
    nodes: HashMap<NodeId, Entry<GraphNode>>,
    edges: HashMap<EdgeId, Entry<GraphEdge>>,
    outgoing: HashMap<NodeId, HashSet<EdgeId>>,
    incoming: HashMap<NodeId, HashSet<EdgeId>>,
    links: HashSet<(Endpoint, Endpoint)>,
    next_seq: u64,
}

impl Graph {
    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn insert_node(
        &mut self,
        node: GraphNode,
    ) {
        let seq = self.seq();
        self.outgoing.entry(node.id.clone()).or_default();
        self.incoming.entry(node.id.clone()).or_default();
        self.nodes.insert(
            node.id.clone(),
            Entry {
                seq,
                item: node,
            },
        );
    }

    fn insert_edge(
        &mut self,
        edge: GraphEdge,
    ) {
        let seq = self.seq();
        self.outgoing.entry(edge.source.node_id.clone()).or_default().insert(edge.id.clone());
        self.incoming.entry(edge.target.node_id.clone()).or_default().insert(edge.id.clone());
        self.links.insert((edge.source.clone(), edge.target.clone()));
        self.edges.insert(
            edge.id.clone(),
            Entry {
                seq,
                item: edge,
            },
        );
    }

    fn remove_edge(
        &mut self,
        eid: &str,
    ) -> Option<GraphEdge> {
        let edge = self.edges.remove(eid)?.item;
        if let Some(out) = self.outgoing.get_mut(&edge.source.node_id) {
            out.remove(eid);
        }
        if let Some(inc) = self.incoming.get_mut(&edge.target.node_id) {
            inc.remove(eid);
        }
        self.links.remove(&(edge.source.clone(), edge.target.clone()));
        Some(edge)
    }

    fn sorted_edges<'a>(
        &'a self,
        ids: impl Iterator<Item = &'a EdgeId>,
    ) -> Vec<&'a GraphEdge> {
        let mut entries: Vec<&Entry<GraphEdge>> = ids.filter_map(|id| self.edges.get(id)).collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| &e.item).collect()
    }
}

/// Single source of truth for the nodes, edges and selection of the editor.
///
/// All other components read from the store and mutate it exclusively
/// through its methods. Every successful mutation is broadcast as a
/// [`GraphEvent`] to subscribers.
pub struct GraphStore {
    graph: Graph,
    selected: Option<NodeId>,
    rules: ConnectionConfig,
    events: BroadcastQueue<GraphEvent>,
    /// bumped by every structural change
    revision: u64,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GraphStore {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("nodes", &self.graph.nodes.len())
            .field("edges", &self.graph.edges.len())
            .field("selected", &self.selected)
            .finish()
    }
}

impl GraphStore {
    /// create an empty store with the default connection rules
    pub fn new() -> Self {
        Self::with_rules(ConnectionConfig::default())
    }

    /// create an empty store with the given connection rules
    pub fn with_rules(rules: ConnectionConfig) -> Self {
        Self {
            graph: Graph::default(),
            selected: None,
            rules,
            events: BroadcastQueue::new(),
            revision: 0,
        }
    }

    /// create a store populated from a document
    pub fn from_document(
        doc: GraphDocument,
        rules: ConnectionConfig,
    ) -> Result<Self> {
        let mut store = Self::with_rules(rules);
        store.populate(doc)?;
        Ok(store)
    }

    /// Subscribe to change events.
    pub fn subscribe(&mut self) -> flume::Receiver<GraphEvent> {
        self.events.subscribe()
    }

    /// Spawn a node of `kind` at `position` seeded from its template.
    pub fn create_node(
        &mut self,
        kind: NodeKind,
        position: Position,
    ) -> NodeId {
        let id = self.fresh_node_id(kind);
        let node = GraphNode::new(id.clone(), position, template_for(kind).default_data());
        trace!("store::create_node({}, {:?})", id, position);
        self.graph.insert_node(node);
        self.emit(GraphEvent::NodeCreated {
            id: id.clone(),
            kind,
        });
        id
    }

    /// Overwrite the position of a node. Returns false for an unknown id.
    pub fn move_node(
        &mut self,
        nid: &str,
        position: Position,
    ) -> bool {
        let Some(entry) = self.graph.nodes.get_mut(nid) else {
            return false;
        };
        entry.item.position = position;
        self.emit(GraphEvent::NodeMoved(nid.to_string()));
        true
    }

    /// Shallow-merge `patch` into the data of a node.
    ///
    /// Returns `Ok(false)` for an unknown id, and an error if the patched
    /// payload no longer fits the node's kind (in which case nothing changes).
    pub fn update_node_data(
        &mut self,
        nid: &str,
        patch: &NodeDataPatch,
    ) -> Result<bool> {
        let Some(entry) = self.graph.nodes.get_mut(nid) else {
            return Ok(false);
        };
        let data = entry.item.data.merged(patch)?;
        trace!("store::update_node_data({}, {:?})", nid, patch);
        entry.item.data = data;
        self.emit(GraphEvent::NodeUpdated(nid.to_string()));
        Ok(true)
    }

    /// Remove a node and every edge that starts or ends at it.
    ///
    /// Returns the ids of the removed edges, or `None` for an unknown id.
    pub fn delete_node(
        &mut self,
        nid: &str,
    ) -> Option<Vec<EdgeId>> {
        self.graph.nodes.remove(nid)?;

        let outgoing = self.graph.outgoing.remove(nid).unwrap_or_default();
        let incoming = self.graph.incoming.remove(nid).unwrap_or_default();
        let mut incident: Vec<(u64, EdgeId)> =
            outgoing.into_iter().chain(incoming).filter_map(|eid| self.graph.edges.get(&eid).map(|e| (e.seq, eid))).collect();
        incident.sort();
        incident.dedup();

        let removed: Vec<EdgeId> = incident.into_iter().filter_map(|(_, eid)| self.graph.remove_edge(&eid).map(|e| e.id)).collect();
        trace!("store::delete_node({}) cascades {:?}", nid, removed);

        if self.selected.as_deref() == Some(nid) {
            self.selected = None;
            self.emit(GraphEvent::SelectionChanged(None));
        }
        self.emit(GraphEvent::NodeDeleted {
            id: nid.to_string(),
            edges: removed.clone(),
        });
        Some(removed)
    }

    /// Check whether an edge from `source` to `target` would be accepted.
    pub fn can_connect(
        &self,
        source: &Endpoint,
        target: &Endpoint,
    ) -> std::result::Result<(), ConnectError> {
        let source_kind = self.kind_of(&source.node_id)?;
        let target_kind = self.kind_of(&target.node_id)?;
        validate_connection(source, source_kind, target, target_kind)?;

        if self.graph.links.contains(&(source.clone(), target.clone())) {
            return Err(ConnectError::Duplicate);
        }

        if self.rules.single_edge_per_branch && source_kind == NodeKind::Condition {
            if let Some(branch) = source.branch() {
                let occupied = self.outgoing_edges(&source.node_id).iter().any(|e| e.source.branch() == Some(branch));
                if occupied {
                    return Err(ConnectError::BranchOccupied {
                        node: source.node_id.clone(),
                        handle: branch,
                    });
                }
            }
        }

        Ok(())
    }

    /// Connect two endpoints with a fresh animated edge.
    ///
    /// A rejected connection leaves the graph untouched.
    pub fn connect(
        &mut self,
        source: Endpoint,
        target: Endpoint,
    ) -> std::result::Result<EdgeId, ConnectError> {
        if let Err(e) = self.can_connect(&source, &target) {
            debug!("store::connect rejected: {}", e);
            return Err(e);
        }
        let id = self.fresh_edge_id(&source, &target);
        trace!("store::connect({:?} -> {:?}) as {}", source, target, id);
        self.graph.insert_edge(GraphEdge::new(id.clone(), source, target).animated(true));
        self.emit(GraphEvent::EdgeCreated(id.clone()));
        Ok(id)
    }

    /// Remove an edge. Returns false for an unknown id.
    pub fn delete_edge(
        &mut self,
        eid: &str,
    ) -> bool {
        if self.graph.remove_edge(eid).is_none() {
            return false;
        }
        trace!("store::delete_edge({})", eid);
        self.emit(GraphEvent::EdgeDeleted(eid.to_string()));
        true
    }

    /// Replace the selection. Selecting an unknown id is ignored and returns false.
    pub fn select(
        &mut self,
        nid: Option<&str>,
    ) -> bool {
        if let Some(id) = nid {
            if !self.graph.nodes.contains_key(id) {
                debug!("store::select ignored unknown node {}", id);
                return false;
            }
        }
        if self.selected.as_deref() != nid {
            self.selected = nid.map(str::to_string);
            let selected = self.selected.clone();
            self.emit(GraphEvent::SelectionChanged(selected));
        }
        true
    }

    /// Counter of structural changes (everything but selection), for
    /// hosts tracking unsaved edits.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.selected.as_deref().and_then(|id| self.node(id))
    }

    pub fn node(
        &self,
        nid: &str,
    ) -> Option<&GraphNode> {
        self.graph.nodes.get(nid).map(|e| &e.item)
    }

    pub fn edge(
        &self,
        eid: &str,
    ) -> Option<&GraphEdge> {
        self.graph.edges.get(eid).map(|e| &e.item)
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edges.len()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> Vec<&GraphNode> {
        let mut entries: Vec<&Entry<GraphNode>> = self.graph.nodes.values().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| &e.item).collect()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> Vec<&GraphEdge> {
        self.graph.sorted_edges(self.graph.edges.keys())
    }

    pub fn outgoing_edges(
        &self,
        nid: &str,
    ) -> Vec<&GraphEdge> {
        match self.graph.outgoing.get(nid) {
            Some(ids) => self.graph.sorted_edges(ids.iter()),
            None => Vec::new(),
        }
    }

    pub fn incoming_edges(
        &self,
        nid: &str,
    ) -> Vec<&GraphEdge> {
        match self.graph.incoming.get(nid) {
            Some(ids) => self.graph.sorted_edges(ids.iter()),
            None => Vec::new(),
        }
    }

    /// Snapshot the graph as a persistable document (no selection).
    pub fn serialize(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes().into_iter().cloned().collect(),
            edges: self.edges().into_iter().cloned().collect(),
        }
    }

    /// Replace the graph with `doc`.
    ///
    /// The document is validated in full first; if any node or edge breaks a
    /// structural rule the store is left untouched. The selection survives
    /// only if the selected node exists in the new graph.
    pub fn load(
        &mut self,
        doc: GraphDocument,
    ) -> Result<()> {
        let mut next = GraphStore::with_rules(self.rules.clone());
        next.populate(doc)?;
        self.graph = next.graph;
        debug!("store::load({} nodes, {} edges)", self.graph.nodes.len(), self.graph.edges.len());

        if let Some(id) = self.selected.as_deref() {
            if !self.graph.nodes.contains_key(id) {
                self.selected = None;
                self.emit(GraphEvent::SelectionChanged(None));
            }
        }
        self.emit(GraphEvent::Loaded);
        Ok(())
    }

    /// Human-readable representation of the graph.
    pub fn schema(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Workflow Graph ===".to_string());
        lines.push(format!("Nodes: {}, Edges: {}", self.node_count(), self.edge_count()));
        lines.push(String::new());

        lines.push("--- Nodes ---".to_string());
        for node in self.nodes() {
            let mark = if self.selected.as_deref() == Some(node.id.as_str()) { " *" } else { "" };
            lines.push(format!("[{}] {} (kind: {}){}", node.id, node.label(), node.kind().as_ref(), mark));
        }
        lines.push(String::new());

        lines.push("--- Edges ---".to_string());
        for edge in self.edges() {
            let handle = edge.source.handle_id.as_deref().unwrap_or("source");
            lines.push(format!("{} --[{}]--> {} (id: {})", edge.source.node_id, handle, edge.target.node_id, edge.id));
        }

        lines.join("\n")
    }

    fn populate(
        &mut self,
        doc: GraphDocument,
    ) -> Result<()> {
        for node in doc.nodes {
            if self.graph.nodes.contains_key(&node.id) {
                return Err(DesignerError::Graph(format!("duplicate node id {}", node.id)));
            }
            self.graph.insert_node(node);
        }
        for edge in doc.edges {
            if self.graph.edges.contains_key(&edge.id) {
                return Err(DesignerError::Graph(format!("duplicate edge id {}", edge.id)));
            }
            self.can_connect(&edge.source, &edge.target).map_err(|e| DesignerError::Graph(format!("edge {}: {}", edge.id, e)))?;
            self.graph.insert_edge(edge);
        }
        Ok(())
    }

    fn emit(
        &mut self,
        event: GraphEvent,
    ) {
        trace!("store: emit {}", event.str());
        if event.is_structural() {
            self.revision += 1;
        }
        self.events.send(event);
    }

    fn kind_of(
        &self,
        nid: &str,
    ) -> std::result::Result<NodeKind, ConnectError> {
        self.node(nid).map(|n| n.kind()).ok_or_else(|| ConnectError::UnknownNode(nid.to_string()))
    }

    fn fresh_node_id(
        &self,
        kind: NodeKind,
    ) -> NodeId {
        let base = format!("{}-{}", kind, utils::time::time_millis());
        let mut id = base.clone();
        while self.graph.nodes.contains_key(&id) {
            id = format!("{}-{}", base, utils::shortid());
        }
        id
    }

    fn fresh_edge_id(
        &self,
        source: &Endpoint,
        target: &Endpoint,
    ) -> EdgeId {
        let base = match source.handle_id.as_deref() {
            Some(handle) => format!("e-{}-{}-{}", source.node_id, handle, target.node_id),
            None => format!("e-{}-{}", source.node_id, target.node_id),
        };
        let mut id = base.clone();
        while self.graph.edges.contains_key(&id) {
            id = format!("{}-{}", base, utils::shortid());
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::seed_document;

    fn seeded() -> GraphStore {
        GraphStore::from_document(seed_document(), ConnectionConfig::default()).unwrap()
    }

    /// Re-checks the structural rules against the public view of the store.
    fn assert_invariants(store: &GraphStore) {
        let mut node_ids = HashSet::new();
        for node in store.nodes() {
            assert!(node_ids.insert(node.id.clone()), "duplicate node {}", node.id);
        }
        let mut edge_ids = HashSet::new();
        for edge in store.edges() {
            assert!(edge_ids.insert(edge.id.clone()), "duplicate edge {}", edge.id);
            let source = store.node(&edge.source.node_id).expect("dangling source");
            let target = store.node(&edge.target.node_id).expect("dangling target");
            assert_ne!(target.kind(), NodeKind::Trigger, "edge {} enters a trigger", edge.id);
            assert_ne!(source.kind(), NodeKind::End, "edge {} leaves an end", edge.id);
            if source.kind() == NodeKind::Condition {
                assert!(edge.source.branch().is_some(), "edge {} leaves a condition without branch", edge.id);
            }
        }
        if let Some(id) = store.selected_id() {
            assert!(store.node(id).is_some(), "stale selection {}", id);
        }
    }

    #[test]
    fn test_seed_loads() {
        let store = seeded();
        assert_eq!(store.node_count(), 6);
        assert_eq!(store.edge_count(), 5);
        let ids: Vec<&str> = store.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["trigger-1", "agent-1", "agent-2", "condition-1", "action-1", "end-1"]);
        assert_invariants(&store);
    }

    #[test]
    fn test_create_node_keeps_existing_edges() {
        let mut store = seeded();
        let before: Vec<GraphEdge> = store.edges().into_iter().cloned().collect();

        let id = store.create_node(NodeKind::Action, Position::new(10.0, 10.0));

        assert_eq!(store.node_count(), 7);
        assert!(id.starts_with("action-"));
        let node = store.node(&id).unwrap();
        assert_eq!(node.position, Position::new(10.0, 10.0));
        assert_eq!(node.label(), "New Action");
        let after: Vec<GraphEdge> = store.edges().into_iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_create_node_ids_are_unique() {
        let mut store = GraphStore::new();
        let ids: HashSet<NodeId> = (0..50).map(|_| store.create_node(NodeKind::Agent, Position::default())).collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(store.node_count(), 50);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut store = seeded();
        let result = store.connect(Endpoint::node("action-1"), Endpoint::node("action-1"));
        assert_eq!(result, Err(ConnectError::SelfLoop("action-1".into())));
        assert_eq!(store.edge_count(), 5);
    }

    #[test]
    fn test_connect_condition_branch() {
        let mut store = seeded();
        let id = store.connect(Endpoint::handle("condition-1", "yes"), Endpoint::node("action-1")).unwrap();

        let edge = store.edge(&id).unwrap();
        assert_eq!(edge.source.handle_id.as_deref(), Some("yes"));
        assert_eq!(edge.label, None);
        assert!(edge.animated);
        assert_eq!(store.edge_count(), 6);
        assert_invariants(&store);
    }

    #[test]
    fn test_connect_twice_creates_one_edge() {
        let mut store = seeded();
        let source = Endpoint::node("agent-1");
        let target = Endpoint::node("action-1");
        assert!(store.connect(source.clone(), target.clone()).is_ok());
        assert_eq!(store.connect(source, target), Err(ConnectError::Duplicate));
        assert_eq!(store.edge_count(), 6);
    }

    #[test]
    fn test_role_violations_rejected() {
        let mut store = seeded();
        assert_eq!(
            store.connect(Endpoint::node("agent-1"), Endpoint::node("trigger-1")),
            Err(ConnectError::TriggerInput("trigger-1".into()))
        );
        assert_eq!(
            store.connect(Endpoint::node("end-1"), Endpoint::node("agent-1")),
            Err(ConnectError::EndOutput("end-1".into()))
        );
        assert_eq!(
            store.connect(Endpoint::node("ghost"), Endpoint::node("agent-1")),
            Err(ConnectError::UnknownNode("ghost".into()))
        );
        assert_eq!(store.edge_count(), 5);
    }

    #[test]
    fn test_branch_occupancy_enforced_by_default() {
        let mut store = seeded();
        // the seed already wires condition-1's `no` branch to end-1
        let result = store.connect(Endpoint::handle("condition-1", "no"), Endpoint::node("action-1"));
        assert!(matches!(result, Err(ConnectError::BranchOccupied { .. })));
        assert_eq!(store.edge_count(), 5);
    }

    #[test]
    fn test_branch_occupancy_can_be_relaxed() {
        let rules = ConnectionConfig {
            single_edge_per_branch: false,
        };
        let mut store = GraphStore::from_document(seed_document(), rules).unwrap();
        assert!(store.connect(Endpoint::handle("condition-1", "no"), Endpoint::node("action-1")).is_ok());
        assert_eq!(store.outgoing_edges("condition-1").len(), 2);
        assert_invariants(&store);
    }

    #[test]
    fn test_delete_node_cascades_exactly() {
        let mut store = seeded();
        store.select(Some("agent-1"));

        let removed = store.delete_node("agent-1").unwrap();

        assert_eq!(removed, vec!["e-trigger-1-agent-1".to_string()]);
        assert_eq!(store.node_count(), 5);
        assert_eq!(store.edge_count(), 4);
        assert!(store.node("agent-1").is_none());
        assert_eq!(store.selected_id(), None);
        assert!(store.edges().iter().all(|e| !e.touches("agent-1")));
        assert_invariants(&store);
    }

    #[test]
    fn test_delete_node_with_in_and_out_edges() {
        let mut store = seeded();
        let removed = store.delete_node("end-1").unwrap();
        assert_eq!(removed, vec!["e-condition-1-no-end-1".to_string(), "e-action-1-end-1".to_string()]);
        assert_eq!(store.edge_count(), 3);
        // the freed branch can be reused
        assert!(store.connect(Endpoint::handle("condition-1", "no"), Endpoint::node("action-1")).is_ok());
    }

    #[test]
    fn test_stale_ids_are_noops() {
        let mut store = seeded();
        store.delete_node("agent-1");
        assert!(!store.move_node("agent-1", Position::new(1.0, 1.0)));
        assert_eq!(store.update_node_data("agent-1", &NodeDataPatch::new()), Ok(false));
        assert_eq!(store.delete_node("agent-1"), None);
        assert!(!store.delete_edge("e-trigger-1-agent-1"));
        assert!(!store.select(Some("agent-1")));
        assert_eq!(store.node_count(), 5);
    }

    #[test]
    fn test_update_node_data() {
        let mut store = seeded();
        let mut patch = NodeDataPatch::new();
        patch.insert("model".into(), json!("gpt-4.1"));
        assert_eq!(store.update_node_data("agent-1", &patch), Ok(true));
        assert_eq!(store.node("agent-1").unwrap().label(), "Triage Agent");

        let mut bad = NodeDataPatch::new();
        bad.insert("conditionExpr".into(), json!("x"));
        assert!(store.update_node_data("agent-1", &bad).is_err());
        let value = serde_json::to_value(store.node("agent-1").unwrap()).unwrap();
        assert_eq!(value["data"]["model"], json!("gpt-4.1"));
    }

    #[test]
    fn test_select_replaces_previous() {
        let mut store = seeded();
        assert!(store.select(Some("agent-1")));
        assert!(store.select(Some("agent-2")));
        assert_eq!(store.selected_node().map(|n| n.id.as_str()), Some("agent-2"));
        assert!(store.select(None));
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_revision_counts_structural_changes() {
        let mut store = seeded();
        assert_eq!(store.revision(), 0);
        store.select(Some("agent-1"));
        assert_eq!(store.revision(), 0);

        store.move_node("agent-1", Position::new(60.0, 160.0));
        store.connect(Endpoint::handle("condition-1", "yes"), Endpoint::node("action-1")).unwrap();
        assert_eq!(store.revision(), 2);

        // the cascade clears the selection too, which is not counted
        store.delete_node("agent-1");
        assert_eq!(store.revision(), 3);

        assert!(store.connect(Endpoint::node("action-1"), Endpoint::node("action-1")).is_err());
        assert!(!store.delete_edge("ghost"));
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn test_round_trip() {
        let mut store = seeded();
        store.create_node(NodeKind::Condition, Position::new(5.0, 5.0));
        store.connect(Endpoint::handle("condition-1", "yes"), Endpoint::node("action-1")).unwrap();
        store.select(Some("agent-2"));

        let doc = store.serialize();
        let json = doc.to_json().unwrap();
        let mut other = GraphStore::new();
        other.load(GraphDocument::from_json(&json).unwrap()).unwrap();

        assert_eq!(other.serialize(), doc);
        assert_eq!(other.selected_id(), None);
        assert!(!json.contains("selected"));
    }

    #[test]
    fn test_load_rejects_invalid_document_without_partial_apply() {
        let mut store = seeded();
        let mut doc = store.serialize();
        doc.edges.push(GraphEdge::new("bad", Endpoint::node("agent-1"), Endpoint::node("nowhere")));

        assert!(store.load(doc).is_err());
        assert_eq!(store.node_count(), 6);
        assert_eq!(store.edge_count(), 5);

        let mut doc = seed_document();
        doc.nodes.push(doc.nodes[0].clone());
        assert!(store.load(doc).is_err());

        let mut doc = seed_document();
        doc.edges.push(GraphEdge::new("loop", Endpoint::node("end-1"), Endpoint::node("trigger-1")));
        assert!(store.load(doc).is_err());
        assert_invariants(&store);
    }

    #[test]
    fn test_load_keeps_valid_selection() {
        let mut store = seeded();
        store.select(Some("agent-2"));
        store.load(seed_document()).unwrap();
        assert_eq!(store.selected_id(), Some("agent-2"));

        store.load(GraphDocument::default()).unwrap();
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_events_follow_mutations() {
        let mut store = seeded();
        let rx = store.subscribe();

        let id = store.create_node(NodeKind::End, Position::default());
        store.move_node(&id, Position::new(3.0, 4.0));
        let _ = store.connect(Endpoint::node("action-1"), Endpoint::node("action-1"));
        store.select(Some(id.as_str()));
        store.delete_node(&id);

        let events: Vec<GraphEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                GraphEvent::NodeCreated {
                    id: id.clone(),
                    kind: NodeKind::End
                },
                GraphEvent::NodeMoved(id.clone()),
                GraphEvent::SelectionChanged(Some(id.clone())),
                GraphEvent::SelectionChanged(None),
                GraphEvent::NodeDeleted {
                    id,
                    edges: vec![]
                },
            ]
        );
    }

    #[test]
    fn test_invariants_hold_under_mutation_sequence() {
        let mut store = seeded();
        let kinds = [NodeKind::Trigger, NodeKind::Agent, NodeKind::Condition, NodeKind::Action, NodeKind::End];
        let handles = [None, Some("yes"), Some("no"), Some("other")];
        // deterministic linear congruential sequence
        let mut state: u64 = 0x2545_f491;
        let mut next = |bound: usize| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as usize) % bound
        };

        for step in 0..400 {
            let ids: Vec<NodeId> = store.nodes().iter().map(|n| n.id.clone()).collect();
            match next(5) {
                0 => {
                    store.create_node(kinds[next(kinds.len())], Position::new(step as f64, 0.0));
                }
                1 | 2 if !ids.is_empty() => {
                    let source = match handles[next(handles.len())] {
                        Some(h) => Endpoint::handle(ids[next(ids.len())].clone(), h),
                        None => Endpoint::node(ids[next(ids.len())].clone()),
                    };
                    let target = Endpoint::node(ids[next(ids.len())].clone());
                    let _ = store.connect(source, target);
                }
                3 if !ids.is_empty() => {
                    let victim = ids[next(ids.len())].clone();
                    let expected: HashSet<EdgeId> = store.edges().iter().filter(|e| e.touches(&victim)).map(|e| e.id.clone()).collect();
                    let survivors: HashSet<EdgeId> = store.edges().iter().filter(|e| !e.touches(&victim)).map(|e| e.id.clone()).collect();
                    let removed: HashSet<EdgeId> = store.delete_node(&victim).unwrap().into_iter().collect();
                    assert_eq!(removed, expected);
                    let remaining: HashSet<EdgeId> = store.edges().iter().map(|e| e.id.clone()).collect();
                    assert_eq!(remaining, survivors);
                }
                4 => {
                    let edges: Vec<EdgeId> = store.edges().iter().map(|e| e.id.clone()).collect();
                    if !edges.is_empty() {
                        store.delete_edge(&edges[next(edges.len())]);
                    }
                    if !ids.is_empty() {
                        store.select(Some(ids[next(ids.len())].as_str()));
                    }
                }
                _ => {}
            }
            assert_invariants(&store);
        }

        let doc = store.serialize();
        let reloaded = GraphStore::from_document(doc.clone(), ConnectionConfig::default()).unwrap();
        assert_eq!(reloaded.serialize(), doc);
    }

    #[test]
    fn test_schema_lists_nodes_and_edges() {
        let store = seeded();
        let schema = store.schema();
        assert!(schema.contains("Nodes: 6, Edges: 5"));
        assert!(schema.contains("[condition-1] Needs Escalation? (kind: condition)"));
        assert!(schema.contains("condition-1 --[no]--> end-1"));
    }
}
