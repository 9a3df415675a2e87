use serde::{Deserialize, Serialize};

use crate::{
    DesignerError, Result,
    workflow::{edge::GraphEdge, node::GraphNode},
};

/// Persisted shape of a workflow graph: nodes and edges, nothing transient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl GraphDocument {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<GraphDocument>(s).map_err(|e| DesignerError::Convert(format!("invalid graph document: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
