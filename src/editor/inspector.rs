//! Property form for the selected node.
//!
//! The panel holds no state of its own. [`InspectorPanel::view`] resolves the
//! store's selection on every call, and a missing or stale selection yields
//! [`InspectorView::Empty`].

use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::trace;

use crate::{
    Result,
    workflow::{
        GraphStore,
        node::{ActionType, GraphNode, NodeData, NodeDataPatch, NodeId, NodeKind, TriggerType},
        template::template_for,
    },
};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FieldEditor {
    Text,
    Multiline,
    Select(Vec<String>),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// data key the field writes to
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub editor: FieldEditor,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InspectorView {
    /// Nothing selected, or the selection no longer exists.
    Empty,
    Node {
        id: NodeId,
        kind: NodeKind,
        title: &'static str,
        color: &'static str,
        fields: Vec<Field>,
    },
}

impl InspectorView {
    pub fn is_empty(&self) -> bool {
        matches!(self, InspectorView::Empty)
    }

    pub fn field(
        &self,
        key: &str,
    ) -> Option<&Field> {
        match self {
            InspectorView::Empty => None,
            InspectorView::Node {
                fields,
                ..
            } => fields.iter().find(|f| f.key == key),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InspectorPanel;

impl InspectorPanel {
    pub fn view(
        &self,
        store: &GraphStore,
    ) -> InspectorView {
        match store.selected_node() {
            Some(node) => node_view(node),
            None => InspectorView::Empty,
        }
    }

    /// Write one field of a node.
    ///
    /// Returns `Ok(false)` when the node is gone, and an error when the value
    /// does not fit the field (e.g. an unknown trigger type).
    pub fn apply(
        &self,
        store: &mut GraphStore,
        nid: &str,
        key: &str,
        value: &str,
    ) -> Result<bool> {
        trace!("inspector::apply({}, {} = {:?})", nid, key, value);
        let mut patch = NodeDataPatch::new();
        patch.insert(key.to_string(), Value::String(value.to_string()));
        store.update_node_data(nid, &patch)
    }
}

fn node_view(node: &GraphNode) -> InspectorView {
    let template = template_for(node.kind());
    InspectorView::Node {
        id: node.id.clone(),
        kind: node.kind(),
        title: template.label,
        color: template.default_color,
        fields: fields(&node.data),
    }
}

fn fields(data: &NodeData) -> Vec<Field> {
    let text = |key, label, value: &str| Field {
        key,
        label,
        value: value.to_string(),
        editor: FieldEditor::Text,
    };
    match data {
        NodeData::Trigger(d) => vec![
            text("label", "Label", &d.label),
            Field {
                key: "triggerType",
                label: "Trigger Type",
                value: d.trigger_type.as_ref().to_string(),
                editor: FieldEditor::Select(TriggerType::iter().map(|t| t.as_ref().to_string()).collect()),
            },
        ],
        NodeData::Agent(d) => vec![
            text("label", "Label", &d.label),
            text("agentId", "Agent ID", &d.agent_id),
            text("model", "Model", &d.model),
        ],
        NodeData::Condition(d) => vec![
            text("label", "Label", &d.label),
            Field {
                key: "conditionExpr",
                label: "Condition",
                value: d.condition_expr.clone(),
                editor: FieldEditor::Multiline,
            },
        ],
        NodeData::Action(d) => vec![
            text("label", "Label", &d.label),
            Field {
                key: "actionType",
                label: "Action Type",
                value: d.action_type.as_ref().to_string(),
                editor: FieldEditor::Select(ActionType::iter().map(|t| t.as_ref().to_string()).collect()),
            },
            text("toolName", "Tool Name", &d.tool_name),
        ],
        NodeData::End(d) => vec![text("label", "Label", &d.label)],
    }
}
