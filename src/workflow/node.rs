use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};
use serde_json::{Map, Value};

use crate::{DesignerError, Result};

/// node id
pub type NodeId = String;

/// Field patch shallow-merged into a node's data payload.
pub type NodeDataPatch = Map<String, Value>;

/// Kind of a workflow node. Determines the payload shape and the connection role.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::Display, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    Trigger,
    Agent,
    Condition,
    Action,
    End,
}

impl NodeKind {
    /// Whether edges may point into this kind of node.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, NodeKind::Trigger)
    }

    /// Whether edges may leave this kind of node.
    pub fn has_output(&self) -> bool {
        !matches!(self, NodeKind::End)
    }
}

/// Canvas coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            x,
            y,
        }
    }

    pub fn offset(
        &self,
        dx: f64,
        dy: f64,
    ) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Vector from `other` to `self`.
    pub fn delta(
        &self,
        other: &Position,
    ) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }

    /// Round both coordinates to the nearest multiple of `grid`.
    pub fn snapped(
        &self,
        grid: f64,
    ) -> Self {
        Self::new((self.x / grid).round() * grid, (self.y / grid).round() * grid)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TriggerType {
    #[default]
    Manual,
    Message,
    Schedule,
    Webhook,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionType {
    #[default]
    ToolCall,
    HttpRequest,
    SendMessage,
    Handoff,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TriggerData {
    pub label: String,
    pub trigger_type: TriggerType,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AgentData {
    pub label: String,
    pub agent_id: String,
    pub model: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConditionData {
    pub label: String,
    pub condition_expr: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionData {
    pub label: String,
    pub action_type: ActionType,
    pub tool_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EndData {
    pub label: String,
}

/// Kind-specific payload of a node. The variant is the node's kind.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum NodeData {
    Trigger(TriggerData),
    Agent(AgentData),
    Condition(ConditionData),
    Action(ActionData),
    End(EndData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Trigger(_) => NodeKind::Trigger,
            NodeData::Agent(_) => NodeKind::Agent,
            NodeData::Condition(_) => NodeKind::Condition,
            NodeData::Action(_) => NodeKind::Action,
            NodeData::End(_) => NodeKind::End,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodeData::Trigger(d) => &d.label,
            NodeData::Agent(d) => &d.label,
            NodeData::Condition(d) => &d.label,
            NodeData::Action(d) => &d.label,
            NodeData::End(d) => &d.label,
        }
    }

    /// Parse a raw JSON payload as the data of a `kind` node.
    pub fn from_value(
        kind: NodeKind,
        value: Value,
    ) -> Result<Self> {
        let data = match kind {
            NodeKind::Trigger => serde_json::from_value(value).map(NodeData::Trigger),
            NodeKind::Agent => serde_json::from_value(value).map(NodeData::Agent),
            NodeKind::Condition => serde_json::from_value(value).map(NodeData::Condition),
            NodeKind::Action => serde_json::from_value(value).map(NodeData::Action),
            NodeKind::End => serde_json::from_value(value).map(NodeData::End),
        };
        data.map_err(|e| DesignerError::Node(format!("invalid {} data: {}", kind, e)))
    }

    /// Shallow-merge `patch` over this payload. The kind never changes.
    pub fn merged(
        &self,
        patch: &NodeDataPatch,
    ) -> Result<Self> {
        let mut value = serde_json::to_value(self)?;
        let Value::Object(fields) = &mut value else {
            return Err(DesignerError::Node(format!("{} data is not an object", self.kind())));
        };
        for (key, v) in patch {
            fields.insert(key.clone(), v.clone());
        }
        Self::from_value(self.kind(), value)
    }
}

#[derive(Deserialize)]
struct NodeMetadata {
    id: NodeId,
    kind: NodeKind,
    #[serde(default)]
    position: Position,
    #[serde(default = "empty_object")]
    data: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// A vertex of the workflow graph.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "NodeMetadata")]
pub struct GraphNode {
    /// node id
    pub id: NodeId,
    /// canvas position of the node's top-left corner
    pub position: Position,
    /// kind-specific payload
    pub data: NodeData,
}

impl GraphNode {
    pub fn new(
        id: impl Into<NodeId>,
        position: Position,
        data: NodeData,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            data,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn label(&self) -> &str {
        self.data.label()
    }
}

impl TryFrom<NodeMetadata> for GraphNode {
    type Error = DesignerError;

    fn try_from(meta: NodeMetadata) -> Result<Self> {
        if meta.id.is_empty() {
            return Err(DesignerError::Node("missing id in node".into()));
        }
        let data = NodeData::from_value(meta.kind, meta.data)?;
        Ok(Self {
            id: meta.id,
            position: meta.position,
            data,
        })
    }
}

impl Serialize for GraphNode {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GraphNode", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("data", &self.data)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_node_json_shape() {
        let node = GraphNode::new(
            "agent-1",
            Position::new(10.0, 20.0),
            NodeData::Agent(AgentData {
                label: "Researcher".into(),
                agent_id: "research".into(),
                model: "gpt-4o".into(),
            }),
        );
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "agent-1",
                "kind": "agent",
                "position": {"x": 10.0, "y": 20.0},
                "data": {"label": "Researcher", "agentId": "research", "model": "gpt-4o"}
            })
        );
    }

    #[test]
    fn test_node_parse_checks_data_against_kind() {
        let ok = json!({"id": "c", "kind": "condition", "position": {"x": 0, "y": 0}, "data": {"label": "Check", "conditionExpr": "x > 1"}});
        let node: GraphNode = serde_json::from_value(ok).unwrap();
        assert_eq!(node.kind(), NodeKind::Condition);

        let bad = json!({"id": "c", "kind": "condition", "data": {"label": "Check", "toolName": "search"}});
        assert!(serde_json::from_value::<GraphNode>(bad).is_err());
    }

    #[test]
    fn test_node_parse_rejects_empty_id() {
        let value = json!({"id": "", "kind": "end"});
        assert!(serde_json::from_value::<GraphNode>(value).is_err());
    }

    #[test]
    fn test_merge_is_shallow_and_keeps_kind() {
        let data = NodeData::Action(ActionData {
            label: "Search".into(),
            action_type: ActionType::ToolCall,
            tool_name: "web_search".into(),
        });
        let mut patch = NodeDataPatch::new();
        patch.insert("toolName".into(), json!("kb_lookup"));

        let merged = data.merged(&patch).unwrap();
        let NodeData::Action(action) = merged else {
            panic!("kind changed");
        };
        assert_eq!(action.label, "Search");
        assert_eq!(action.tool_name, "kb_lookup");
    }

    #[test]
    fn test_merge_rejects_wrong_field() {
        let data = NodeData::End(EndData {
            label: "Done".into(),
        });
        let mut patch = NodeDataPatch::new();
        patch.insert("model".into(), json!("gpt-4o"));
        assert!(data.merged(&patch).is_err());

        let mut patch = NodeDataPatch::new();
        patch.insert("label".into(), json!(42));
        assert!(data.merged(&patch).is_err());
    }

    #[test]
    fn test_position_snapped() {
        let p = Position::new(22.0, 37.0).snapped(15.0);
        assert_eq!(p, Position::new(15.0, 30.0));
    }
}
