//! Catalog of spawnable node kinds.
//!
//! The palette lists these templates; dropping one on the canvas creates a
//! node seeded with [`NodeTemplate::default_data`].

use serde::Serialize;

use crate::workflow::node::{ActionData, ActionType, AgentData, ConditionData, EndData, NodeData, NodeKind, TriggerData, TriggerType};

/// Model preselected for freshly spawned agent nodes.
pub const DEFAULT_AGENT_MODEL: &str = "gpt-4o";

/// Palette entry describing a node kind.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTemplate {
    pub kind: NodeKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    /// hex color used for the node accent
    pub default_color: &'static str,
}

const TEMPLATES: [NodeTemplate; 5] = [
    template_for(NodeKind::Trigger),
    template_for(NodeKind::Agent),
    template_for(NodeKind::Condition),
    template_for(NodeKind::Action),
    template_for(NodeKind::End),
];

/// All templates in palette order.
pub fn templates() -> &'static [NodeTemplate] {
    &TEMPLATES
}

pub const fn template_for(kind: NodeKind) -> NodeTemplate {
    match kind {
        NodeKind::Trigger => NodeTemplate {
            kind,
            label: "Trigger",
            icon: "zap",
            description: "Starts the workflow when an event occurs",
            default_color: "#f59e0b",
        },
        NodeKind::Agent => NodeTemplate {
            kind,
            label: "Agent",
            icon: "bot",
            description: "Hands the conversation to an AI agent",
            default_color: "#6366f1",
        },
        NodeKind::Condition => NodeTemplate {
            kind,
            label: "Condition",
            icon: "git-branch",
            description: "Routes the flow along a yes or no branch",
            default_color: "#ec4899",
        },
        NodeKind::Action => NodeTemplate {
            kind,
            label: "Action",
            icon: "wrench",
            description: "Calls a tool or performs a side effect",
            default_color: "#10b981",
        },
        NodeKind::End => NodeTemplate {
            kind,
            label: "End",
            icon: "flag",
            description: "Terminates the workflow",
            default_color: "#64748b",
        },
    }
}

impl NodeTemplate {
    /// Payload of a freshly spawned node of this kind.
    pub fn default_data(&self) -> NodeData {
        match self.kind {
            NodeKind::Trigger => NodeData::Trigger(TriggerData {
                label: "New Trigger".into(),
                trigger_type: TriggerType::default(),
            }),
            NodeKind::Agent => NodeData::Agent(AgentData {
                label: "New Agent".into(),
                agent_id: String::new(),
                model: DEFAULT_AGENT_MODEL.into(),
            }),
            NodeKind::Condition => NodeData::Condition(ConditionData {
                label: "New Condition".into(),
                condition_expr: String::new(),
            }),
            NodeKind::Action => NodeData::Action(ActionData {
                label: "New Action".into(),
                action_type: ActionType::default(),
                tool_name: String::new(),
            }),
            NodeKind::End => NodeData::End(EndData {
                label: "End".into(),
            }),
        }
    }
}
