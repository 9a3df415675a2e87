use crate::{
    model::GraphDocument,
    workflow::{
        edge::{BranchHandle, Endpoint, GraphEdge},
        node::{ActionData, ActionType, AgentData, ConditionData, EndData, GraphNode, NodeData, Position, TriggerData, TriggerType},
    },
};

/// Demo workflow used to populate a brand-new editor.
///
/// A message trigger fans out to a triage agent and a support agent. The
/// support agent's answer is checked; its `no` branch ends the conversation
/// while the ticketing action waits to be wired to the `yes` branch.
pub fn seed_document() -> GraphDocument {
    let nodes = vec![
        GraphNode::new(
            "trigger-1",
            Position::new(250.0, 0.0),
            NodeData::Trigger(TriggerData {
                label: "User Message".into(),
                trigger_type: TriggerType::Message,
            }),
        ),
        GraphNode::new(
            "agent-1",
            Position::new(50.0, 150.0),
            NodeData::Agent(AgentData {
                label: "Triage Agent".into(),
                agent_id: "triage".into(),
                model: "gpt-4o".into(),
            }),
        ),
        GraphNode::new(
            "agent-2",
            Position::new(450.0, 150.0),
            NodeData::Agent(AgentData {
                label: "Support Agent".into(),
                agent_id: "support".into(),
                model: "gpt-4o-mini".into(),
            }),
        ),
        GraphNode::new(
            "condition-1",
            Position::new(450.0, 300.0),
            NodeData::Condition(ConditionData {
                label: "Needs Escalation?".into(),
                condition_expr: "response.confidence < 0.6".into(),
            }),
        ),
        GraphNode::new(
            "action-1",
            Position::new(250.0, 450.0),
            NodeData::Action(ActionData {
                label: "Create Ticket".into(),
                action_type: ActionType::ToolCall,
                tool_name: "create_ticket".into(),
            }),
        ),
        GraphNode::new(
            "end-1",
            Position::new(450.0, 600.0),
            NodeData::End(EndData {
                label: "End Conversation".into(),
            }),
        ),
    ];

    let no = BranchHandle::No;
    let edges = vec![
        GraphEdge::new("e-trigger-1-agent-1", Endpoint::node("trigger-1"), Endpoint::node("agent-1")).animated(true),
        GraphEdge::new("e-trigger-1-agent-2", Endpoint::node("trigger-1"), Endpoint::node("agent-2")).animated(true),
        GraphEdge::new("e-agent-2-condition-1", Endpoint::node("agent-2"), Endpoint::node("condition-1")),
        GraphEdge::new("e-condition-1-no-end-1", Endpoint::handle("condition-1", no.as_ref()), Endpoint::node("end-1")).with_label(no.label()),
        GraphEdge::new("e-action-1-end-1", Endpoint::node("action-1"), Endpoint::node("end-1")),
    ];

    GraphDocument {
        nodes,
        edges,
    }
}
