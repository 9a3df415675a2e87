//! Projection of the graph into drawable geometry.
//!
//! The renderer owns no graph state: every call to [`CanvasRenderer::render`]
//! reads the live node positions from the store, so edge endpoints follow a
//! node while it is being dragged.

use serde::Serialize;

use crate::{
    config::CanvasConfig,
    editor::viewport::Rect,
    workflow::{
        GraphStore,
        edge::{BranchHandle, EdgeId, Endpoint, GraphEdge, HandleId},
        node::{GraphNode, NodeData, NodeId, NodeKind, Position},
        template::template_for,
    },
};

/// Curvature used for edge control points.
const EDGE_CURVATURE: f64 = 0.25;

/// What lies under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    Node(NodeId),
    OutputHandle(Endpoint),
    InputHandle(Endpoint),
    /// Empty canvas background.
    Canvas,
    /// Anywhere off the canvas element, e.g. back over the palette.
    Outside,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HandleRole {
    Input,
    Output,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HandleView {
    pub role: HandleRole,
    pub handle_id: Option<HandleId>,
    pub anchor: Position,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub icon: &'static str,
    pub color: &'static str,
    pub rect: Rect,
    pub selected: bool,
    /// Kind-specific summary lines drawn under the label.
    pub body: Vec<String>,
    pub handles: Vec<HandleView>,
}

/// Cubic Bézier curve between two handle anchors.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BezierPath {
    pub start: Position,
    pub c1: Position,
    pub c2: Position,
    pub end: Position,
}

impl BezierPath {
    /// Curve leaving `start` downwards and entering `end` from above.
    pub fn vertical(
        start: Position,
        end: Position,
    ) -> Self {
        let offset = control_offset(end.y - start.y);
        Self {
            start,
            c1: Position::new(start.x, start.y + offset),
            c2: Position::new(end.x, end.y - offset),
            end,
        }
    }

    pub fn point_at(
        &self,
        t: f64,
    ) -> Position {
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Position::new(
            a * self.start.x + b * self.c1.x + c * self.c2.x + d * self.end.x,
            a * self.start.y + b * self.c1.y + c * self.c2.y + d * self.end.y,
        )
    }

    pub fn to_svg(&self) -> String {
        format!(
            "M{},{} C{},{} {},{} {},{}",
            self.start.x, self.start.y, self.c1.x, self.c1.y, self.c2.x, self.c2.y, self.end.x, self.end.y
        )
    }
}

fn control_offset(distance: f64) -> f64 {
    if distance >= 0.0 { 0.5 * distance } else { EDGE_CURVATURE * 25.0 * (-distance).sqrt() }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EdgeView {
    pub id: EdgeId,
    pub path: BezierPath,
    pub svg: String,
    pub label: Option<String>,
    pub label_position: Position,
    pub animated: bool,
}

/// Everything a host needs to draw one frame, in flow coordinates.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    /// Curve following the cursor while a connection is being dragged.
    pub connection_preview: Option<BezierPath>,
}

#[derive(Debug, Clone)]
pub struct CanvasRenderer {
    config: CanvasConfig,
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CanvasRenderer {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
        }
    }

    pub fn render(
        &self,
        store: &GraphStore,
    ) -> Scene {
        let selected = store.selected_id();
        let nodes = store.nodes().into_iter().map(|node| self.node_view(node, selected == Some(node.id.as_str()))).collect();
        let edges = store.edges().into_iter().filter_map(|edge| self.edge_view(store, edge)).collect();
        Scene {
            nodes,
            edges,
            connection_preview: None,
        }
    }

    /// Preview curve from a source handle to the cursor.
    pub fn preview(
        &self,
        store: &GraphStore,
        source: &Endpoint,
        cursor: Position,
    ) -> Option<BezierPath> {
        let node = store.node(&source.node_id)?;
        let start = self.output_anchor(node, source.handle_id.as_deref())?;
        Some(BezierPath::vertical(start, cursor))
    }

    pub fn node_rect(
        &self,
        node: &GraphNode,
    ) -> Rect {
        Rect::new(node.position.x, node.position.y, self.config.node_width, self.config.node_height)
    }

    /// Bounding box of all nodes, `None` for an empty graph.
    pub fn bounds(
        &self,
        store: &GraphStore,
    ) -> Option<Rect> {
        store.nodes().into_iter().map(|n| self.node_rect(n)).reduce(|acc, r| acc.union(&r))
    }

    /// Resolve what lies under a flow-space point. Handles win over node
    /// bodies, and later (topmost) nodes win over earlier ones.
    pub fn hit_test(
        &self,
        scene: &Scene,
        point: Position,
    ) -> HitTarget {
        let radius = self.config.handle_radius;
        for node in scene.nodes.iter().rev() {
            for handle in node.handles.iter() {
                let (dx, dy) = point.delta(&handle.anchor);
                if dx * dx + dy * dy <= radius * radius {
                    let endpoint = Endpoint {
                        node_id: node.id.clone(),
                        handle_id: handle.handle_id.clone(),
                    };
                    return match handle.role {
                        HandleRole::Input => HitTarget::InputHandle(endpoint),
                        HandleRole::Output => HitTarget::OutputHandle(endpoint),
                    };
                }
            }
        }
        scene.nodes.iter().rev().find(|n| n.rect.contains(point)).map(|n| HitTarget::Node(n.id.clone())).unwrap_or(HitTarget::Canvas)
    }

    fn node_view(
        &self,
        node: &GraphNode,
        selected: bool,
    ) -> NodeView {
        let template = template_for(node.kind());
        NodeView {
            id: node.id.clone(),
            kind: node.kind(),
            label: node.label().to_string(),
            icon: template.icon,
            color: template.default_color,
            rect: self.node_rect(node),
            selected,
            body: body_lines(&node.data),
            handles: self.handles(node),
        }
    }

    fn handles(
        &self,
        node: &GraphNode,
    ) -> Vec<HandleView> {
        let input = HandleView {
            role: HandleRole::Input,
            handle_id: None,
            anchor: self.input_anchor(node),
        };
        let output = |handle: Option<BranchHandle>| HandleView {
            role: HandleRole::Output,
            handle_id: handle.map(|h| h.as_ref().to_string()),
            anchor: self.branch_anchor(node, handle),
        };
        match node.kind() {
            NodeKind::Trigger => vec![output(None)],
            NodeKind::Agent | NodeKind::Action => vec![input, output(None)],
            NodeKind::Condition => vec![input, output(Some(BranchHandle::Yes)), output(Some(BranchHandle::No))],
            NodeKind::End => vec![input],
        }
    }

    fn input_anchor(
        &self,
        node: &GraphNode,
    ) -> Position {
        node.position.offset(self.config.node_width / 2.0, 0.0)
    }

    fn branch_anchor(
        &self,
        node: &GraphNode,
        handle: Option<BranchHandle>,
    ) -> Position {
        let fraction = match handle {
            None => 0.5,
            Some(BranchHandle::Yes) => 0.25,
            Some(BranchHandle::No) => 0.75,
        };
        node.position.offset(self.config.node_width * fraction, self.config.node_height)
    }

    fn output_anchor(
        &self,
        node: &GraphNode,
        handle: Option<&str>,
    ) -> Option<Position> {
        match (node.kind(), handle) {
            (NodeKind::End, _) => None,
            (NodeKind::Condition, Some(h)) => h.parse::<BranchHandle>().ok().map(|b| self.branch_anchor(node, Some(b))),
            (NodeKind::Condition, None) => None,
            (NodeKind::Trigger | NodeKind::Agent | NodeKind::Action, _) => Some(self.branch_anchor(node, None)),
        }
    }

    fn edge_view(
        &self,
        store: &GraphStore,
        edge: &GraphEdge,
    ) -> Option<EdgeView> {
        let source = store.node(&edge.source.node_id)?;
        let target = store.node(&edge.target.node_id)?;
        let path = BezierPath::vertical(self.output_anchor(source, edge.source.handle_id.as_deref())?, self.input_anchor(target));
        Some(EdgeView {
            id: edge.id.clone(),
            svg: path.to_svg(),
            label: edge.label.clone(),
            label_position: path.point_at(0.5),
            animated: edge.animated,
            path,
        })
    }
}

fn body_lines(data: &NodeData) -> Vec<String> {
    match data {
        NodeData::Trigger(d) => vec![format!("on {}", d.trigger_type.as_ref())],
        NodeData::Agent(d) => {
            let mut lines = vec![d.model.clone()];
            if !d.agent_id.is_empty() {
                lines.push(format!("agent: {}", d.agent_id));
            }
            lines
        }
        NodeData::Condition(d) if d.condition_expr.is_empty() => vec!["(no condition)".to_string()],
        NodeData::Condition(d) => vec![d.condition_expr.clone()],
        NodeData::Action(d) if d.tool_name.is_empty() => vec![d.action_type.as_ref().to_string()],
        NodeData::Action(d) => vec![format!("{}: {}", d.action_type.as_ref(), d.tool_name)],
        NodeData::End(_) => Vec::new(),
    }
}
