//! Gesture state machine of the canvas.
//!
//! The host feeds pointer events (with the hit target it resolved, usually via
//! [`CanvasRenderer::hit_test`](crate::editor::canvas::CanvasRenderer::hit_test))
//! and the controller turns them into graph store mutations. All positions in
//! events are screen coordinates; the controller converts them through the
//! viewport. Each event is handled to completion before the next one, and the
//! latest pointer position always wins, so dropped move events are harmless.
//!
//! Before the first mutation of a gesture the controller records an undo
//! snapshot, making one gesture one undo step.

use tracing::{debug, trace};

use crate::{
    editor::{canvas::HitTarget, history::History, viewport::Viewport},
    workflow::{
        GraphStore,
        edge::{EdgeId, Endpoint},
        node::{NodeId, NodeKind, Position},
        validation::ConnectError,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    /// Resting state while the store holds a selection.
    NodeSelected(NodeId),
    PaletteDragging {
        kind: NodeKind,
        /// last pointer position, in screen coordinates
        cursor: Option<Position>,
    },
    NodeDragging {
        node_id: NodeId,
        /// pointer offset from the node origin, in flow units
        grab: (f64, f64),
        /// node position when the drag started
        origin: Position,
        recorded: bool,
    },
    ConnectDragging {
        source: Endpoint,
        /// last pointer position, in flow coordinates
        cursor: Position,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// A palette entry started being dragged.
    PaletteDragStart(NodeKind),
    PointerDown {
        target: HitTarget,
        position: Position,
    },
    PointerMove {
        position: Position,
    },
    PointerUp {
        target: HitTarget,
        position: Position,
    },
    /// Press and release without movement.
    Click {
        target: HitTarget,
    },
    /// Delete key.
    DeleteSelection,
    /// Escape key.
    Cancel,
}

/// What an event did to the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    None,
    NodeCreated(NodeId),
    NodeMoved(NodeId),
    Connected(EdgeId),
    /// The connection was discarded. Hosts show nothing; the edge is simply absent.
    ConnectRejected(ConnectError),
    Selected(Option<NodeId>),
    NodeDeleted(NodeId),
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    /// grid size when snap-to-grid is on
    snap: Option<f64>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(None)
    }
}

impl InteractionController {
    pub fn new(snap: Option<f64>) -> Self {
        Self {
            state: InteractionState::Idle,
            snap,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Source endpoint and flow-space cursor of an in-flight connection.
    pub fn pending_connection(&self) -> Option<(&Endpoint, Position)> {
        match &self.state {
            InteractionState::ConnectDragging {
                source,
                cursor,
            } => Some((source, *cursor)),
            _ => None,
        }
    }

    /// Drop any in-flight gesture and fall back to the resting state.
    pub fn reset(
        &mut self,
        store: &GraphStore,
    ) {
        self.state = resting(store);
    }

    /// Apply one event. This is the controller's only transition function.
    pub fn handle(
        &mut self,
        event: InteractionEvent,
        store: &mut GraphStore,
        history: &mut History,
        viewport: &Viewport,
    ) -> Outcome {
        let state = std::mem::replace(&mut self.state, InteractionState::Idle);
        trace!("interaction::handle({:?}) in {:?}", event, state);

        let (next, outcome) = match (state, event) {
            (state, InteractionEvent::Cancel) => {
                if let InteractionState::NodeDragging {
                    node_id,
                    origin,
                    recorded: true,
                    ..
                } = state
                {
                    store.move_node(&node_id, origin);
                    history.settle(&store.serialize());
                }
                (resting(store), Outcome::None)
            }

            (InteractionState::Idle | InteractionState::NodeSelected(_), InteractionEvent::PaletteDragStart(kind)) => (
                InteractionState::PaletteDragging {
                    kind,
                    cursor: None,
                },
                Outcome::None,
            ),
            (
                InteractionState::PaletteDragging {
                    kind,
                    ..
                },
                InteractionEvent::PointerMove {
                    position,
                },
            ) => (
                InteractionState::PaletteDragging {
                    kind,
                    cursor: Some(position),
                },
                Outcome::None,
            ),
            (
                InteractionState::PaletteDragging {
                    kind,
                    ..
                },
                InteractionEvent::PointerUp {
                    target,
                    position,
                },
            ) => {
                if target == HitTarget::Outside || !viewport.contains_screen(position) {
                    debug!("interaction: palette drop outside canvas");
                    (resting(store), Outcome::None)
                } else {
                    let at = self.to_flow(viewport, position);
                    history.record(store.serialize());
                    let id = store.create_node(kind, at);
                    (resting(store), Outcome::NodeCreated(id))
                }
            }

            (
                InteractionState::Idle | InteractionState::NodeSelected(_),
                InteractionEvent::PointerDown {
                    target: HitTarget::Node(node_id),
                    position,
                },
            ) => match store.node(&node_id) {
                Some(node) => {
                    let origin = node.position;
                    let grab = viewport.screen_to_flow(position).delta(&origin);
                    (
                        InteractionState::NodeDragging {
                            node_id,
                            grab,
                            origin,
                            recorded: false,
                        },
                        Outcome::None,
                    )
                }
                None => (resting(store), Outcome::None),
            },
            (
                InteractionState::NodeDragging {
                    node_id,
                    grab,
                    origin,
                    recorded,
                },
                InteractionEvent::PointerMove {
                    position,
                },
            ) => {
                if store.node(&node_id).is_none() {
                    (resting(store), Outcome::None)
                } else {
                    if !recorded {
                        history.record(store.serialize());
                    }
                    let raw = viewport.screen_to_flow(position).offset(-grab.0, -grab.1);
                    store.move_node(&node_id, self.snapped(raw));
                    (
                        InteractionState::NodeDragging {
                            node_id: node_id.clone(),
                            grab,
                            origin,
                            recorded: true,
                        },
                        Outcome::NodeMoved(node_id),
                    )
                }
            }
            (
                InteractionState::NodeDragging {
                    recorded,
                    ..
                },
                InteractionEvent::PointerUp { .. },
            ) => {
                if recorded {
                    history.settle(&store.serialize());
                }
                (resting(store), Outcome::None)
            }

            (
                InteractionState::Idle | InteractionState::NodeSelected(_),
                InteractionEvent::PointerDown {
                    target: HitTarget::OutputHandle(source),
                    position,
                },
            ) => match store.node(&source.node_id) {
                Some(node) if node.kind().has_output() => (
                    InteractionState::ConnectDragging {
                        source,
                        cursor: viewport.screen_to_flow(position),
                    },
                    Outcome::None,
                ),
                _ => (resting(store), Outcome::None),
            },
            (
                InteractionState::ConnectDragging {
                    source,
                    ..
                },
                InteractionEvent::PointerMove {
                    position,
                },
            ) => (
                InteractionState::ConnectDragging {
                    source,
                    cursor: viewport.screen_to_flow(position),
                },
                Outcome::None,
            ),
            (
                InteractionState::ConnectDragging {
                    source,
                    ..
                },
                InteractionEvent::PointerUp {
                    target: HitTarget::InputHandle(target),
                    ..
                },
            ) => {
                let outcome = match store.can_connect(&source, &target) {
                    Ok(()) => {
                        history.record(store.serialize());
                        match store.connect(source, target) {
                            Ok(id) => Outcome::Connected(id),
                            Err(e) => Outcome::ConnectRejected(e),
                        }
                    }
                    Err(e) => {
                        debug!("interaction: connection discarded: {}", e);
                        Outcome::ConnectRejected(e)
                    }
                };
                (resting(store), outcome)
            }
            (InteractionState::ConnectDragging { .. }, InteractionEvent::PointerUp { .. }) => (resting(store), Outcome::None),

            (
                InteractionState::Idle | InteractionState::NodeSelected(_),
                InteractionEvent::Click {
                    target: HitTarget::Node(node_id),
                },
            ) => {
                if store.select(Some(node_id.as_str())) {
                    (InteractionState::NodeSelected(node_id.clone()), Outcome::Selected(Some(node_id)))
                } else {
                    (resting(store), Outcome::None)
                }
            }
            (
                InteractionState::Idle | InteractionState::NodeSelected(_),
                InteractionEvent::Click {
                    target: HitTarget::Canvas,
                },
            ) => {
                store.select(None);
                (InteractionState::Idle, Outcome::Selected(None))
            }

            (InteractionState::Idle | InteractionState::NodeSelected(_), InteractionEvent::DeleteSelection) => match store.selected_id().map(str::to_string) {
                Some(id) => {
                    history.record(store.serialize());
                    store.delete_node(&id);
                    (resting(store), Outcome::NodeDeleted(id))
                }
                None => (InteractionState::Idle, Outcome::None),
            },

            (state, event) => {
                trace!("interaction: {:?} ignored in {:?}", event, state);
                (state, Outcome::None)
            }
        };

        self.state = next;
        outcome
    }

    fn to_flow(
        &self,
        viewport: &Viewport,
        position: Position,
    ) -> Position {
        self.snapped(viewport.screen_to_flow(position))
    }

    fn snapped(
        &self,
        p: Position,
    ) -> Position {
        match self.snap {
            Some(grid) => p.snapped(grid),
            None => p,
        }
    }
}

/// Resting state for the current selection.
fn resting(store: &GraphStore) -> InteractionState {
    match store.selected_id() {
        Some(id) => InteractionState::NodeSelected(id.to_string()),
        None => InteractionState::Idle,
    }
}
