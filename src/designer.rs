//! The editor session.
//!
//! A [`Designer`] owns the graph store together with the editor state around
//! it (gesture controller, undo history, viewport, renderer). Hosts forward
//! input events to [`Designer::handle`] and draw [`Designer::render`].

use tracing::{debug, info};

use crate::{
    Config, Result,
    editor::{
        canvas::{CanvasRenderer, HitTarget, Scene},
        history::History,
        inspector::{InspectorPanel, InspectorView},
        interaction::{InteractionController, InteractionEvent, Outcome},
        toolbar::ToolbarState,
        viewport::Viewport,
    },
    events::GraphEvent,
    model::GraphDocument,
    workflow::{
        GraphStore,
        analysis::{GraphReport, analyze},
        node::Position,
    },
};

#[derive(Debug)]
pub struct Designer {
    store: GraphStore,
    controller: InteractionController,
    history: History,
    viewport: Viewport,
    renderer: CanvasRenderer,
    inspector: InspectorPanel,
    config: Config,
}

impl Designer {
    pub fn new(
        config: Config,
        doc: GraphDocument,
    ) -> Result<Self> {
        let store = GraphStore::from_document(doc, config.connection.clone())?;
        let snap = config.canvas.snap_to_grid.then_some(config.canvas.grid_size);
        info!("designer: opened graph with {} nodes, {} edges", store.node_count(), store.edge_count());

        Ok(Self {
            store,
            controller: InteractionController::new(snap),
            history: History::new(config.history.capacity),
            viewport: Viewport::new(config.viewport.clone()),
            renderer: CanvasRenderer::new(config.canvas.clone()),
            inspector: InspectorPanel,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read access to the graph. Writes go through the designer.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn subscribe(&mut self) -> flume::Receiver<GraphEvent> {
        self.store.subscribe()
    }

    pub fn handle(
        &mut self,
        event: InteractionEvent,
    ) -> Outcome {
        self.controller.handle(event, &mut self.store, &mut self.history, &self.viewport)
    }

    /// Resolve a screen point against the current frame.
    pub fn hit_test(
        &self,
        screen: Position,
    ) -> HitTarget {
        if !self.viewport.contains_screen(screen) {
            return HitTarget::Outside;
        }
        let scene = self.renderer.render(&self.store);
        self.renderer.hit_test(&scene, self.viewport.screen_to_flow(screen))
    }

    /// Current frame, including the curve of a connection being dragged.
    pub fn render(&self) -> Scene {
        let mut scene = self.renderer.render(&self.store);
        if let Some((source, cursor)) = self.controller.pending_connection() {
            scene.connection_preview = self.renderer.preview(&self.store, source, cursor);
        }
        scene
    }

    pub fn inspector(&self) -> InspectorView {
        self.inspector.view(&self.store)
    }

    /// Inspector edit of one field, as its own undo step.
    pub fn edit_field(
        &mut self,
        nid: &str,
        key: &str,
        value: &str,
    ) -> Result<bool> {
        self.history.record(self.store.serialize());
        let applied = self.inspector.apply(&mut self.store, nid, key, value);
        self.history.settle(&self.store.serialize());
        applied
    }

    pub fn delete_edge(
        &mut self,
        eid: &str,
    ) -> bool {
        if self.store.edge(eid).is_none() {
            return false;
        }
        self.history.record(self.store.serialize());
        self.store.delete_edge(eid)
    }

    /// Replace the whole graph. The previous graph becomes an undo step.
    pub fn load(
        &mut self,
        doc: GraphDocument,
    ) -> Result<()> {
        let previous = self.store.serialize();
        self.store.load(doc)?;
        self.history.record(previous);
        self.controller.reset(&self.store);
        Ok(())
    }

    pub fn document(&self) -> GraphDocument {
        self.store.serialize()
    }

    pub fn undo(&mut self) -> Result<bool> {
        let Some(previous) = self.history.undo(self.store.serialize()) else {
            return Ok(false);
        };
        debug!("designer: undo");
        self.store.load(previous)?;
        self.controller.reset(&self.store);
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool> {
        let Some(next) = self.history.redo(self.store.serialize()) else {
            return Ok(false);
        };
        debug!("designer: redo");
        self.store.load(next)?;
        self.controller.reset(&self.store);
        Ok(true)
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn fit_view(&mut self) {
        self.viewport.fit_view(self.renderer.bounds(&self.store));
    }

    pub fn toolbar_state(&self) -> ToolbarState {
        ToolbarState {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            zoom_percent: self.viewport.zoom_percent(),
        }
    }

    pub fn report(&self) -> GraphReport {
        analyze(&self.store.serialize())
    }
}
