//! # Actflow Designer
//!
//! Headless core of a visual workflow graph editor. It owns the workflow
//! graph (trigger, agent, condition, action and end nodes joined by edges)
//! and everything needed to edit it from a canvas UI, without drawing a
//! single pixel itself.
//!
//! ## Core Features
//!
//! - **Graph Store**: id-keyed node and edge maps with cascade delete and validated connections
//! - **Gesture State Machine**: palette drops, node drags and connection drags from synthetic pointer events
//! - **Inspector & Canvas Projection**: per-kind property forms, node rectangles, handles and Bézier edges
//! - **Toolbar**: save, JSON export, templates, snapshot undo/redo, zoom and fit view
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use actflow_designer::{DesignerBuilder, InteractionEvent, NodeKind, Position};
//!
//! let mut designer = DesignerBuilder::new().build()?;
//! designer.handle(InteractionEvent::PaletteDragStart(NodeKind::Action));
//! let at = Position::new(400.0, 300.0);
//! designer.handle(InteractionEvent::PointerUp { target: designer.hit_test(at), position: at });
//!
//! let scene = designer.render();
//! let json = designer.document().to_json()?;
//! ```

mod builder;
mod common;
mod config;
mod designer;
mod error;
mod utils;

pub mod editor;
pub mod events;
pub mod model;
pub mod store;
pub mod workflow;

use std::sync::{Arc, RwLock};

pub use builder::DesignerBuilder;
pub use config::{CanvasConfig, Config, ConnectionConfig, HistoryConfig, ViewportConfig};
pub use designer::Designer;
pub use editor::{
    canvas::{HitTarget, Scene},
    interaction::{InteractionEvent, Outcome},
    toolbar::{Notice, Toolbar, ToolbarCommand},
};
pub use error::DesignerError;
pub use model::GraphDocument;
pub use workflow::{
    GraphStore,
    edge::{Endpoint, GraphEdge},
    node::{GraphNode, NodeData, NodeKind, Position},
    validation::ConnectError,
};

/// Result type alias for designer operations.
pub type Result<T> = std::result::Result<T, DesignerError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = Arc<RwLock<T>>;
