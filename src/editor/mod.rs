//! Editor layer on top of the graph store: gestures, inspector form, canvas
//! projection, viewport, undo history and toolbar commands.

pub mod canvas;
pub mod history;
pub mod inspector;
pub mod interaction;
pub mod toolbar;
pub mod viewport;
