//! External collaborators of the toolbar.
//!
//! The designer never talks to a backend directly: saving goes through a
//! [`PersistenceService`] and template loading through a [`TemplateService`].
//! Both exchange whole [`GraphDocument`]s and report failures as
//! [`DesignerError`](crate::DesignerError)s so the caller can surface them
//! without touching the graph.
//!
//! - `MemPersistence` / `StaticTemplates`: in-memory, for tests and demos
//! - `FilePersistence` / `TemplateDir`: JSON files on disk

mod file;
mod mem;

use crate::{Result, model::GraphDocument};

pub use file::{FilePersistence, TemplateDir, export_json};
pub use mem::{BLANK, MemPersistence, SUPPORT_TRIAGE, StaticTemplates};

/// Sink for saved workflows.
pub trait PersistenceService: Send + Sync {
    fn save(
        &self,
        doc: &GraphDocument,
    ) -> Result<()>;
}

/// Source of ready-made workflows.
pub trait TemplateService: Send + Sync {
    fn load_template(
        &self,
        template_id: &str,
    ) -> Result<GraphDocument>;

    /// Ids of the templates this service can load.
    fn list(&self) -> Result<Vec<String>>;
}
