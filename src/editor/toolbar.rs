//! Whole-graph commands.
//!
//! Commands that talk to a collaborator never leave the graph half-applied:
//! a failed save changes nothing, and a template is loaded only after it has
//! been fetched and validated. Failures come back as an error [`Notice`] for
//! the host to show.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    Designer, Result,
    store::{PersistenceService, TemplateService, export_json},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarCommand {
    Save,
    ExportJson(PathBuf),
    LoadTemplate(String),
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    FitView,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Feedback shown to the user after a command.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_ref(), self.message)
    }
}

/// Enablement and labels of the toolbar buttons.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub zoom_percent: u32,
}

#[derive(Clone)]
pub struct Toolbar {
    persistence: Arc<dyn PersistenceService>,
    templates: Arc<dyn TemplateService>,
}

impl fmt::Debug for Toolbar {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Toolbar").finish_non_exhaustive()
    }
}

impl Toolbar {
    pub fn new(
        persistence: Arc<dyn PersistenceService>,
        templates: Arc<dyn TemplateService>,
    ) -> Self {
        Self {
            persistence,
            templates,
        }
    }

    pub fn execute(
        &self,
        designer: &mut Designer,
        command: ToolbarCommand,
    ) -> Notice {
        match command {
            ToolbarCommand::Save => match self.save(designer) {
                Ok(()) => Notice::info("Workflow saved"),
                Err(e) => Notice::error(format!("Save failed: {}", e)),
            },
            ToolbarCommand::ExportJson(path) => match self.export_json(designer, &path) {
                Ok(()) => Notice::info(format!("Exported to {}", path.display())),
                Err(e) => Notice::error(format!("Export failed: {}", e)),
            },
            ToolbarCommand::LoadTemplate(id) => match self.load_template(designer, &id) {
                Ok(()) => Notice::info(format!("Loaded template {}", id)),
                Err(e) => Notice::error(format!("Could not load template {}: {}", id, e)),
            },
            ToolbarCommand::Undo => match designer.undo() {
                Ok(true) => Notice::info("Undone"),
                Ok(false) => Notice::info("Nothing to undo"),
                Err(e) => Notice::error(format!("Undo failed: {}", e)),
            },
            ToolbarCommand::Redo => match designer.redo() {
                Ok(true) => Notice::info("Redone"),
                Ok(false) => Notice::info("Nothing to redo"),
                Err(e) => Notice::error(format!("Redo failed: {}", e)),
            },
            ToolbarCommand::ZoomIn => {
                designer.zoom_in();
                Notice::info(format!("{}%", designer.viewport().zoom_percent()))
            }
            ToolbarCommand::ZoomOut => {
                designer.zoom_out();
                Notice::info(format!("{}%", designer.viewport().zoom_percent()))
            }
            ToolbarCommand::FitView => {
                designer.fit_view();
                Notice::info(format!("{}%", designer.viewport().zoom_percent()))
            }
        }
    }

    pub fn save(
        &self,
        designer: &Designer,
    ) -> Result<()> {
        let doc = designer.document();
        info!("toolbar: saving {} nodes, {} edges", doc.nodes.len(), doc.edges.len());
        self.persistence.save(&doc).inspect_err(|e| warn!("toolbar: save failed: {}", e))
    }

    pub fn export_json(
        &self,
        designer: &Designer,
        path: &Path,
    ) -> Result<()> {
        info!("toolbar: exporting to {:?}", path);
        export_json(&designer.document(), path).inspect_err(|e| warn!("toolbar: export failed: {}", e))
    }

    /// Replace the graph with a template. The replaced graph stays on the
    /// undo stack.
    pub fn load_template(
        &self,
        designer: &mut Designer,
        template_id: &str,
    ) -> Result<()> {
        info!("toolbar: loading template {}", template_id);
        let doc = self.templates.load_template(template_id).inspect_err(|e| warn!("toolbar: template fetch failed: {}", e))?;
        designer.load(doc).inspect_err(|e| warn!("toolbar: template rejected: {}", e))
    }
}
