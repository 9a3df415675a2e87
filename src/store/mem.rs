use std::{
    collections::BTreeMap,
    sync::{
        Arc, RwLock,
        atomic::{AtomicBool, Ordering},
    },
};

use tracing::trace;

use crate::{
    DesignerError, Result, ShareLock,
    model::{GraphDocument, seed_document},
    store::{PersistenceService, TemplateService},
};

/// Keeps every saved document in memory.
#[derive(Debug, Clone, Default)]
pub struct MemPersistence {
    saved: ShareLock<Vec<GraphDocument>>,
    offline: Arc<AtomicBool>,
}

impl MemPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail as if the backend were unreachable.
    pub fn set_offline(
        &self,
        offline: bool,
    ) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn last(&self) -> Option<GraphDocument> {
        self.saved.read().ok().and_then(|saved| saved.last().cloned())
    }

    pub fn count(&self) -> usize {
        self.saved.read().map(|saved| saved.len()).unwrap_or_default()
    }
}

impl PersistenceService for MemPersistence {
    fn save(
        &self,
        doc: &GraphDocument,
    ) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DesignerError::Persistence("persistence backend is offline".into()));
        }
        let mut saved = self.saved.write().map_err(|e| DesignerError::Persistence(e.to_string()))?;
        trace!("MemPersistence::save({} nodes, {} edges)", doc.nodes.len(), doc.edges.len());
        saved.push(doc.clone());
        Ok(())
    }
}

/// Id of the built-in support triage template.
pub const SUPPORT_TRIAGE: &str = "support-triage";
/// Id of the built-in empty template.
pub const BLANK: &str = "blank";

/// Templates registered in memory.
#[derive(Debug, Clone)]
pub struct StaticTemplates {
    templates: ShareLock<BTreeMap<String, GraphDocument>>,
}

impl Default for StaticTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticTemplates {
    /// Ships with `support-triage` (the seed workflow) and `blank`.
    pub fn new() -> Self {
        let templates = BTreeMap::from([(SUPPORT_TRIAGE.to_string(), seed_document()), (BLANK.to_string(), GraphDocument::default())]);
        Self {
            templates: Arc::new(RwLock::new(templates)),
        }
    }

    pub fn register(
        &self,
        id: &str,
        doc: GraphDocument,
    ) -> Result<()> {
        let mut templates = self.templates.write().map_err(|e| DesignerError::Template(e.to_string()))?;
        templates.insert(id.to_string(), doc);
        Ok(())
    }
}

impl TemplateService for StaticTemplates {
    fn load_template(
        &self,
        template_id: &str,
    ) -> Result<GraphDocument> {
        let templates = self.templates.read().map_err(|e| DesignerError::Template(e.to_string()))?;
        templates.get(template_id).cloned().ok_or_else(|| DesignerError::Template(format!("template {} not found", template_id)))
    }

    fn list(&self) -> Result<Vec<String>> {
        let templates = self.templates.read().map_err(|e| DesignerError::Template(e.to_string()))?;
        Ok(templates.keys().cloned().collect())
    }
}
