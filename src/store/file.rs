use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::trace;

use crate::{
    DesignerError, Result,
    model::GraphDocument,
    store::{PersistenceService, TemplateService},
};

const TEMPLATE_EXT: &str = "json";

/// Writes the document as pretty JSON to a fixed path.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new<T: AsRef<Path>>(path: T) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceService for FilePersistence {
    fn save(
        &self,
        doc: &GraphDocument,
    ) -> Result<()> {
        export_json(doc, &self.path).map_err(|e| DesignerError::Persistence(e.to_string()))
    }
}

/// Serves `<dir>/<template id>.json` files.
#[derive(Debug, Clone)]
pub struct TemplateDir {
    dir: PathBuf,
}

impl TemplateDir {
    pub fn new<T: AsRef<Path>>(dir: T) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_of(
        &self,
        template_id: &str,
    ) -> Result<PathBuf> {
        let valid = !template_id.is_empty() && template_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DesignerError::Template(format!("invalid template id {:?}", template_id)));
        }
        Ok(self.dir.join(format!("{}.{}", template_id, TEMPLATE_EXT)))
    }
}

impl TemplateService for TemplateDir {
    fn load_template(
        &self,
        template_id: &str,
    ) -> Result<GraphDocument> {
        let path = self.path_of(template_id)?;
        trace!("TemplateDir::load_template({:?})", path);
        let data = fs::read_to_string(&path).map_err(|e| DesignerError::Template(format!("failed to read template {:?}: {}", path, e)))?;
        GraphDocument::from_json(&data).map_err(|e| DesignerError::Template(format!("template {} is malformed: {}", template_id, e)))
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| DesignerError::Template(format!("failed to list {:?}: {}", self.dir, e)))?;
        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(TEMPLATE_EXT))
            .filter_map(|path| path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string))
            .collect();
        ids.sort();
        Ok(ids)
    }
}

/// Write `doc` as the `{nodes, edges}` JSON file format.
pub fn export_json<T: AsRef<Path>>(
    doc: &GraphDocument,
    path: T,
) -> Result<()> {
    let json = doc.to_json()?;
    trace!("export_json({:?}, {} bytes)", path.as_ref(), json.len());
    fs::write(path.as_ref(), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::model::seed_document;

    #[test]
    fn test_file_persistence_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePersistence::new(dir.path().join("workflow.json"));
        store.save(&seed_document()).unwrap();

        let data = fs::read_to_string(store.path()).unwrap();
        assert_eq!(GraphDocument::from_json(&data).unwrap(), seed_document());

        let value: Value = serde_json::from_str(&data).unwrap();
        let mut keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["edges", "nodes"]);
    }

    #[test]
    fn test_file_persistence_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePersistence::new(dir.path().join("missing").join("workflow.json"));
        assert!(matches!(store.save(&seed_document()), Err(DesignerError::Persistence(_))));
    }

    #[test]
    fn test_template_dir() {
        let dir = tempfile::tempdir().unwrap();
        export_json(&seed_document(), dir.path().join("support.json")).unwrap();
        fs::write(dir.path().join("broken.json"), "{\"nodes\": 3}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let templates = TemplateDir::new(dir.path());
        assert_eq!(templates.list().unwrap(), vec!["broken".to_string(), "support".to_string()]);
        assert_eq!(templates.load_template("support").unwrap(), seed_document());
        assert!(matches!(templates.load_template("broken"), Err(DesignerError::Template(_))));
        assert!(matches!(templates.load_template("absent"), Err(DesignerError::Template(_))));
        assert!(matches!(templates.load_template("../etc/passwd"), Err(DesignerError::Template(_))));
    }
}
