use crate::{
    Config, Designer, Result,
    model::{GraphDocument, seed_document},
};

pub struct DesignerBuilder {
    config: Config,
    document: Option<GraphDocument>,
}

impl Default for DesignerBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            document: None,
        }
    }
}

impl DesignerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(
        mut self,
        config: Config,
    ) -> Self {
        self.config = config;
        self
    }

    /// Open `document` instead of the seed workflow.
    pub fn document(
        mut self,
        document: GraphDocument,
    ) -> Self {
        self.document = Some(document);
        self
    }

    /// Start from an empty canvas.
    pub fn empty(self) -> Self {
        self.document(GraphDocument::default())
    }

    pub fn build(self) -> Result<Designer> {
        let document = self.document.unwrap_or_else(seed_document);
        Designer::new(self.config, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DesignerError,
        workflow::edge::{Endpoint, GraphEdge},
    };

    #[test]
    fn test_build_defaults_to_seed() {
        let designer = DesignerBuilder::new().build().unwrap();
        assert_eq!(designer.document(), seed_document());
        assert_eq!(designer.config().history.capacity, 100);
    }

    #[test]
    fn test_build_with_config() {
        let config = Config::load_from_str("[history]\ncapacity = 1\n[canvas]\nsnap_to_grid = true").unwrap();
        let designer = DesignerBuilder::new().config(config).empty().build().unwrap();
        assert!(designer.document().is_empty());
        assert!(designer.config().canvas.snap_to_grid);
    }

    #[test]
    fn test_build_rejects_invalid_document() {
        let mut doc = seed_document();
        doc.edges.push(GraphEdge::new("e-x", Endpoint::node("agent-1"), Endpoint::node("trigger-1")));
        assert!(matches!(DesignerBuilder::new().document(doc).build(), Err(DesignerError::Graph(_))));
    }
}
