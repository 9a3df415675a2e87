mod document;
mod seed;

pub use document::GraphDocument;
pub use seed::seed_document;
