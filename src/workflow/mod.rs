pub mod analysis;
pub mod edge;
pub mod node;
mod store;
pub mod template;
pub mod validation;

pub use store::GraphStore;
