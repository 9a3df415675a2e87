//! Error types for the designer.
//!
//! All fallible operations return `DesignerError`. Rejected connections are
//! reported separately through [`ConnectError`](crate::ConnectError), since they
//! are an expected outcome of a gesture rather than a failure.

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all designer operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum DesignerError {
    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, TOML).
    #[error("{0}")]
    Convert(String),

    /// Whole-graph errors, e.g. a document that breaks a structural invariant.
    #[error("{0}")]
    Graph(String),

    /// Node definition or payload errors.
    #[error("{0}")]
    Node(String),

    /// Edge definition errors.
    #[error("{0}")]
    Edge(String),

    /// Persistence collaborator failures.
    #[error("{0}")]
    Persistence(String),

    /// Template collaborator failures.
    #[error("{0}")]
    Template(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl From<DesignerError> for String {
    fn from(val: DesignerError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for DesignerError {
    fn from(error: std::io::Error) -> Self {
        DesignerError::IoError(error.to_string())
    }
}

impl From<DesignerError> for std::io::Error {
    fn from(val: DesignerError) -> Self {
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<serde_json::Error> for DesignerError {
    fn from(error: serde_json::Error) -> Self {
        DesignerError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for DesignerError {
    fn from(error: toml::de::Error) -> Self {
        DesignerError::Config(error.to_string())
    }
}
