//! Error types for the document model

use thiserror::Error;

/// Structural violations of an element tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Duplicate element id: {0}")]
    DuplicateId(String),

    #[error("Element {0} is not a container and cannot own children")]
    NotAContainer(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Moving {node} under {parent} would create a cycle")]
    CycleDetected { node: String, parent: String },
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document must contain at least one page")]
    NoPages,

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid element tree: {0}")]
    Tree(#[from] TreeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
