//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Command error: {0}")]
    Command(#[from] crate::command::CommandError),

    #[error("Document error: {0}")]
    Document(#[from] pagebuilder_document::DocumentError),
}
