pub mod apply;
pub mod init;
pub mod inspect;
pub mod preview;

pub use apply::{apply, ApplyArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use preview::{preview, PreviewArgs};

use anyhow::{Context, Result};
use pagebuilder_document::Document;
use std::path::Path;

/// Read and validate a document JSON file
pub(crate) fn read_document(path: &Path) -> Result<Document> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read document {}", path.display()))?;
    let document = Document::from_json(&source)
        .with_context(|| format!("Invalid document {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        pages = document.pages.len(),
        elements = document.element_count(),
        "document loaded"
    );
    Ok(document)
}

pub(crate) fn write_document(path: &Path, document: &Document) -> Result<()> {
    std::fs::write(path, document.to_json_pretty()?)
        .with_context(|| format!("Cannot write document {}", path.display()))
}
