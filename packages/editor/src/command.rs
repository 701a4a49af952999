//! # Commands
//!
//! Every edit the builder UI can make, as a serializable value.
//!
//! ## Semantics
//!
//! ### Element commands
//! - `AddElement` inserts a whole subtree; ids must be new to the page
//! - `UpdateElement` shallow-patches one node; `props` replaces the map
//! - `DeleteElement` removes the node and its subtree
//! - `MoveElement` reparents within a page and refuses cycles
//!
//! ### Page commands
//! - `ApplyTemplate` swaps every page for one fresh page built from the
//!   template, with new element ids
//!
//! ### Tolerance
//! - Unknown element, connection or page ids on update/delete are no-ops: the
//!   command applies cleanly and produces an equal document
//! - Structural violations (duplicate ids, children on a leaf, cycles, missing
//!   insert target) are errors and leave the document untouched

use pagebuilder_document::{
    ConnectionId, ConnectionPatch, Document, DocumentError, Element, ElementId, ElementPatch,
    NewConnection, PageId, PagePatch, PageTemplate,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Insert `element` (and its children) under `parent_id`, or at top level
    AddElement {
        page_id: PageId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<ElementId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
        element: Element,
    },

    UpdateElement {
        page_id: PageId,
        element_id: ElementId,
        patch: ElementPatch,
    },

    DeleteElement {
        page_id: PageId,
        element_id: ElementId,
    },

    /// Move an element to a new parent (or top level) at index
    MoveElement {
        page_id: PageId,
        element_id: ElementId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_parent_id: Option<ElementId>,
        index: usize,
    },

    AddConnection {
        connection: NewConnection,
    },

    UpdateConnection {
        connection_id: ConnectionId,
        patch: ConnectionPatch,
    },

    DeleteConnection {
        connection_id: ConnectionId,
    },

    AddPage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    DeletePage {
        page_id: PageId,
    },

    DuplicatePage {
        page_id: PageId,
    },

    UpdatePage {
        page_id: PageId,
        patch: PagePatch,
    },

    ApplyTemplate {
        template: PageTemplate,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Empty {0}")]
    EmptyId(&'static str),

    #[error("Connection cannot link an element to itself: {0}")]
    SelfConnection(String),

    #[error("{0}")]
    Rejected(String),
}

impl From<DocumentError> for CommandError {
    fn from(e: DocumentError) -> Self {
        CommandError::Rejected(e.to_string())
    }
}

/// Result of applying a command to a document
#[derive(Debug, Clone)]
pub struct Applied {
    pub document: Document,
    /// Id of the element, connection or page the command created
    pub created: Option<String>,
}

impl Command {
    /// Apply to `doc`, returning the next document
    pub fn apply(&self, doc: &Document) -> Result<Applied, CommandError> {
        self.validate()?;

        let mut created = None;
        let document = match self {
            Command::AddElement {
                page_id,
                parent_id,
                index,
                element,
            } => {
                let next = doc.insert_element(page_id, parent_id.as_deref(), *index, element.clone())?;
                created = Some(element.id().to_string());
                next
            }

            Command::UpdateElement {
                page_id,
                element_id,
                patch,
            } => doc.update_element(page_id, element_id, patch),

            Command::DeleteElement {
                page_id,
                element_id,
            } => doc.remove_element(page_id, element_id),

            Command::MoveElement {
                page_id,
                element_id,
                new_parent_id,
                index,
            } => doc.move_element(page_id, element_id, new_parent_id.as_deref(), *index)?,

            Command::AddConnection { connection } => {
                let (next, id) = doc.add_connection(connection.clone());
                created = Some(id);
                next
            }

            Command::UpdateConnection {
                connection_id,
                patch,
            } => doc.update_connection(connection_id, patch),

            Command::DeleteConnection { connection_id } => doc.delete_connection(connection_id),

            Command::AddPage { name } => {
                let (next, id) = doc.add_page(name.clone());
                created = Some(id);
                next
            }

            Command::DeletePage { page_id } => doc.delete_page(page_id),

            Command::DuplicatePage { page_id } => match doc.duplicate_page(page_id) {
                Some((next, id)) => {
                    created = Some(id);
                    next
                }
                None => doc.clone(),
            },

            Command::UpdatePage { page_id, patch } => doc.update_page(page_id, patch),

            Command::ApplyTemplate { template } => {
                let (next, id) = doc.apply_template(template)?;
                created = Some(id);
                next
            }
        };

        Ok(Applied { document, created })
    }

    /// Reject commands that are malformed regardless of the document
    pub fn validate(&self) -> Result<(), CommandError> {
        match self {
            Command::AddElement { page_id, element, .. } => {
                require(page_id, "page id")?;
                require(element.id(), "element id")
            }
            Command::UpdateElement {
                page_id,
                element_id,
                ..
            }
            | Command::DeleteElement {
                page_id,
                element_id,
            }
            | Command::MoveElement {
                page_id,
                element_id,
                ..
            } => {
                require(page_id, "page id")?;
                require(element_id, "element id")
            }
            Command::AddConnection { connection } => {
                require(&connection.source_element_id, "source element id")?;
                require(&connection.target_element_id, "target element id")?;
                if connection.source_element_id == connection.target_element_id {
                    return Err(CommandError::SelfConnection(
                        connection.source_element_id.clone(),
                    ));
                }
                Ok(())
            }
            Command::UpdateConnection { connection_id, .. }
            | Command::DeleteConnection { connection_id } => {
                require(connection_id, "connection id")
            }
            Command::AddPage { .. } => Ok(()),
            Command::DeletePage { page_id }
            | Command::DuplicatePage { page_id }
            | Command::UpdatePage { page_id, .. } => require(page_id, "page id"),
            Command::ApplyTemplate { template } => require(&template.name, "template name"),
        }
    }

    /// Human label shown next to undo/redo
    pub fn label(&self) -> &'static str {
        match self {
            Command::AddElement { .. } => "Add element",
            Command::UpdateElement { .. } => "Update element",
            Command::DeleteElement { .. } => "Delete element",
            Command::MoveElement { .. } => "Move element",
            Command::AddConnection { .. } => "Add connection",
            Command::UpdateConnection { .. } => "Update connection",
            Command::DeleteConnection { .. } => "Delete connection",
            Command::AddPage { .. } => "Add page",
            Command::DeletePage { .. } => "Delete page",
            Command::DuplicatePage { .. } => "Duplicate page",
            Command::UpdatePage { .. } => "Update page",
            Command::ApplyTemplate { .. } => "Apply template",
        }
    }
}

fn require(id: &str, what: &'static str) -> Result<(), CommandError> {
    if id.is_empty() {
        Err(CommandError::EmptyId(what))
    } else {
        Ok(())
    }
}
