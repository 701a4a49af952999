//! # Page Builder Document Model
//!
//! The saved project: pages of nested visual elements plus the declared
//! connections between them.
//!
//! ## Shape
//!
//! ```text
//! Document
//! ├── pages: Vec<Page>            (never empty)
//! │   └── elements: ElementTree   (arena, one per page)
//! │       └── ElementNode { data, parent, children }
//! └── connections: Vec<Connection>
//! ```
//!
//! Every operation here is pure: it borrows the current value and returns a new
//! one. Element trees are arenas of `Arc`-shared nodes, so a new tree only
//! allocates the nodes an operation actually touched. Consumers can compare
//! node identity with [`ElementTree::shares_node`] to skip re-rendering
//! untouched subtrees.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagebuilder_document::{Document, Element, ElementPatch, ElementType, Position};
//!
//! let doc = Document::new("Catalog");
//! let page_id = doc.pages[0].id.clone();
//!
//! let button = Element::create(ElementType::Button, Position::new(40.0, 40.0));
//! let button_id = button.data.id.clone();
//! let doc = doc.insert_element(&page_id, None, None, button)?;
//!
//! let doc = doc.update_element(&page_id, &button_id, &ElementPatch::default().hidden());
//! ```

mod connection;
mod defaults;
mod document;
mod errors;
mod model;
mod page;
mod patch;
mod tree;
pub mod visitor;

pub use connection::{Connection, ConnectionId, ConnectionPatch, ConnectionType, NewConnection};
pub use defaults::default_props;
pub use document::{Document, DocumentSettings, DocumentStatus};
pub use errors::{DocumentError, TreeError};
pub use model::{
    Constraints, Element, ElementData, ElementId, ElementType, Position, Props, Size, Spacing,
    Style,
};
pub use page::{
    Breakpoints, FontSizes, LineHeights, Page, PageId, PageSettings, PageTemplate, Scale, Theme,
    ThemeColors, Typography,
};
pub use patch::{ElementPatch, PagePatch};
pub use tree::{ElementNode, ElementTree, Preorder};
pub use visitor::ElementVisitor;
