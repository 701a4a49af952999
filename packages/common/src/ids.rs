//! Fresh identifiers for elements, pages and connections.
//!
//! Ids look like `element-1718000000000-3`: a kind prefix, the creation time in
//! milliseconds, and a process-wide sequence number. The sequence keeps ids unique
//! even when several are minted within the same millisecond (template expansion,
//! page duplication).

use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// What an id is minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Document,
    Page,
    Element,
    Connection,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Document => "doc",
            IdKind::Page => "page",
            IdKind::Element => "element",
            IdKind::Connection => "connection",
        }
    }
}

/// Generates prefixed, process-unique ids
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator;

impl IdGenerator {
    pub fn next(kind: IdKind) -> String {
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let millis = crate::clock::now().timestamp_millis();
        format!("{}-{}-{}", kind.prefix(), millis, seq)
    }

    pub fn element() -> String {
        Self::next(IdKind::Element)
    }

    pub fn page() -> String {
        Self::next(IdKind::Page)
    }

    pub fn connection() -> String {
        Self::next(IdKind::Connection)
    }
}
