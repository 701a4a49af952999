//! # Page Builder Editor
//!
//! Editing engine behind the page builder canvas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI: toolbar, canvas, property panels        │
//! └─────────────────────────────────────────────┘
//!                     ↓ Command
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession::dispatch               │
//! │  - Apply command to the current document    │
//! │  - Run post-effects (connection cleanup)    │
//! │  - Push the result into History             │
//! │  - Re-sync the ConnectionBus                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: pure tree / page / connection ops │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One write path**: mutation and history push happen together
//! 2. **Snapshots, not inverses**: history stores whole documents; structural
//!    sharing keeps them cheap
//! 3. **Tolerant**: stale ids are no-ops, never errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagebuilder_editor::EditSession;
//! use pagebuilder_document::{Document, ElementType, Position};
//!
//! let mut session = EditSession::new("local", Document::new("Catalog"));
//! let id = session.add_element(ElementType::Heading, Position::new(40.0, 40.0))?;
//! session.delete_element(&id)?;
//! session.undo();
//! ```

mod command;
mod config;
mod errors;
mod history;
mod post_effects;
mod session;

pub use command::{Applied, Command, CommandError};
pub use config::EditorConfig;
pub use errors::EditorError;
pub use history::{History, DEFAULT_HISTORY_CAPACITY};
pub use post_effects::{
    removed_elements, CleanupPolicy, ConnectionCleanup, EffectOutcome, PostEffect,
    PostEffectEngine,
};
pub use session::{DispatchOutcome, EditSession};
