//! # Post-Effect System
//!
//! Commands trigger follow-up commands to keep the document consistent.
//!
//! ## Design
//!
//! A post-effect looks at the document before and after a command and returns
//! secondary commands. The engine applies them on top of the primary result,
//! and the whole batch becomes one history entry.
//!
//! Currently registered:
//! - [`ConnectionCleanup`]: connections whose endpoint disappeared are kept,
//!   deactivated or deleted, depending on [`CleanupPolicy`]

use crate::command::{Applied, Command, CommandError};
use pagebuilder_document::{ConnectionPatch, Document, ElementId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Post-effect that can be triggered by a command
pub trait PostEffect: std::fmt::Debug {
    /// Compare `before` and `after` and return secondary commands if needed
    fn analyze(&self, command: &Command, before: &Document, after: &Document) -> Vec<Command>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CleanupPolicy {
    /// Leave dangling connections in place
    Keep,
    /// Mark them inactive so they stop routing but can be re-pointed
    Deactivate,
    /// Remove them
    #[default]
    Delete,
}

/// Handle connections that point at removed elements
#[derive(Debug)]
pub struct ConnectionCleanup {
    pub policy: CleanupPolicy,
}

impl PostEffect for ConnectionCleanup {
    fn analyze(&self, _command: &Command, before: &Document, after: &Document) -> Vec<Command> {
        if self.policy == CleanupPolicy::Keep {
            return vec![];
        }

        let removed = removed_elements(before, after);
        if removed.is_empty() {
            return vec![];
        }

        after
            .connections_touching(&removed)
            .filter_map(|connection| match self.policy {
                CleanupPolicy::Delete => Some(Command::DeleteConnection {
                    connection_id: connection.id.clone(),
                }),
                CleanupPolicy::Deactivate if connection.is_active => Some(Command::UpdateConnection {
                    connection_id: connection.id.clone(),
                    patch: ConnectionPatch::active(false),
                }),
                _ => None,
            })
            .collect()
    }
}

/// Element ids present anywhere in `before` but nowhere in `after`
pub fn removed_elements(before: &Document, after: &Document) -> Vec<ElementId> {
    let remaining: HashSet<&str> = after
        .pages
        .iter()
        .flat_map(|p| p.elements.iter().map(|n| n.id()))
        .collect();

    before
        .pages
        .iter()
        .flat_map(|p| p.elements.iter())
        .map(|n| n.id())
        .filter(|id| !remaining.contains(id))
        .map(str::to_string)
        .collect()
}

/// A command with its post-effects applied
#[derive(Debug, Clone)]
pub struct EffectOutcome {
    pub applied: Applied,
    /// Secondary commands that ran after the primary one
    pub secondary: Vec<Command>,
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new(cleanup: CleanupPolicy) -> Self {
        Self {
            effects: vec![Box::new(ConnectionCleanup { policy: cleanup })],
        }
    }

    /// Engine that runs no effects
    pub fn empty() -> Self {
        Self { effects: vec![] }
    }

    /// Analyze a command and generate all secondary commands
    pub fn analyze(&self, command: &Command, before: &Document, after: &Document) -> Vec<Command> {
        self.effects
            .iter()
            .flat_map(|effect| effect.analyze(command, before, after))
            .collect()
    }

    /// Apply a command with all its post-effects
    pub fn apply_with_effects(
        &self,
        command: &Command,
        doc: &Document,
    ) -> Result<EffectOutcome, CommandError> {
        let mut applied = command.apply(doc)?;

        let secondary = self.analyze(command, doc, &applied.document);
        for follow_up in &secondary {
            applied.document = follow_up.apply(&applied.document)?.document;
        }

        if !secondary.is_empty() {
            tracing::debug!(
                command = command.label(),
                secondary = secondary.len(),
                "post-effects applied"
            );
        }

        Ok(EffectOutcome { applied, secondary })
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new(CleanupPolicy::default())
    }
}
