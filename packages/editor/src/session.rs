//! # Edit Session Management
//!
//! One user's editing state: the current document, its undo history, the
//! connection bus the rendered elements talk through, and what is selected.
//!
//! Every edit goes through [`EditSession::dispatch`], which applies the
//! command and its post-effects and records the result in history in one
//! step. Nothing else writes the document, so the visible document and the
//! undo log cannot drift apart.

use crate::command::Command;
use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::history::History;
use crate::post_effects::{removed_elements, PostEffectEngine};
use pagebuilder_connections::{ConnectionBus, EventPayload, FilterSnapshot, PublishReport};
use pagebuilder_document::{
    ConnectionId, ConnectionPatch, Document, Element, ElementId, ElementPatch, ElementType,
    NewConnection, Page, PageId, PagePatch, PageTemplate, Position,
};

/// What a dispatch did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    /// False when the command left the document unchanged
    pub changed: bool,

    /// Id of whatever the command created
    pub created: Option<String>,

    /// Number of secondary commands run by post-effects
    pub secondary: usize,
}

/// Single-user edit session
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    document: Document,
    history: History<Document>,
    effects: PostEffectEngine,
    bus: ConnectionBus,
    config: EditorConfig,

    selected_page: PageId,
    selected_element: Option<ElementId>,
}

impl EditSession {
    /// Create new edit session
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self::with_config(id, document, EditorConfig::default())
    }

    pub fn with_config(id: impl Into<String>, document: Document, config: EditorConfig) -> Self {
        let document = if document.pages.is_empty() {
            tracing::warn!(document = %document.id, "document has no pages, adding a main page");
            document.with_main_page()
        } else {
            document
        };
        let mut bus = ConnectionBus::new();
        bus.sync_connections(&document.connections);

        Self {
            id: id.into(),
            selected_page: document.first_page().id.clone(),
            selected_element: None,
            history: History::seeded(document.clone(), config.history_capacity),
            effects: PostEffectEngine::new(config.connection_cleanup),
            document,
            bus,
            config,
        }
    }

    /// Open a session on a saved document
    pub fn open(
        id: impl Into<String>,
        source: &str,
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        let document = Document::from_json(source)?;
        Ok(Self::with_config(id, document, config))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History<Document> {
        &self.history
    }

    /// Apply `command` and record it as one undo step
    ///
    /// Commands that leave the document as it was are not recorded.
    pub fn dispatch(&mut self, command: Command) -> Result<DispatchOutcome, EditorError> {
        let outcome = self.effects.apply_with_effects(&command, &self.document)?;
        let next = outcome.applied.document;

        if next == self.document {
            tracing::debug!(command = command.label(), "command changed nothing");
            return Ok(DispatchOutcome::default());
        }

        let removed = removed_elements(&self.document, &next);
        for element_id in &removed {
            self.bus.unsubscribe_element(element_id);
            self.bus.filters_mut().clear_element_filter(element_id);
        }

        self.history.add_labeled(next.clone(), command.label());
        self.set_document(next);

        match (&command, &outcome.applied.created) {
            (
                Command::AddPage { .. }
                | Command::DuplicatePage { .. }
                | Command::ApplyTemplate { .. },
                Some(page_id),
            ) => {
                self.selected_page = page_id.clone();
                self.selected_element = None;
            }
            (Command::AddElement { .. }, Some(element_id)) => {
                self.selected_element = Some(element_id.clone());
            }
            _ => {}
        }

        tracing::debug!(
            command = command.label(),
            removed = removed.len(),
            history = self.history.len(),
            "command dispatched"
        );

        Ok(DispatchOutcome {
            changed: true,
            created: outcome.applied.created,
            secondary: outcome.secondary.len(),
        })
    }

    /// Go back one step; false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                let snapshot = snapshot.clone();
                self.set_document(snapshot);
                true
            }
            None => false,
        }
    }

    /// Go forward one step; false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                let snapshot = snapshot.clone();
                self.set_document(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Swap in a new document and bring bus and selection in line with it
    fn set_document(&mut self, document: Document) {
        self.document = document;
        self.bus.sync_connections(&self.document.connections);

        if self.document.page(&self.selected_page).is_none() {
            self.selected_page = self.document.first_page().id.clone();
        }
        if let Some(element_id) = &self.selected_element {
            if self.document.find_element(element_id).is_none() {
                self.selected_element = None;
            }
        }
    }

    // Elements

    /// Drop a new element of `kind` at the top level of the selected page
    pub fn add_element(
        &mut self,
        kind: ElementType,
        position: Position,
    ) -> Result<ElementId, EditorError> {
        self.add_element_to(None, kind, position)
    }

    /// Drop a new element inside `parent_id` (top level when `None`)
    pub fn add_element_to(
        &mut self,
        parent_id: Option<&str>,
        kind: ElementType,
        position: Position,
    ) -> Result<ElementId, EditorError> {
        let element = Element::create_with_size(kind, position, self.config.default_element_size);
        let element_id = element.id().to_string();

        self.dispatch(Command::AddElement {
            page_id: self.selected_page.clone(),
            parent_id: parent_id.map(str::to_string),
            index: None,
            element,
        })?;
        Ok(element_id)
    }

    /// Patch an element on whichever page holds it
    pub fn update_element(
        &mut self,
        element_id: &str,
        patch: ElementPatch,
    ) -> Result<bool, EditorError> {
        let Some(page_id) = self.page_of(element_id) else {
            return Ok(false);
        };
        let outcome = self.dispatch(Command::UpdateElement {
            page_id,
            element_id: element_id.to_string(),
            patch,
        })?;
        Ok(outcome.changed)
    }

    pub fn delete_element(&mut self, element_id: &str) -> Result<bool, EditorError> {
        let Some(page_id) = self.page_of(element_id) else {
            return Ok(false);
        };
        let outcome = self.dispatch(Command::DeleteElement {
            page_id,
            element_id: element_id.to_string(),
        })?;
        Ok(outcome.changed)
    }

    pub fn move_element(
        &mut self,
        element_id: &str,
        new_parent_id: Option<&str>,
        index: usize,
    ) -> Result<bool, EditorError> {
        let Some(page_id) = self.page_of(element_id) else {
            return Ok(false);
        };
        let outcome = self.dispatch(Command::MoveElement {
            page_id,
            element_id: element_id.to_string(),
            new_parent_id: new_parent_id.map(str::to_string),
            index,
        })?;
        Ok(outcome.changed)
    }

    fn page_of(&self, element_id: &str) -> Option<PageId> {
        self.document
            .find_element(element_id)
            .map(|(page, _)| page.id.clone())
    }

    // Connections

    pub fn add_connection(&mut self, connection: NewConnection) -> Result<ConnectionId, EditorError> {
        let outcome = self.dispatch(Command::AddConnection { connection })?;
        Ok(outcome.created.unwrap_or_default())
    }

    pub fn update_connection(
        &mut self,
        connection_id: &str,
        patch: ConnectionPatch,
    ) -> Result<bool, EditorError> {
        let outcome = self.dispatch(Command::UpdateConnection {
            connection_id: connection_id.to_string(),
            patch,
        })?;
        Ok(outcome.changed)
    }

    pub fn delete_connection(&mut self, connection_id: &str) -> Result<bool, EditorError> {
        let outcome = self.dispatch(Command::DeleteConnection {
            connection_id: connection_id.to_string(),
        })?;
        Ok(outcome.changed)
    }

    // Pages

    pub fn add_page(&mut self, name: Option<String>) -> Result<PageId, EditorError> {
        let outcome = self.dispatch(Command::AddPage { name })?;
        Ok(outcome.created.unwrap_or_default())
    }

    pub fn delete_page(&mut self, page_id: &str) -> Result<bool, EditorError> {
        let outcome = self.dispatch(Command::DeletePage {
            page_id: page_id.to_string(),
        })?;
        Ok(outcome.changed)
    }

    pub fn duplicate_page(&mut self, page_id: &str) -> Result<Option<PageId>, EditorError> {
        let outcome = self.dispatch(Command::DuplicatePage {
            page_id: page_id.to_string(),
        })?;
        Ok(outcome.created)
    }

    pub fn update_page(&mut self, page_id: &str, patch: PagePatch) -> Result<bool, EditorError> {
        let outcome = self.dispatch(Command::UpdatePage {
            page_id: page_id.to_string(),
            patch,
        })?;
        Ok(outcome.changed)
    }

    /// Start over from `template`: one page, fresh element ids, one undo step
    pub fn apply_template(&mut self, template: PageTemplate) -> Result<PageId, EditorError> {
        let outcome = self.dispatch(Command::ApplyTemplate { template })?;
        Ok(outcome.created.unwrap_or_default())
    }

    // Selection

    pub fn selected_page(&self) -> &Page {
        self.document
            .page(&self.selected_page)
            .unwrap_or_else(|| self.document.first_page())
    }

    /// Switch the canvas to `page_id`; unknown pages are ignored
    pub fn select_page(&mut self, page_id: &str) -> bool {
        if self.document.page(page_id).is_none() {
            return false;
        }
        if self.selected_page != page_id {
            self.selected_page = page_id.to_string();
            self.selected_element = None;
        }
        true
    }

    pub fn selected_element(&self) -> Option<&str> {
        self.selected_element.as_deref()
    }

    /// Select an element (or clear the selection); unknown ids clear it
    pub fn select_element(&mut self, element_id: Option<&str>) {
        self.selected_element = element_id
            .filter(|id| self.document.find_element(id).is_some())
            .map(str::to_string);
    }

    // Connections at runtime

    pub fn bus(&self) -> &ConnectionBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut ConnectionBus {
        &mut self.bus
    }

    /// Publish an element event along its declared connections
    pub fn publish(&mut self, source: &str, payload: EventPayload) -> PublishReport {
        self.bus.publish(source, payload)
    }

    /// Current global filter map
    pub fn filters(&self) -> FilterSnapshot {
        self.bus.filters().snapshot()
    }
}
