//! # Document
//!
//! The saved project: ordered pages plus document-wide connections.
//!
//! Every method here is pure. Methods that target an unknown page, element or
//! connection return a clone equal to `self` and leave `updated_at` alone, so
//! callers can detect "nothing happened" by comparing values.

use crate::connection::{Connection, ConnectionId, ConnectionPatch, NewConnection};
use crate::errors::DocumentError;
use crate::model::{Element, ElementId};
use crate::page::{Page, PageId, PageTemplate, Theme};
use crate::patch::{ElementPatch, PagePatch};
use crate::tree::{ElementNode, ElementTree};
use pagebuilder_common::{now, IdGenerator, IdKind, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default, rename = "customCSS", skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    #[serde(default, rename = "customJS", skip_serializing_if = "Option::is_none")]
    pub custom_js: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "non_empty_pages")]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub settings: DocumentSettings,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn non_empty_pages<'de, D>(deserializer: D) -> Result<Vec<Page>, D::Error>
where
    D: Deserializer<'de>,
{
    let pages = Vec::<Page>::deserialize(deserializer)?;
    if pages.is_empty() {
        return Err(serde::de::Error::custom(DocumentError::NoPages));
    }
    Ok(pages)
}

impl Document {
    /// New draft with a single empty page
    pub fn new(name: impl Into<String>) -> Self {
        let created = now();
        Self {
            id: IdGenerator::next(IdKind::Document),
            name: name.into(),
            description: None,
            pages: vec![Page::new("Main page", "main")],
            settings: DocumentSettings::default(),
            connections: Vec::new(),
            status: DocumentStatus::Draft,
            published_at: None,
            created_at: created,
            updated_at: created,
        }
    }

    /// Parse the persisted JSON layout; a document without pages is rejected
    pub fn from_json(source: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(source)?)
    }

    /// `self`, given a fresh main page when `pages` was emptied by hand
    pub fn with_main_page(mut self) -> Self {
        if self.pages.is_empty() {
            self.pages.push(Page::new("Main page", "main"));
        }
        self
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn first_page(&self) -> &Page {
        &self.pages[0]
    }

    pub fn connection(&self, connection_id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == connection_id)
    }

    /// Locate an element on any page
    pub fn find_element(&self, element_id: &str) -> Option<(&Page, &ElementNode)> {
        self.pages
            .iter()
            .find_map(|page| page.elements.find_by_id(element_id).map(|node| (page, node)))
    }

    /// Total element count across pages
    pub fn element_count(&self) -> usize {
        self.pages.iter().map(|p| p.elements.len()).sum()
    }

    // Elements

    pub fn insert_element(
        &self,
        page_id: &str,
        parent_id: Option<&str>,
        index: Option<usize>,
        element: Element,
    ) -> Result<Self, DocumentError> {
        let page = self
            .page(page_id)
            .ok_or_else(|| DocumentError::PageNotFound(page_id.to_string()))?;
        let elements = page.elements.insert(parent_id, index, element)?;
        Ok(self.with_page_elements(page_id, elements))
    }

    pub fn update_element(&self, page_id: &str, element_id: &str, patch: &ElementPatch) -> Self {
        match self.page(page_id) {
            Some(page) if page.elements.contains(element_id) => {
                let elements = page.elements.update_by_id(element_id, patch);
                self.with_page_elements(page_id, elements)
            }
            _ => self.clone(),
        }
    }

    pub fn remove_element(&self, page_id: &str, element_id: &str) -> Self {
        match self.page(page_id) {
            Some(page) if page.elements.contains(element_id) => {
                let elements = page.elements.remove_by_id(element_id);
                self.with_page_elements(page_id, elements)
            }
            _ => self.clone(),
        }
    }

    pub fn move_element(
        &self,
        page_id: &str,
        element_id: &str,
        new_parent: Option<&str>,
        index: usize,
    ) -> Result<Self, DocumentError> {
        match self.page(page_id) {
            Some(page) if page.elements.contains(element_id) => {
                let elements = page.elements.move_by_id(element_id, new_parent, index)?;
                Ok(self.with_page_elements(page_id, elements))
            }
            _ => Ok(self.clone()),
        }
    }

    fn with_page_elements(&self, page_id: &str, elements: ElementTree) -> Self {
        let mut next = self.clone();
        let stamp = now();
        if let Some(page) = next.pages.iter_mut().find(|p| p.id == page_id) {
            page.elements = elements;
            page.updated_at = stamp;
        }
        next.updated_at = stamp;
        next
    }

    // Pages

    /// Append an empty page; the name defaults to "Page N"
    pub fn add_page(&self, name: Option<String>) -> (Self, PageId) {
        let number = self.pages.len() + 1;
        let page = Page::new(
            name.unwrap_or_else(|| format!("Page {number}")),
            format!("page-{number}"),
        );
        let page_id = page.id.clone();

        let mut next = self.clone();
        next.pages.push(page);
        next.updated_at = now();
        (next, page_id)
    }

    /// Remove a page; the last remaining page is never removed
    pub fn delete_page(&self, page_id: &str) -> Self {
        if self.pages.len() <= 1 || self.page(page_id).is_none() {
            tracing::debug!(page_id, "delete_page ignored");
            return self.clone();
        }

        let mut next = self.clone();
        next.pages.retain(|p| p.id != page_id);
        next.updated_at = now();
        next
    }

    /// Copy a page after the original; copied elements get fresh ids
    pub fn duplicate_page(&self, page_id: &str) -> Option<(Self, PageId)> {
        let (index, source) = self
            .pages
            .iter()
            .enumerate()
            .find(|(_, p)| p.id == page_id)?;

        let (elements, _) = source.elements.with_fresh_ids();
        let mut copy = Page::new(format!("{} (copy)", source.name), format!("{}-copy", source.slug));
        copy.description = source.description.clone();
        copy.settings = source.settings.clone();
        copy.theme = source.theme.clone();
        copy.elements = elements;
        let copy_id = copy.id.clone();

        let mut next = self.clone();
        next.pages.insert(index + 1, copy);
        next.updated_at = now();
        Some((next, copy_id))
    }

    /// Replace every page with one page built from `template`
    ///
    /// Template elements get fresh ids and timestamps. Connections are kept as
    /// they are; their endpoints are gone afterwards.
    pub fn apply_template(&self, template: &PageTemplate) -> Result<(Self, PageId), DocumentError> {
        fn stamp(element: &mut Element, at: Timestamp) {
            element.data.created_at = at;
            element.data.updated_at = at;
            for child in element.children.iter_mut().flatten() {
                stamp(child, at);
            }
        }

        let stamped = now();
        let mut elements = template.elements.clone();
        for element in &mut elements {
            stamp(element, stamped);
        }
        let (elements, _) = ElementTree::try_from(elements)?.with_fresh_ids();

        let mut page = Page::new(template.name.clone(), template.slug());
        page.elements = elements;
        let page_id = page.id.clone();

        let mut next = self.clone();
        next.pages = vec![page];
        next.updated_at = stamped;
        Ok((next, page_id))
    }

    pub fn update_page(&self, page_id: &str, patch: &PagePatch) -> Self {
        if self.page(page_id).is_none() {
            return self.clone();
        }

        let mut next = self.clone();
        let stamp = now();
        if let Some(page) = next.pages.iter_mut().find(|p| p.id == page_id) {
            patch.apply_to(page);
            page.updated_at = stamp;
        }
        next.updated_at = stamp;
        next
    }

    // Connections

    pub fn add_connection(&self, data: NewConnection) -> (Self, ConnectionId) {
        let connection = data.into_connection();
        let id = connection.id.clone();

        let mut next = self.clone();
        next.connections.push(connection);
        next.updated_at = now();
        (next, id)
    }

    pub fn update_connection(&self, connection_id: &str, patch: &ConnectionPatch) -> Self {
        if self.connection(connection_id).is_none() {
            return self.clone();
        }

        let mut next = self.clone();
        if let Some(connection) = next.connections.iter_mut().find(|c| c.id == connection_id) {
            patch.apply_to(connection);
        }
        next.updated_at = now();
        next
    }

    pub fn delete_connection(&self, connection_id: &str) -> Self {
        if self.connection(connection_id).is_none() {
            return self.clone();
        }

        let mut next = self.clone();
        next.connections.retain(|c| c.id != connection_id);
        next.updated_at = now();
        next
    }

    /// Connections with an endpoint in `element_ids`
    pub fn connections_touching<'a>(
        &'a self,
        element_ids: &'a [ElementId],
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |c| element_ids.iter().any(|id| c.touches(id)))
    }
}
