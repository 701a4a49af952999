//! Declared wiring between two elements.

use crate::model::ElementId;
use pagebuilder_common::IdGenerator;
use serde::{Deserialize, Serialize};

pub type ConnectionId = String;

/// What travels over a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionType {
    Filter,
    Data,
    Cart,
    Navigate,
}

/// Edge from a source element to a target element
///
/// Endpoints are not checked against the page tree; a connection may outlive
/// the elements it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub source_element_id: ElementId,
    pub target_element_id: ElementId,
    #[serde(alias = "type")]
    pub connection_type: ConnectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_active", alias = "active")]
    pub is_active: bool,
}

impl Connection {
    pub fn touches(&self, element_id: &str) -> bool {
        self.source_element_id == element_id || self.target_element_id == element_id
    }
}

fn default_active() -> bool {
    true
}

/// Connection data before an id has been assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConnection {
    pub source_element_id: ElementId,
    pub target_element_id: ElementId,
    #[serde(alias = "type")]
    pub connection_type: ConnectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_active", alias = "active")]
    pub is_active: bool,
}

impl NewConnection {
    pub fn new(
        source: impl Into<ElementId>,
        target: impl Into<ElementId>,
        connection_type: ConnectionType,
    ) -> Self {
        Self {
            source_element_id: source.into(),
            target_element_id: target.into(),
            connection_type,
            source_property: None,
            target_property: None,
            description: None,
            is_active: true,
        }
    }

    pub fn with_properties(
        mut self,
        source_property: Option<String>,
        target_property: Option<String>,
    ) -> Self {
        self.source_property = source_property;
        self.target_property = target_property;
        self
    }

    pub(crate) fn into_connection(self) -> Connection {
        Connection {
            id: IdGenerator::connection(),
            source_element_id: self.source_element_id,
            target_element_id: self.target_element_id,
            connection_type: self.connection_type,
            source_property: self.source_property,
            target_property: self.target_property,
            description: self.description,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_element_id: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_element_id: Option<ElementId>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<ConnectionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "active", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ConnectionPatch {
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(&self, connection: &mut Connection) {
        if let Some(source) = &self.source_element_id {
            connection.source_element_id = source.clone();
        }
        if let Some(target) = &self.target_element_id {
            connection.target_element_id = target.clone();
        }
        if let Some(kind) = self.connection_type {
            connection.connection_type = kind;
        }
        if let Some(property) = &self.source_property {
            connection.source_property = Some(property.clone());
        }
        if let Some(property) = &self.target_property {
            connection.target_property = Some(property.clone());
        }
        if let Some(description) = &self.description {
            connection.description = Some(description.clone());
        }
        if let Some(active) = self.is_active {
            connection.is_active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names_and_aliases() {
        let connection: Connection = serde_json::from_value(json!({
            "id": "conn-1",
            "sourceElementId": "filter",
            "targetElementId": "grid",
            "type": "filter",
            "targetProperty": "color"
        }))
        .unwrap();

        assert_eq!(connection.connection_type, ConnectionType::Filter);
        assert!(connection.is_active);

        let value = serde_json::to_value(&connection).unwrap();
        assert_eq!(value["connectionType"], "filter");
        assert_eq!(value["isActive"], true);
    }

    #[test]
    fn test_patch_leaves_unset_fields() {
        let mut connection = NewConnection::new("a", "b", ConnectionType::Data).into_connection();
        ConnectionPatch::active(false).apply_to(&mut connection);

        assert!(!connection.is_active);
        assert_eq!(connection.source_element_id, "a");
        assert!(connection.id.starts_with("connection-"));
    }
}
