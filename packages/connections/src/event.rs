//! Typed payloads that elements publish over their connections.

use crate::filters::FilterValue;
use pagebuilder_document::ConnectionType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Malformed connection payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Payload published by a source element
///
/// The `type` tag decides which connection type can carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventPayload {
    /// A filter element picked (or cleared, when `value` is null) a value
    Filter {
        #[serde(alias = "propertyName")]
        property: String,
        #[serde(default)]
        value: Option<FilterValue>,
        #[serde(default, rename = "categoryIds")]
        category_ids: Vec<String>,
    },

    /// A product card asked for something to be put in the cart
    AddToCart {
        #[serde(rename = "productId")]
        product_id: String,
        #[serde(default = "default_quantity")]
        quantity: u32,
        #[serde(flatten)]
        extra: serde_json::Map<String, serde_json::Value>,
    },

    /// A product list finished loading
    ProductsLoaded {
        #[serde(default)]
        products: Vec<serde_json::Value>,
        #[serde(default)]
        total: u64,
        #[serde(default)]
        filters: BTreeMap<String, FilterValue>,
    },

    /// Navigate to a page slug or URL
    Navigate { target: String },

    /// Anything else an element wants to hand to its data targets
    Data {
        #[serde(flatten)]
        fields: serde_json::Map<String, serde_json::Value>,
    },
}

fn default_quantity() -> u32 {
    1
}

impl EventPayload {
    /// Parse a free-form payload received from a renderer
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn filter(property: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        EventPayload::Filter {
            property: property.into(),
            value: Some(value.into()),
            category_ids: Vec::new(),
        }
    }

    pub fn clear_filter(property: impl Into<String>) -> Self {
        EventPayload::Filter {
            property: property.into(),
            value: None,
            category_ids: Vec::new(),
        }
    }

    /// Connection type whose edges carry this payload
    pub fn connection_type(&self) -> ConnectionType {
        match self {
            EventPayload::Filter { .. } => ConnectionType::Filter,
            EventPayload::AddToCart { .. } => ConnectionType::Cart,
            EventPayload::Navigate { .. } => ConnectionType::Navigate,
            EventPayload::ProductsLoaded { .. } | EventPayload::Data { .. } => ConnectionType::Data,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            EventPayload::Filter { .. } => "filter",
            EventPayload::AddToCart { .. } => "addToCart",
            EventPayload::ProductsLoaded { .. } => "productsLoaded",
            EventPayload::Navigate { .. } => "navigate",
            EventPayload::Data { .. } => "data",
        }
    }
}
