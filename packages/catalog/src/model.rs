//! Catalog records as the catalog API serves them.

use crate::errors::CatalogError;
use pagebuilder_connections::{EventPayload, FilterValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of the category tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub products_count: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            path: id.clone(),
            id,
            name: name.into(),
            parent_id: None,
            level: 0,
            products_count: 0,
            subcategories: Vec::new(),
        }
    }

    /// Attach `child` one level below this node
    pub fn with_child(mut self, mut child: CategoryNode) -> Self {
        child.rebase(&self.id, self.level, &self.path);
        self.subcategories.push(child);
        self
    }

    fn rebase(&mut self, parent_id: &str, parent_level: u32, parent_path: &str) {
        self.parent_id = Some(parent_id.to_string());
        self.level = parent_level + 1;
        self.path = format!("{parent_path}/{}", self.id);
        let (id, level, path) = (self.id.clone(), self.level, self.path.clone());
        for child in &mut self.subcategories {
            child.rebase(&id, level, &path);
        }
    }

    /// This node's id followed by every descendant id
    pub fn descendant_ids(&self) -> Vec<String> {
        let mut ids = vec![self.id.clone()];
        for child in &self.subcategories {
            ids.extend(child.descendant_ids());
        }
        ids
    }

    pub fn find(&self, id: &str) -> Option<&CategoryNode> {
        if self.id == id {
            return Some(self);
        }
        self.subcategories.iter().find_map(|c| c.find(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    /// Property rendered the way filters compare it
    pub fn property_values(&self, name: &str) -> Vec<String> {
        match self.properties.get(name) {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(value) => scalar_text(value).into_iter().collect(),
        }
    }

    /// Whether every entry of `filters` is satisfied
    pub fn matches(&self, filters: &BTreeMap<String, FilterValue>) -> bool {
        filters.iter().all(|(name, wanted)| {
            wanted.is_empty() || self.property_values(name).iter().any(|v| wanted.matches(v))
        })
    }
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A distinct property value with how many products carry it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One page of filtered products
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Matches before the limit was applied
    pub total: u64,
}

impl ProductPage {
    /// Payload announcing this page to data targets
    pub fn to_payload(&self, filters: &BTreeMap<String, FilterValue>) -> EventPayload {
        EventPayload::ProductsLoaded {
            products: self
                .products
                .iter()
                .filter_map(|p| serde_json::to_value(p).ok())
                .collect(),
            total: self.total,
            filters: filters.clone(),
        }
    }
}

/// Response envelope of the catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<T, CatalogError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(CatalogError::Decode("missing data".to_string())),
            (false, _) => Err(CatalogError::Api(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

impl<T> From<Result<T, CatalogError>> for ApiResponse<T> {
    fn from(result: Result<T, CatalogError>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => ApiResponse::failed(e.to_string()),
        }
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_tree_paths() {
        let root = CategoryNode::new("doors", "Doors")
            .with_child(CategoryNode::new("interior", "Interior").with_child(CategoryNode::new("oak", "Oak")));

        let interior = root.find("interior").unwrap();
        assert_eq!(interior.parent_id.as_deref(), Some("doors"));
        assert_eq!(interior.level, 1);

        let oak = root.find("oak").unwrap();
        assert_eq!(oak.level, 2);
        assert_eq!(oak.path, "doors/interior/oak");
        assert_eq!(root.descendant_ids(), vec!["doors", "interior", "oak"]);
    }

    #[test]
    fn test_product_matches_filters() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Door",
            "properties": {"color": "white", "width": 800, "finish": ["matte", "gloss"]}
        }))
        .unwrap();

        let mut filters = BTreeMap::new();
        filters.insert("color".to_string(), FilterValue::from("white"));
        filters.insert("width".to_string(), FilterValue::from("800"));
        assert!(product.matches(&filters));

        filters.insert("finish".to_string(), FilterValue::from("satin"));
        assert!(!product.matches(&filters));

        filters.insert("finish".to_string(), FilterValue::from(""));
        assert!(product.matches(&filters));
    }

    #[test]
    fn test_api_response_envelope() {
        let ok: ApiResponse<ProductPage> =
            ApiResponse::from_json(r#"{"success": true, "data": {"products": [], "total": 0}}"#).unwrap();
        assert_eq!(ok.into_result().unwrap().total, 0);

        let failed: ApiResponse<ProductPage> =
            ApiResponse::from_json(r#"{"success": false, "error": "db down"}"#).unwrap();
        assert_eq!(
            failed.into_result(),
            Err(CatalogError::Api("db down".to_string()))
        );

        assert!(ApiResponse::<ProductPage>::from_json("nope").is_err());
    }
}
