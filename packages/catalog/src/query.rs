use pagebuilder_connections::{FilterSnapshot, FilterValue};
use pagebuilder_document::ElementData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_PRODUCT_LIMIT: usize = 12;

/// Parameters of a filtered-products request
///
/// Doubles as the fetch key of a [`crate::FetchSlot`]: two equal queries never
/// trigger a second request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub filters: BTreeMap<String, FilterValue>,
    pub limit: usize,
}

impl ProductQuery {
    pub fn new(category_ids: Vec<String>) -> Self {
        Self {
            category_ids,
            filters: BTreeMap::new(),
            limit: DEFAULT_PRODUCT_LIMIT,
        }
    }

    pub fn with_filters(mut self, filters: BTreeMap<String, FilterValue>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Derive a query from an element's props and the filters it can see
    ///
    /// Returns `None` when the element has no `categoryIds`; such an element
    /// shows nothing and must not hit the catalog.
    pub fn from_element(element: &ElementData, filters: &FilterSnapshot) -> Option<Self> {
        let category_ids: Vec<String> = element
            .props
            .get("categoryIds")?
            .as_array()?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        if category_ids.is_empty() {
            return None;
        }

        let limit = element
            .props
            .get("limit")
            .and_then(|v| v.as_u64())
            .filter(|&n| n > 0)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_PRODUCT_LIMIT);

        let active = filters
            .as_map()
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Some(Self {
            category_ids,
            filters: active,
            limit,
        })
    }
}
