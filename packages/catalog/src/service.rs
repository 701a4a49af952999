//! # Catalog Service
//!
//! The editor never talks to the product database directly. Everything it
//! needs goes through [`CatalogService`]: the category tree, the distinct
//! values of one property (for filter widgets), and filtered product pages.
//!
//! [`InMemoryCatalog`] serves a fixed product list and is what the CLI and the
//! tests use.

use crate::errors::CatalogError;
use crate::model::{CategoryNode, Product, ProductPage, PropertyOption};
use crate::query::ProductQuery;
use pagebuilder_connections::FilterSnapshot;
use std::collections::{BTreeMap, HashSet};
use std::future::Future;

pub trait CatalogService: Send + Sync {
    fn categories(&self) -> impl Future<Output = Result<Vec<CategoryNode>, CatalogError>> + Send;

    /// Distinct values of `property` among products of `category_ids` that
    /// satisfy every other active filter
    fn property_values(
        &self,
        category_ids: &[String],
        property: &str,
        filters: &FilterSnapshot,
    ) -> impl Future<Output = Result<Vec<PropertyOption>, CatalogError>> + Send;

    fn filtered_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<ProductPage, CatalogError>> + Send;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    categories: Vec<CategoryNode>,
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new(categories: Vec<CategoryNode>, products: Vec<Product>) -> Self {
        Self {
            categories,
            products,
        }
    }

    /// Expand category ids to include their subcategories
    fn expand(&self, category_ids: &[String]) -> Result<HashSet<String>, CatalogError> {
        let mut expanded = HashSet::new();
        for id in category_ids {
            let node = self
                .categories
                .iter()
                .find_map(|c| c.find(id))
                .ok_or_else(|| CatalogError::UnknownCategory(id.clone()))?;
            expanded.extend(node.descendant_ids());
        }
        Ok(expanded)
    }

    fn in_categories<'a>(
        &'a self,
        category_ids: &'a HashSet<String>,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| category_ids.contains(&p.category_id))
    }

    fn with_counts(&self, nodes: &[CategoryNode]) -> Vec<CategoryNode> {
        nodes
            .iter()
            .map(|node| {
                let mut node = node.clone();
                let ids: HashSet<String> = node.descendant_ids().into_iter().collect();
                node.products_count = self.in_categories(&ids).count() as u64;
                node.subcategories = self.with_counts(&node.subcategories);
                node
            })
            .collect()
    }
}

impl CatalogService for InMemoryCatalog {
    async fn categories(&self) -> Result<Vec<CategoryNode>, CatalogError> {
        Ok(self.with_counts(&self.categories))
    }

    async fn property_values(
        &self,
        category_ids: &[String],
        property: &str,
        filters: &FilterSnapshot,
    ) -> Result<Vec<PropertyOption>, CatalogError> {
        let categories = self.expand(category_ids)?;

        // A filter widget must not be narrowed by its own selection
        let mut others = filters.as_map().clone();
        others.remove(property);

        let mut options: BTreeMap<String, PropertyOption> = BTreeMap::new();
        for product in self.in_categories(&categories).filter(|p| p.matches(&others)) {
            for value in product.property_values(property) {
                let option = options.entry(value.clone()).or_insert_with(|| PropertyOption {
                    label: value.clone(),
                    value,
                    count: 0,
                    image: None,
                });
                option.count += 1;
                if option.image.is_none() {
                    option.image = product.images.first().map(|i| i.url.clone());
                }
            }
        }

        tracing::debug!(property, values = options.len(), "property values");
        Ok(options.into_values().collect())
    }

    async fn filtered_products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError> {
        let categories = self.expand(&query.category_ids)?;
        let matching: Vec<&Product> = self
            .in_categories(&categories)
            .filter(|p| p.matches(&query.filters))
            .collect();

        Ok(ProductPage {
            total: matching.len() as u64,
            products: matching.into_iter().take(query.limit).cloned().collect(),
        })
    }
}
