//! # Catalog Boundary
//!
//! Async access to the product catalog for elements that show catalog data
//! (product grids, property filters, filtered product lists).
//!
//! ```text
//! element props + FilterSnapshot ──▶ ProductQuery ──▶ FetchSlot::begin
//!                                                        │ ticket
//!                                                        ▼
//!                                    CatalogService::filtered_products
//!                                                        │
//!                              FetchSlot::complete ◀─────┘ (stale ones dropped)
//! ```

mod errors;
mod fetch;
mod model;
mod query;
mod service;

pub use errors::CatalogError;
pub use fetch::{FetchSlot, FetchState, FetchTicket};
pub use model::{ApiResponse, CategoryNode, Product, ProductImage, ProductPage, PropertyOption};
pub use query::{ProductQuery, DEFAULT_PRODUCT_LIMIT};
pub use service::{CatalogService, InMemoryCatalog};
