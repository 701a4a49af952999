use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Request(String),

    #[error("Catalog returned an error: {0}")]
    Api(String),

    #[error("Catalog response could not be decoded: {0}")]
    Decode(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Fetch cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Decode(e.to_string())
    }
}
