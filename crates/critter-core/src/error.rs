//! Structured error types for catalog handling

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed catalog JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Catalog payload is not array-shaped (found {0})")]
    NotArray(&'static str),
}
