//! Structured error types for the overlay shell

use std::path::PathBuf;

use critter_core::CatalogError;
use thiserror::Error;

use crate::host::Region;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Data fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Data fetch failed: {0}")]
    Status(u16),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported data source: {0}")]
    UnsupportedSource(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Missing host page region: #{}", .0.element_id())]
    MissingRegion(Region),
}
