//! Catalog fetchers
//!
//! HTTP sources are requested with a cache-busting query parameter and
//! no-store/no-cache headers; local paths are read from disk. Both hand the
//! body to the core parser.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use url::Url;

use critter_core::constants::data::CACHE_BUSTER_PARAM;
use critter_core::{Catalog, OverlayConfig};

use crate::error::FetchError;

#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Catalog, FetchError>;

    /// Human readable source, for logs
    fn source(&self) -> String;
}

/// Fetches the catalog over HTTP(S)
pub struct HttpFetcher {
    http_client: reqwest::Client,
    url: Url,
}

impl HttpFetcher {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client, url })
    }

    /// The configured URL with a fresh `t=<unix millis>` appended
    fn busted_url(&self) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair(
            CACHE_BUSTER_PARAM,
            &chrono::Utc::now().timestamp_millis().to_string(),
        );
        url
    }
}

#[async_trait]
impl CatalogFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<Catalog, FetchError> {
        let url = self.busted_url();
        tracing::debug!(%url, "Fetching catalog");

        let response = self
            .http_client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(Catalog::from_json_slice(&body)?)
    }

    fn source(&self) -> String {
        self.url.to_string()
    }
}

/// Reads the catalog from a local file
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogFetcher for FileFetcher {
    async fn fetch(&self) -> Result<Catalog, FetchError> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(Catalog::from_json_slice(&body)?)
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }
}

/// Pick a fetcher for `data_url`: http(s) URLs go over the network,
/// `file://` URLs and plain paths are read from disk.
pub fn fetcher_for(config: &OverlayConfig) -> Result<Arc<dyn CatalogFetcher>, FetchError> {
    let raw = config.data_url.trim();

    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Arc::new(HttpFetcher::new(url, config.request_timeout())?))
        }
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| FetchError::UnsupportedSource(raw.to_string()))?;
            Ok(Arc::new(FileFetcher::new(path)))
        }
        // Single-letter schemes are Windows drive letters.
        Ok(url) if url.scheme().len() > 1 => Err(FetchError::UnsupportedSource(raw.to_string())),
        _ => Ok(Arc::new(FileFetcher::new(raw))),
    }
}
