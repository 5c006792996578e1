//! Refresh Loop
//!
//! Fetches the catalog immediately, then on a fixed interval. A success
//! swaps the Content Store; a failure leaves it untouched. There is no
//! backoff: the next tick is the retry.

use std::sync::Arc;
use std::time::Duration;

use critter_core::ContentStore;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::fetch::CatalogFetcher;

/// Outcome of one fetch, reported to the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshReport {
    /// The store now holds the new catalog
    Loaded {
        count: usize,
        last_updated: Option<String>,
    },
    /// The store was left as it was
    Failed {
        /// True for the startup fetch
        first_attempt: bool,
        message: String,
    },
}

pub struct RefreshLoop {
    fetcher: Arc<dyn CatalogFetcher>,
    store: Arc<ContentStore>,
    interval: Duration,
}

impl RefreshLoop {
    pub fn new(
        fetcher: Arc<dyn CatalogFetcher>,
        store: Arc<ContentStore>,
        interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            store,
            interval,
        }
    }

    /// Fetch once and apply the result to the store
    pub async fn refresh_once(&self, first_attempt: bool) -> RefreshReport {
        match self.fetcher.fetch().await {
            Ok(catalog) => {
                let count = catalog.len();
                let last_updated = catalog.last_updated.clone();
                self.store.replace(catalog);
                tracing::info!(
                    items = count,
                    last_updated = last_updated.as_deref().unwrap_or("-"),
                    "Catalog refreshed"
                );
                RefreshReport::Loaded {
                    count,
                    last_updated,
                }
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.fetcher.source(),
                    first_attempt,
                    "Catalog fetch failed: {}",
                    e
                );
                RefreshReport::Failed {
                    first_attempt,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Run forever on the current runtime. The task ends when the report
    /// receiver is dropped.
    pub fn spawn(self, reports: mpsc::UnboundedSender<RefreshReport>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut first_attempt = true;
            loop {
                // First tick completes immediately.
                ticker.tick().await;
                let report = self.refresh_once(first_attempt).await;
                first_attempt = false;

                if reports.send(report).is_err() {
                    tracing::debug!("Refresh receiver dropped, stopping refresh loop");
                    break;
                }
            }
        })
    }
}
