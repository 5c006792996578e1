//! Critter Overlay Runtime
//!
//! Drives the pure visibility machine from `critter-core` against a real
//! clock and a host page: tokio timers, catalog fetching over HTTP or from
//! disk, and the periodic refresh loop.

pub mod error;
pub mod fetch;
pub mod host;
pub mod refresh;
pub mod runtime;
pub mod timers;

pub use error::{FetchError, HostError};
pub use fetch::{fetcher_for, CatalogFetcher, FileFetcher, HttpFetcher};
pub use host::{HostEvent, HostPage, Region};
pub use refresh::{RefreshLoop, RefreshReport};
pub use runtime::OverlayRuntime;
pub use timers::{TimerDriver, TimerFiring};
