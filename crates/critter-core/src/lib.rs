//! Critter Overlay Core
//!
//! Everything about the overlay that needs no runtime: the catalog model and
//! its parser, the content store, the render projections, the player
//! detection predicate and the hover visibility state machine.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod player;
pub mod render;
pub mod store;
pub mod visibility;

pub use catalog::{Catalog, Category, Item, CATEGORIES};
pub use config::OverlayConfig;
pub use error::CatalogError;
pub use store::{CatalogSnapshot, ContentStore};
pub use visibility::{Delays, Effect, Event, Layer, VisibilityMachine, VisibilityState};
