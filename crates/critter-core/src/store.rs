//! Content Store
//!
//! Holds the most recently fetched catalog grouped by category. The active
//! snapshot lives behind an `Arc` that is swapped whole, so a reader either
//! sees the previous catalog or the new one, never a mix.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::{Catalog, Item};

/// An immutable catalog plus its lookup indices
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    catalog: Catalog,
    /// category id -> item positions, in fetch order
    by_category: HashMap<String, Vec<usize>>,
    /// item id -> position of the first item with that id
    by_id: HashMap<String, usize>,
}

impl CatalogSnapshot {
    fn new(catalog: Catalog) -> Self {
        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_id = HashMap::with_capacity(catalog.items.len());

        for (pos, item) in catalog.items.iter().enumerate() {
            by_category
                .entry(item.category.clone())
                .or_default()
                .push(pos);
            by_id.entry(item.id.clone()).or_insert(pos);
        }

        Self {
            catalog,
            by_category,
            by_id,
        }
    }

    /// Items in a category, in fetch order. Empty for unknown categories.
    pub fn items_in(&self, category_id: &str) -> Vec<&Item> {
        self.by_category
            .get(category_id)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&pos| &self.catalog.items[pos])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn find(&self, item_id: &str) -> Option<&Item> {
        self.by_id
            .get(item_id)
            .map(|&pos| &self.catalog.items[pos])
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.catalog.last_updated.as_deref()
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

/// Shared holder of the active catalog snapshot
#[derive(Debug, Default)]
pub struct ContentStore {
    active: RwLock<Arc<CatalogSnapshot>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new catalog. Indices are built before the lock is taken.
    pub fn replace(&self, catalog: Catalog) {
        let snapshot = Arc::new(CatalogSnapshot::new(catalog));
        *self.active.write() = snapshot;
    }

    /// Current snapshot; stays valid even if a refresh swaps in a newer one
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.active.read().clone()
    }

    pub fn items_in(&self, category_id: &str) -> Vec<Item> {
        self.snapshot()
            .items_in(category_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn find(&self, item_id: &str) -> Option<Item> {
        self.snapshot().find(item_id).cloned()
    }
}
