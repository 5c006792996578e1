//! Render Adapter
//!
//! Pure projections from the Content Store to view descriptors. Nothing
//! here holds state or mutates the store.

use crate::catalog::{category, Item, CATEGORIES};
use crate::constants::display;
use crate::store::CatalogSnapshot;

/// A category control on the rail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RailButton {
    pub category_id: &'static str,
    pub icon: &'static str,
    pub tooltip: &'static str,
}

/// One entry in the panel grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEntry {
    /// Hoverable item control
    Item {
        item_id: String,
        icon: String,
        tooltip: String,
    },
    /// Shown instead of an empty grid
    Placeholder { text: String },
}

/// Title and grid of an open category panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub category_id: String,
    pub title: String,
    pub entries: Vec<GridEntry>,
}

/// Detail fields of the item card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub item_id: String,
    pub icon: String,
    pub name: String,
    pub summary: String,
    pub fact: String,
    pub last_seen: Option<String>,
}

/// Rail controls for every enumerated category, in display order
pub fn rail_buttons() -> Vec<RailButton> {
    CATEGORIES
        .iter()
        .map(|c| RailButton {
            category_id: c.id,
            icon: c.icon,
            tooltip: c.label,
        })
        .collect()
}

pub fn panel_view(snapshot: &CatalogSnapshot, category_id: &str) -> PanelView {
    let title = category(category_id)
        .map(|c| c.label.to_string())
        .unwrap_or_else(|| category_id.to_string());

    let mut entries: Vec<GridEntry> = snapshot
        .items_in(category_id)
        .into_iter()
        .map(|item| GridEntry::Item {
            item_id: item.id.clone(),
            icon: icon_of(item).to_string(),
            tooltip: tooltip_of(item).to_string(),
        })
        .collect();

    if entries.is_empty() {
        entries.push(GridEntry::Placeholder {
            text: display::EMPTY_CATEGORY.to_string(),
        });
    }

    PanelView {
        category_id: category_id.to_string(),
        title,
        entries,
    }
}

pub fn card_view(item: &Item) -> CardView {
    CardView {
        item_id: item.id.clone(),
        icon: icon_of(item).to_string(),
        name: item
            .name
            .as_deref()
            .unwrap_or(display::FALLBACK_NAME)
            .to_string(),
        summary: item
            .summary
            .as_deref()
            .unwrap_or(display::FALLBACK_SUMMARY)
            .to_string(),
        fact: item
            .fact
            .as_deref()
            .unwrap_or(display::FALLBACK_FACT)
            .to_string(),
        last_seen: item.last_seen.as_ref().map(|s| format!("Last seen: {}", s)),
    }
}

/// Card for an item id, or None when the id is not in the snapshot
pub fn card_for(snapshot: &CatalogSnapshot, item_id: &str) -> Option<CardView> {
    snapshot.find(item_id).map(card_view)
}

/// Status line after a successful load
pub fn loaded_line(count: usize, last_updated: Option<&str>) -> String {
    match last_updated {
        Some(ts) => format!("Loaded {} critters | {}", count, ts),
        None => format!("Loaded {} critters", count),
    }
}

/// Status line after a failed fetch
pub fn failure_line(first_load: bool, message: &str) -> String {
    if first_load {
        format!("ERROR loading data: {}", message)
    } else {
        format!("ERROR refreshing data: {}", message)
    }
}

fn icon_of(item: &Item) -> &str {
    item.icon.as_deref().unwrap_or(display::FALLBACK_ICON)
}

fn tooltip_of(item: &Item) -> &str {
    item.short_label
        .as_deref()
        .or(item.name.as_deref())
        .unwrap_or(display::FALLBACK_NAME)
}
