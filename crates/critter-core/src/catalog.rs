//! Catalog data model and payload parsing
//!
//! The remote document is either `{ "lastUpdated": "...", "critters": [...] }`
//! or a bare array of items. Items are normalized leniently: a bad field on
//! one item falls back to a default instead of failing the batch.

use serde_json::{Map, Value};

use crate::constants::data::DEFAULT_CATEGORY;
use crate::error::CatalogError;

/// A single catalog entry, immutable once fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Unique identifier
    pub id: String,
    /// Category id (normally one of [`CATEGORIES`])
    pub category: String,
    /// Display name
    pub name: Option<String>,
    /// Short label used for tooltips
    pub short_label: Option<String>,
    /// Icon glyph
    pub icon: Option<String>,
    /// Summary text
    pub summary: Option<String>,
    /// Long-form fact text
    pub fact: Option<String>,
    /// Optional "last seen" annotation
    pub last_seen: Option<String>,
}

impl Item {
    /// Normalize one raw array entry. Returns None for non-object entries.
    fn from_value(index: usize, value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let id = match obj.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => format!("critter-{}", index),
        };

        Some(Self {
            id,
            category: text_field(obj, &["category"])
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            name: text_field(obj, &["name"]),
            short_label: text_field(obj, &["buttonLabel", "shortName", "tag"]),
            icon: text_field(obj, &["icon"]),
            summary: text_field(obj, &["summary", "bio"]),
            fact: text_field(obj, &["fact", "funFact"]),
            last_seen: text_field(obj, &["lastSeen"]),
        })
    }
}

/// First non-blank string among `keys`, in order
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// A statically enumerated category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// All categories in display order
pub const CATEGORIES: [Category; 6] = [
    Category {
        id: "mammals",
        label: "Mammals",
        icon: "🦌",
    },
    Category {
        id: "birds",
        label: "Birds",
        icon: "🦅",
    },
    Category {
        id: "night",
        label: "Night Critters",
        icon: "🦝",
    },
    Category {
        id: "water",
        label: "Water Critters",
        icon: "🐟",
    },
    Category {
        id: "amphib_reptile",
        label: "Amphib & Reptile",
        icon: "🐸",
    },
    Category {
        id: "insects",
        label: "Insects",
        icon: "🦋",
    },
];

/// Look up an enumerated category by id
pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// The full fetched collection plus freshness metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub last_updated: Option<String>,
    pub items: Vec<Item>,
}

impl Catalog {
    /// Parse a raw response body
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Build a catalog from an already-decoded JSON document
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let (last_updated, list) = match value {
            Value::Array(list) => (None, list),
            Value::Object(mut obj) => {
                let last_updated = text_field(&obj, &["lastUpdated"]);
                let list = match obj.remove("critters") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::Array(list)) => list,
                    Some(other) => return Err(CatalogError::NotArray(kind(&other))),
                };
                (last_updated, list)
            }
            other => return Err(CatalogError::NotArray(kind(&other))),
        };

        let mut items = Vec::with_capacity(list.len());
        for (index, raw) in list.iter().enumerate() {
            match Item::from_value(index, raw) {
                Some(item) => items.push(item),
                None => tracing::warn!(index, kind = kind(raw), "Skipping non-object catalog entry"),
            }
        }

        Ok(Self {
            last_updated,
            items,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
