//! Centralized constants
//!
//! Default timings and display fallbacks in one place for consistency.

/// Timing defaults
pub mod timing {
    /// Overlay hide delay after the pointer leaves the player (ms)
    pub const OVERLAY_HIDE_DELAY_MS: u64 = 450;
    /// Panel close delay after leaving the rail or panel (ms)
    pub const PANEL_CLOSE_DELAY_MS: u64 = 350;
    /// Card hide delay after leaving an item or the card (ms)
    pub const CARD_HIDE_DELAY_MS: u64 = 250;
    /// Grace period before a released interaction lock actually drops (ms)
    pub const LOCK_GRACE_MS: u64 = 200;
    /// Catalog refresh interval (60 minutes)
    pub const REFRESH_INTERVAL_SECS: u64 = 60 * 60;
    /// Timeout for a single catalog request
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
}

/// Data source defaults
pub mod data {
    /// Catalog location relative to the overlay directory
    pub const DEFAULT_DATA_URL: &str = "../data/critter-data.json";
    /// Query parameter carrying the cache-buster timestamp
    pub const CACHE_BUSTER_PARAM: &str = "t";
    /// Category assigned to items that do not name one
    pub const DEFAULT_CATEGORY: &str = "mammals";
}

/// Display fallbacks used by the render adapter
pub mod display {
    pub const FALLBACK_ICON: &str = "🐾";
    pub const FALLBACK_NAME: &str = "Critter";
    pub const FALLBACK_SUMMARY: &str = "No summary available yet.";
    pub const FALLBACK_FACT: &str = "No fun fact yet.";
    pub const EMPTY_CATEGORY: &str = "No critters loaded for this category yet.";
}
