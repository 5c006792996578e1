//! Overlay configuration
//!
//! Parsed from an optional TOML file. Every field has a default, so a
//! missing file or a partial file is fine.

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::constants::{data, timing};
use crate::visibility::Delays;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Catalog location: http(s) URL, `file://` URL or plain path
    pub data_url: String,
    pub refresh_interval_secs: u64,
    pub overlay_hide_delay_ms: u64,
    pub panel_close_delay_ms: u64,
    pub card_hide_delay_ms: u64,
    pub lock_grace_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            data_url: data::DEFAULT_DATA_URL.to_string(),
            refresh_interval_secs: timing::REFRESH_INTERVAL_SECS,
            overlay_hide_delay_ms: timing::OVERLAY_HIDE_DELAY_MS,
            panel_close_delay_ms: timing::PANEL_CLOSE_DELAY_MS,
            card_hide_delay_ms: timing::CARD_HIDE_DELAY_MS,
            lock_grace_ms: timing::LOCK_GRACE_MS,
            request_timeout_secs: timing::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl OverlayConfig {
    /// Load from a TOML file; defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No overlay config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        let config =
            Self::from_toml_str(&content).with_context(|| format!("Failed to parse {:?}", path))?;

        tracing::info!(data_url = %config.data_url, "Loaded overlay config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: OverlayConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.data_url.trim().is_empty(), "data_url must not be empty");
        ensure!(
            self.refresh_interval_secs > 0,
            "refresh_interval_secs must be at least 1"
        );
        ensure!(
            self.request_timeout_secs > 0,
            "request_timeout_secs must be at least 1"
        );
        Ok(())
    }

    pub fn delays(&self) -> Delays {
        Delays {
            overlay_hide: Duration::from_millis(self.overlay_hide_delay_ms),
            panel_close: Duration::from_millis(self.panel_close_delay_ms),
            card_hide: Duration::from_millis(self.card_hide_delay_ms),
            lock_grace: Duration::from_millis(self.lock_grace_ms),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
