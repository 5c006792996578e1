//! Visibility state and the per-slot timer table

use std::time::Duration;

use super::types::{Effect, Layer, TimerSlot, TimerToken};

/// Pending timer per slot. `rearm` is the only way to schedule, and it
/// always replaces what was pending.
#[derive(Debug, Clone, Default)]
pub struct TimerTable {
    pending: [Option<TimerToken>; 4],
    next_token: u64,
}

impl TimerTable {
    pub fn pending(&self, slot: TimerSlot) -> Option<TimerToken> {
        self.pending[slot.index()]
    }

    pub fn is_pending(&self, slot: TimerSlot) -> bool {
        self.pending(slot).is_some()
    }

    /// Number of slots with a pending timer
    pub fn pending_count(&self) -> usize {
        self.pending.iter().filter(|p| p.is_some()).count()
    }

    /// Cancel-then-schedule. The returned effect tells the shell to drop any
    /// running timer for the slot and start a new one.
    pub(crate) fn rearm(&mut self, slot: TimerSlot, delay: Duration) -> Effect {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending[slot.index()] = Some(token);
        Effect::Arm { slot, token, delay }
    }

    /// Returns the cancel effect only if something was pending
    pub(crate) fn cancel(&mut self, slot: TimerSlot) -> Option<Effect> {
        self.pending[slot.index()]
            .take()
            .map(|_| Effect::Cancel(slot))
    }

    /// Consume a firing. False when the token is stale.
    pub(crate) fn settle(&mut self, slot: TimerSlot, token: TimerToken) -> bool {
        if self.pending[slot.index()] == Some(token) {
            self.pending[slot.index()] = None;
            true
        } else {
            false
        }
    }
}

/// Everything the visibility machine knows. Starts fully hidden.
#[derive(Debug, Clone, Default)]
pub struct VisibilityState {
    pub(crate) overlay_visible: bool,
    pub(crate) panel_open: bool,
    pub(crate) card_visible: bool,
    pub(crate) active_category: Option<String>,
    pub(crate) active_item: Option<String>,
    pub(crate) interaction_locked: bool,
    /// Classification of the most recent pointer sample
    pub(crate) pointer_over_player: bool,
    pub(crate) timers: TimerTable,
}

impl VisibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn card_visible(&self) -> bool {
        self.card_visible
    }

    pub fn is_visible(&self, layer: Layer) -> bool {
        match layer {
            Layer::Overlay => self.overlay_visible,
            Layer::Panel => self.panel_open,
            Layer::Card => self.card_visible,
        }
    }

    pub(crate) fn set_visible(&mut self, layer: Layer, visible: bool) {
        match layer {
            Layer::Overlay => self.overlay_visible = visible,
            Layer::Panel => self.panel_open = visible,
            Layer::Card => self.card_visible = visible,
        }
    }

    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    pub fn active_item(&self) -> Option<&str> {
        self.active_item.as_deref()
    }

    pub fn interaction_locked(&self) -> bool {
        self.interaction_locked
    }

    pub fn timers(&self) -> &TimerTable {
        &self.timers
    }

    /// Nesting invariants: inner layers imply the overlay, the active
    /// category tracks the open panel, and hidden layers have no pending close.
    pub fn invariants_hold(&self) -> bool {
        let nested = (!self.panel_open || self.overlay_visible)
            && (!self.card_visible || self.overlay_visible);
        let category_tracks_panel = self.panel_open == self.active_category.is_some();
        let no_orphan_close = [Layer::Overlay, Layer::Panel, Layer::Card]
            .into_iter()
            .all(|layer| self.is_visible(layer) || !self.timers.is_pending(layer.close_slot()));

        nested && category_tracks_panel && no_orphan_close
    }
}
