//! Events, effects and timer identities of the visibility machine

use std::time::Duration;

use crate::constants::timing;

/// The three nested UI layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Root overlay, gated by player hover
    Overlay,
    /// Category panel
    Panel,
    /// Item detail card
    Card,
}

impl Layer {
    /// Timer slot holding this layer's pending close
    pub fn close_slot(self) -> TimerSlot {
        match self {
            Layer::Overlay => TimerSlot::OverlayHide,
            Layer::Panel => TimerSlot::PanelClose,
            Layer::Card => TimerSlot::CardHide,
        }
    }
}

/// One delayed action. At most one timer per slot is pending at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    OverlayHide,
    PanelClose,
    CardHide,
    LockRelease,
}

impl TimerSlot {
    pub const ALL: [TimerSlot; 4] = [
        TimerSlot::OverlayHide,
        TimerSlot::PanelClose,
        TimerSlot::CardHide,
        TimerSlot::LockRelease,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            TimerSlot::OverlayHide => 0,
            TimerSlot::PanelClose => 1,
            TimerSlot::CardHide => 2,
            TimerSlot::LockRelease => 3,
        }
    }
}

/// Identity of one armed timer. A firing whose token is no longer the
/// slot's pending token is stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Per-slot delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    pub overlay_hide: Duration,
    pub panel_close: Duration,
    pub card_hide: Duration,
    pub lock_grace: Duration,
}

impl Delays {
    pub fn for_slot(&self, slot: TimerSlot) -> Duration {
        match slot {
            TimerSlot::OverlayHide => self.overlay_hide,
            TimerSlot::PanelClose => self.panel_close,
            TimerSlot::CardHide => self.card_hide,
            TimerSlot::LockRelease => self.lock_grace,
        }
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            overlay_hide: Duration::from_millis(timing::OVERLAY_HIDE_DELAY_MS),
            panel_close: Duration::from_millis(timing::PANEL_CLOSE_DELAY_MS),
            card_hide: Duration::from_millis(timing::CARD_HIDE_DELAY_MS),
            lock_grace: Duration::from_millis(timing::LOCK_GRACE_MS),
        }
    }
}

/// Input to the visibility machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Pointer moved; the shell has already classified the point
    PointerMoved { over_player: bool },
    CategoryEntered(String),
    CategoryLeft,
    PanelEntered,
    PanelLeft,
    ItemEntered(String),
    ItemLeft,
    CardEntered,
    CardLeft,
    /// A timer armed by an earlier [`Effect::Arm`] elapsed
    TimerFired { slot: TimerSlot, token: TimerToken },
    /// The Content Store now holds a freshly fetched catalog
    RefreshCompleted,
}

/// Output of a transition, applied by the shell in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Show(Layer),
    Hide(Layer),
    /// Start a timer, replacing any pending timer in the same slot
    Arm {
        slot: TimerSlot,
        token: TimerToken,
        delay: Duration,
    },
    /// Drop the pending timer in this slot
    Cancel(TimerSlot),
    /// Populate panel title and grid for this category
    RenderPanel(String),
    /// Populate the card fields from this item, if it still exists
    RenderCard(String),
}
