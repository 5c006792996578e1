//! Hover-driven visibility transitions
//!
//! `handle` takes one event, mutates the owned state and returns the effects
//! the shell must apply. It performs no I/O and never reads a clock: delays
//! are expressed as [`Effect::Arm`] and come back as [`Event::TimerFired`].
//!
//! Opening a layer is immediate; closing is delayed and cancelable. The
//! interaction lock keeps the overlay up while the pointer is inside the
//! rail, panel or card even though it is no longer over the player.

use super::state::VisibilityState;
use super::types::{Delays, Effect, Event, Layer, TimerSlot};

pub struct VisibilityMachine {
    state: VisibilityState,
    delays: Delays,
}

impl VisibilityMachine {
    pub fn new(delays: Delays) -> Self {
        Self {
            state: VisibilityState::new(),
            delays,
        }
    }

    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    pub fn delays(&self) -> &Delays {
        &self.delays
    }

    /// Apply one event and return the effects, in application order
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let mut fx = Vec::new();

        match event {
            Event::PointerMoved { over_player } => self.pointer_moved(over_player, &mut fx),
            Event::CategoryEntered(category_id) => self.category_entered(category_id, &mut fx),
            Event::CategoryLeft => {
                self.schedule_close(Layer::Panel, &mut fx);
                self.release_lock_later(&mut fx);
            }
            Event::PanelEntered => {
                self.acquire_lock(&mut fx);
                self.cancel(TimerSlot::PanelClose, &mut fx);
            }
            Event::PanelLeft => {
                self.schedule_close(Layer::Panel, &mut fx);
                self.schedule_close(Layer::Card, &mut fx);
                self.release_lock_later(&mut fx);
            }
            Event::ItemEntered(item_id) => {
                self.acquire_lock(&mut fx);
                self.cancel(TimerSlot::PanelClose, &mut fx);
                self.state.active_item = Some(item_id.clone());
                fx.push(Effect::RenderCard(item_id));
                self.open(Layer::Card, &mut fx);
            }
            Event::ItemLeft => self.schedule_close(Layer::Card, &mut fx),
            Event::CardEntered => {
                self.acquire_lock(&mut fx);
                self.cancel(TimerSlot::CardHide, &mut fx);
            }
            Event::CardLeft => {
                self.schedule_close(Layer::Card, &mut fx);
                self.release_lock_later(&mut fx);
            }
            Event::TimerFired { slot, token } => {
                if self.state.timers.settle(slot, token) {
                    self.timer_fired(slot, &mut fx);
                } else {
                    tracing::trace!(?slot, ?token, "Ignoring stale timer");
                }
            }
            Event::RefreshCompleted => self.refresh_completed(&mut fx),
        }

        debug_assert!(
            self.state.invariants_hold(),
            "visibility invariants violated: {:?}",
            self.state
        );
        fx
    }

    fn pointer_moved(&mut self, over_player: bool, fx: &mut Vec<Effect>) {
        self.state.pointer_over_player = over_player;

        if over_player || self.state.interaction_locked {
            self.open(Layer::Overlay, fx);
        } else {
            self.schedule_close(Layer::Overlay, fx);
        }
    }

    fn category_entered(&mut self, category_id: String, fx: &mut Vec<Effect>) {
        self.acquire_lock(fx);
        self.state.active_category = Some(category_id.clone());
        fx.push(Effect::RenderPanel(category_id));
        self.open(Layer::Panel, fx);
        // Switching categories drops the previous item immediately.
        self.force_close(Layer::Card, fx);
    }

    fn timer_fired(&mut self, slot: TimerSlot, fx: &mut Vec<Effect>) {
        match slot {
            TimerSlot::OverlayHide => {
                // The lock may have been taken after this timer was armed.
                if self.state.interaction_locked {
                    tracing::debug!("Overlay hide suppressed by interaction lock");
                } else {
                    self.force_close(Layer::Overlay, fx);
                }
            }
            TimerSlot::PanelClose => self.hide(Layer::Panel, fx),
            TimerSlot::CardHide => self.hide(Layer::Card, fx),
            TimerSlot::LockRelease => {
                self.state.interaction_locked = false;
                tracing::debug!("Interaction lock released");
                if self.state.overlay_visible && !self.state.pointer_over_player {
                    self.schedule_close(Layer::Overlay, fx);
                }
            }
        }
    }

    fn refresh_completed(&mut self, fx: &mut Vec<Effect>) {
        if self.state.panel_open {
            if let Some(category_id) = &self.state.active_category {
                fx.push(Effect::RenderPanel(category_id.clone()));
            }
        }
        if self.state.card_visible {
            if let Some(item_id) = &self.state.active_item {
                fx.push(Effect::RenderCard(item_id.clone()));
            }
        }
    }

    /// Cancel any pending close, then show. Inner layers pull the overlay up.
    fn open(&mut self, layer: Layer, fx: &mut Vec<Effect>) {
        if layer != Layer::Overlay {
            self.open(Layer::Overlay, fx);
        }
        self.cancel(layer.close_slot(), fx);
        if !self.state.is_visible(layer) {
            self.state.set_visible(layer, true);
            tracing::debug!(?layer, "Layer shown");
            fx.push(Effect::Show(layer));
        }
    }

    /// Arm (or re-arm) the delayed close. Nothing to do for a hidden layer.
    fn schedule_close(&mut self, layer: Layer, fx: &mut Vec<Effect>) {
        if self.state.is_visible(layer) {
            let slot = layer.close_slot();
            fx.push(self.state.timers.rearm(slot, self.delays.for_slot(slot)));
        }
    }

    /// Close without delay, cascading from the overlay to everything inside it
    fn force_close(&mut self, layer: Layer, fx: &mut Vec<Effect>) {
        self.cancel(layer.close_slot(), fx);

        if layer == Layer::Overlay {
            self.force_close(Layer::Panel, fx);
            self.force_close(Layer::Card, fx);
            self.state.interaction_locked = false;
            self.cancel(TimerSlot::LockRelease, fx);
        }

        self.hide(layer, fx);

        if layer == Layer::Card {
            self.state.active_item = None;
        }
    }

    fn hide(&mut self, layer: Layer, fx: &mut Vec<Effect>) {
        if layer == Layer::Panel {
            self.state.active_category = None;
        }
        if self.state.is_visible(layer) {
            self.state.set_visible(layer, false);
            tracing::debug!(?layer, "Layer hidden");
            fx.push(Effect::Hide(layer));
        }
    }

    fn acquire_lock(&mut self, fx: &mut Vec<Effect>) {
        self.state.interaction_locked = true;
        self.cancel(TimerSlot::LockRelease, fx);
    }

    fn release_lock_later(&mut self, fx: &mut Vec<Effect>) {
        if self.state.interaction_locked {
            let slot = TimerSlot::LockRelease;
            fx.push(self.state.timers.rearm(slot, self.delays.for_slot(slot)));
        }
    }

    fn cancel(&mut self, slot: TimerSlot, fx: &mut Vec<Effect>) {
        fx.extend(self.state.timers.cancel(slot));
    }
}

impl Default for VisibilityMachine {
    fn default() -> Self {
        Self::new(Delays::default())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use crate::visibility::types::TimerToken;

    /// Applies Arm/Cancel effects against a fake clock
    struct Sim {
        machine: VisibilityMachine,
        now: Duration,
        armed: HashMap<TimerSlot, (TimerToken, Duration)>,
        log: Vec<Effect>,
    }

    impl Sim {
        fn new() -> Self {
            Self::with_delays(Delays::default())
        }

        fn with_delays(delays: Delays) -> Self {
            Self {
                machine: VisibilityMachine::new(delays),
                now: Duration::ZERO,
                armed: HashMap::new(),
                log: Vec::new(),
            }
        }

        fn state(&self) -> &VisibilityState {
            self.machine.state()
        }

        fn send(&mut self, event: Event) -> Vec<Effect> {
            let fx = self.machine.handle(event);
            for effect in &fx {
                match effect {
                    Effect::Arm { slot, token, delay } => {
                        self.armed.insert(*slot, (*token, self.now + *delay));
                    }
                    Effect::Cancel(slot) => {
                        self.armed.remove(slot);
                    }
                    _ => {}
                }
            }
            self.log.extend(fx.iter().cloned());
            fx
        }

        fn advance(&mut self, by: Duration) {
            let target = self.now + by;
            loop {
                let next = self
                    .armed
                    .iter()
                    .filter(|(_, (_, deadline))| *deadline <= target)
                    .min_by_key(|(_, (token, deadline))| (*deadline, *token))
                    .map(|(slot, (token, deadline))| (*slot, *token, *deadline));
                let Some((slot, token, deadline)) = next else {
                    break;
                };
                self.armed.remove(&slot);
                self.now = deadline;
                self.send(Event::TimerFired { slot, token });
            }
            self.now = target;
        }

        fn advance_ms(&mut self, ms: u64) {
            self.advance(Duration::from_millis(ms));
        }

        fn pointer(&mut self, over_player: bool) {
            self.send(Event::PointerMoved { over_player });
        }
    }

    #[test]
    fn pointer_over_player_shows_overlay_once() {
        let mut sim = Sim::new();
        let fx = sim.send(Event::PointerMoved { over_player: true });
        assert_eq!(fx, vec![Effect::Show(Layer::Overlay)]);

        let fx = sim.send(Event::PointerMoved { over_player: true });
        assert!(fx.is_empty());
        assert!(sim.state().overlay_visible());
    }

    #[test]
    fn leaving_player_hides_after_delay() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.pointer(false);

        sim.advance_ms(449);
        assert!(sim.state().overlay_visible());
        sim.advance_ms(1);
        assert!(!sim.state().overlay_visible());
    }

    #[test]
    fn returning_to_player_cancels_hide() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.pointer(false);
        sim.advance_ms(300);
        sim.pointer(true);
        sim.advance_ms(1_000);
        assert!(sim.state().overlay_visible());
        assert!(!sim.state().timers().is_pending(TimerSlot::OverlayHide));
    }

    #[test]
    fn rescheduling_replaces_pending_close() {
        let mut sim = Sim::new();
        sim.pointer(true);
        let first = sim.send(Event::PointerMoved { over_player: false });
        sim.advance_ms(300);
        let second = sim.send(Event::PointerMoved { over_player: false });

        let tokens: Vec<_> = first
            .iter()
            .chain(second.iter())
            .filter_map(|e| match e {
                Effect::Arm { slot, token, .. } if *slot == TimerSlot::OverlayHide => Some(*token),
                _ => None,
            })
            .collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(
            sim.state().timers().pending(TimerSlot::OverlayHide),
            Some(tokens[1])
        );

        // The replaced timer firing late is a no-op.
        let fx = sim.machine.handle(Event::TimerFired {
            slot: TimerSlot::OverlayHide,
            token: tokens[0],
        });
        assert!(fx.is_empty());
        assert!(sim.state().overlay_visible());

        // Measured from the second schedule, not the first.
        sim.advance_ms(200);
        assert!(sim.state().overlay_visible());
        sim.advance_ms(250);
        assert!(!sim.state().overlay_visible());
    }

    #[test]
    fn category_hover_opens_panel_and_renders() {
        let mut sim = Sim::new();
        sim.pointer(true);
        let fx = sim.send(Event::CategoryEntered("mammals".into()));

        assert!(fx.contains(&Effect::RenderPanel("mammals".into())));
        assert!(fx.contains(&Effect::Show(Layer::Panel)));
        assert!(sim.state().panel_open());
        assert!(sim.state().interaction_locked());
        assert_eq!(sim.state().active_category(), Some("mammals"));
    }

    #[test]
    fn switching_category_hides_card_immediately() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("mammals".into()));
        sim.send(Event::PanelEntered);
        sim.send(Event::ItemEntered("a".into()));
        assert!(sim.state().card_visible());

        sim.send(Event::PanelLeft);
        let fx = sim.send(Event::CategoryEntered("birds".into()));

        assert!(fx.contains(&Effect::Hide(Layer::Card)));
        assert!(!sim.state().card_visible());
        assert!(sim.state().active_item().is_none());
        assert!(!sim.state().timers().is_pending(TimerSlot::CardHide));
        assert_eq!(sim.state().active_category(), Some("birds"));
    }

    #[test]
    fn rail_to_panel_transit_keeps_panel_open() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("water".into()));
        sim.send(Event::CategoryLeft);
        sim.advance_ms(100);
        sim.send(Event::PanelEntered);
        sim.advance_ms(2_000);

        assert!(sim.state().panel_open());
        assert!(sim.state().interaction_locked());
    }

    #[test]
    fn item_hover_cancels_panel_close_and_shows_card() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("mammals".into()));
        sim.send(Event::CategoryLeft);
        let fx = sim.send(Event::ItemEntered("a".into()));

        assert!(fx.contains(&Effect::Cancel(TimerSlot::PanelClose)));
        assert!(fx.contains(&Effect::RenderCard("a".into())));
        assert!(fx.contains(&Effect::Show(Layer::Card)));
        sim.advance_ms(1_000);
        assert!(sim.state().panel_open());
        assert!(sim.state().card_visible());
    }

    #[test]
    fn item_leave_only_closes_card() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("mammals".into()));
        sim.send(Event::PanelEntered);
        sim.send(Event::ItemEntered("a".into()));
        sim.send(Event::ItemLeft);
        sim.advance_ms(250);

        assert!(!sim.state().card_visible());
        assert!(sim.state().panel_open());
        // Delayed hide keeps the last item for refreshes.
        assert_eq!(sim.state().active_item(), Some("a"));
    }

    #[test]
    fn card_enter_rescues_card_from_item_leave() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("mammals".into()));
        sim.send(Event::PanelEntered);
        sim.send(Event::ItemEntered("a".into()));
        sim.send(Event::ItemLeft);
        sim.advance_ms(100);
        sim.send(Event::CardEntered);
        sim.advance_ms(1_000);

        assert!(sim.state().card_visible());
    }

    #[test]
    fn card_hover_holds_overlay_off_player() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("mammals".into()));
        sim.send(Event::ItemEntered("a".into()));
        sim.send(Event::ItemLeft);
        sim.send(Event::CardEntered);
        sim.pointer(false);
        sim.advance_ms(1_000);

        assert!(sim.state().interaction_locked());
        assert!(sim.state().overlay_visible());
        assert!(sim.state().panel_open());
        assert!(sim.state().card_visible());
    }

    #[test]
    fn card_enter_retakes_lock_during_grace() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("mammals".into()));
        sim.send(Event::PanelEntered);
        sim.send(Event::ItemEntered("a".into()));
        sim.send(Event::PanelLeft);
        sim.pointer(false);

        sim.advance_ms(100);
        let fx = sim.send(Event::CardEntered);
        assert!(fx.contains(&Effect::Cancel(TimerSlot::LockRelease)));
        assert!(sim.state().interaction_locked());
        assert!(!sim.state().timers().is_pending(TimerSlot::LockRelease));

        // The panel still closes on its own delay; the card keeps the overlay up.
        sim.advance_ms(1_000);
        assert!(sim.state().overlay_visible());
        assert!(sim.state().card_visible());
        assert!(!sim.state().panel_open());
    }

    #[test]
    fn card_leave_releases_lock_after_grace() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("mammals".into()));
        sim.send(Event::ItemEntered("a".into()));
        sim.send(Event::CardEntered);
        sim.pointer(false);
        sim.send(Event::CardLeft);

        sim.advance_ms(199);
        assert!(sim.state().interaction_locked());
        sim.advance_ms(1);
        assert!(!sim.state().interaction_locked());
        assert!(sim.state().timers().is_pending(TimerSlot::OverlayHide));
        assert!(sim.state().overlay_visible());

        sim.advance_ms(450);
        assert!(!sim.state().overlay_visible());
        assert!(!sim.state().panel_open());
        assert!(!sim.state().card_visible());
    }

    #[test]
    fn lock_keeps_overlay_while_off_player() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("birds".into()));
        sim.send(Event::PanelEntered);
        // The panel is drawn over page content outside the player.
        sim.pointer(false);
        sim.advance_ms(5_000);

        assert!(sim.state().overlay_visible());
        assert!(sim.state().panel_open());
    }

    #[test]
    fn lock_taken_after_arming_blocks_hide() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("birds".into()));
        sim.send(Event::CategoryLeft);
        sim.send(Event::PanelEntered);
        sim.send(Event::PanelLeft);
        sim.advance_ms(200);
        assert!(!sim.state().interaction_locked());

        // Overlay hide armed while unlocked.
        sim.pointer(false);
        assert!(sim.state().timers().is_pending(TimerSlot::OverlayHide));

        // Re-entering the panel locks again before the timer fires.
        sim.send(Event::PanelEntered);
        sim.advance_ms(450);
        assert!(sim.state().overlay_visible());
    }

    #[test]
    fn lock_release_rearms_overlay_hide() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("night".into()));
        sim.send(Event::PanelEntered);
        sim.pointer(false);
        sim.send(Event::PanelLeft);

        // grace (200) releases the lock, then the overlay delay (450) runs.
        sim.advance_ms(200);
        assert!(!sim.state().interaction_locked());
        assert!(sim.state().overlay_visible());
        sim.advance_ms(450);
        assert!(!sim.state().overlay_visible());
        assert!(!sim.state().panel_open());
        assert!(sim.state().active_category().is_none());
    }

    #[test]
    fn rail_leave_alone_drops_lock_after_grace() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("insects".into()));
        sim.send(Event::CategoryLeft);
        sim.pointer(false);

        sim.advance_ms(200);
        assert!(!sim.state().interaction_locked());
        sim.advance_ms(1_000);
        assert!(!sim.state().overlay_visible());
    }

    #[test]
    fn full_hover_scenario() {
        let mut sim = Sim::new();
        sim.pointer(true);
        sim.send(Event::CategoryEntered("mammals".into()));
        sim.send(Event::PanelEntered);
        sim.send(Event::ItemEntered("a".into()));
        assert!(sim.state().card_visible());

        sim.send(Event::ItemLeft);
        sim.send(Event::PanelLeft);
        sim.pointer(false);
        sim.advance_ms(2_000);

        let state = sim.state();
        assert!(!state.overlay_visible());
        assert!(!state.panel_open());
        assert!(!state.card_visible());
        assert!(!state.interaction_locked());
        assert_eq!(state.timers().pending_count(), 0);
    }

    #[test]
    fn overlay_hide_force_closes_inner_layers() {
        let mut sim = Sim::with_delays(Delays {
            overlay_hide: Duration::from_millis(100),
            panel_close: Duration::from_millis(1_000),
            card_hide: Duration::from_millis(1_000),
            lock_grace: Duration::from_millis(10),
        });
        sim.pointer(true);
        sim.send(Event::CategoryEntered("mammals".into()));
        sim.send(Event::ItemEntered("a".into()));
        sim.send(Event::CategoryLeft);
        sim.advance_ms(10);
        assert!(!sim.state().interaction_locked());
        sim.pointer(false);

        sim.log.clear();
        sim.advance_ms(100);
        assert!(sim.log.contains(&Effect::Cancel(TimerSlot::PanelClose)));
        assert!(sim.log.contains(&Effect::Hide(Layer::Panel)));
        assert!(sim.log.contains(&Effect::Hide(Layer::Card)));
        assert!(sim.log.contains(&Effect::Hide(Layer::Overlay)));

        let state = sim.state();
        assert!(state.active_category().is_none());
        assert!(state.active_item().is_none());
        assert_eq!(state.timers().pending_count(), 0);
    }

    #[test]
    fn refresh_rerenders_open_views_only() {
        let mut sim = Sim::new();
        assert!(sim.send(Event::RefreshCompleted).is_empty());

        sim.pointer(true);
        sim.send(Event::CategoryEntered("mammals".into()));
        sim.send(Event::ItemEntered("a".into()));
        let fx = sim.send(Event::RefreshCompleted);
        assert_eq!(
            fx,
            vec![
                Effect::RenderPanel("mammals".into()),
                Effect::RenderCard("a".into())
            ]
        );

        // Refresh never changes visibility.
        assert!(sim.state().panel_open());
        assert!(sim.state().card_visible());
    }

    #[test]
    fn inner_layer_pulls_overlay_up() {
        let mut sim = Sim::new();
        let fx = sim.send(Event::CategoryEntered("birds".into()));
        assert!(fx.contains(&Effect::Show(Layer::Overlay)));
        assert!(sim.state().invariants_hold());
    }

    /// xorshift64, enough to shuffle event sequences deterministically
    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn below(&mut self, n: u64) -> u64 {
            self.next() % n
        }
    }

    #[test]
    fn overlay_never_hidden_while_locked() {
        for seed in 1..=64u64 {
            let mut rng = Rng(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
            let mut sim = Sim::new();

            for _ in 0..400 {
                let state = sim.state().clone();
                match rng.below(12) {
                    0 | 1 => sim.pointer(rng.below(2) == 0),
                    2 if state.overlay_visible() => {
                        let id = ["mammals", "birds", "night"][rng.below(3) as usize];
                        sim.send(Event::CategoryEntered(id.to_string()));
                    }
                    3 if state.overlay_visible() => {
                        sim.send(Event::CategoryLeft);
                    }
                    4 if state.panel_open() => {
                        sim.send(Event::PanelEntered);
                    }
                    5 if state.panel_open() => {
                        sim.send(Event::PanelLeft);
                    }
                    6 if state.panel_open() => {
                        sim.send(Event::ItemEntered(format!("item-{}", rng.below(4))));
                    }
                    7 if state.panel_open() => {
                        sim.send(Event::ItemLeft);
                    }
                    8 if state.card_visible() => {
                        sim.send(Event::CardEntered);
                    }
                    9 if state.card_visible() => {
                        sim.send(Event::CardLeft);
                    }
                    10 => {
                        sim.send(Event::RefreshCompleted);
                    }
                    _ => sim.advance_ms(rng.below(600)),
                }

                let state = sim.state();
                assert!(state.invariants_hold(), "seed {seed}: {state:?}");
                assert!(
                    !state.interaction_locked() || state.overlay_visible(),
                    "seed {seed}: overlay hidden under lock: {state:?}"
                );
                assert!(state.timers().pending_count() <= TimerSlot::ALL.len());
                assert_eq!(sim.armed.len(), state.timers().pending_count());
            }
        }
    }
}
