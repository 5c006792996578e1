//! Overlay runtime
//!
//! The imperative shell around [`VisibilityMachine`]. Host events, timer
//! firings and refresh reports are handled one at a time on a single task;
//! every effect the machine returns is applied before the next input.

use std::sync::Arc;

use critter_core::player;
use critter_core::render;
use critter_core::{ContentStore, Effect, Event, OverlayConfig, VisibilityMachine, VisibilityState};
use tokio::sync::mpsc;

use crate::error::{FetchError, HostError};
use crate::fetch::{fetcher_for, CatalogFetcher};
use crate::host::{HostEvent, HostPage, Region};
use crate::refresh::{RefreshLoop, RefreshReport};
use crate::timers::{TimerDriver, TimerFiring};

pub struct OverlayRuntime<H: HostPage> {
    host: H,
    machine: VisibilityMachine,
    store: Arc<ContentStore>,
    timers: TimerDriver,
    timer_rx: mpsc::UnboundedReceiver<TimerFiring>,
    /// Taken when `run` spawns the loop
    refresh: Option<RefreshLoop>,
}

impl<H: HostPage> OverlayRuntime<H> {
    pub fn new(host: H, config: &OverlayConfig, fetcher: Arc<dyn CatalogFetcher>) -> Self {
        let store = Arc::new(ContentStore::new());
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();

        Self {
            host,
            machine: VisibilityMachine::new(config.delays()),
            refresh: Some(RefreshLoop::new(
                fetcher,
                store.clone(),
                config.refresh_interval(),
            )),
            store,
            timers: TimerDriver::new(timer_tx),
            timer_rx,
        }
    }

    /// Build with the fetcher selected by `config.data_url`
    pub fn from_config(host: H, config: &OverlayConfig) -> Result<Self, FetchError> {
        let fetcher = fetcher_for(config)?;
        tracing::info!(source = %fetcher.source(), "Catalog source selected");
        Ok(Self::new(host, config, fetcher))
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> &VisibilityState {
        self.machine.state()
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    /// Process input until the `inputs` sender is dropped, then hand the
    /// host back. Timer and refresh tasks do not outlive this call.
    pub async fn run(mut self, mut inputs: mpsc::Receiver<HostEvent>) -> H {
        self.init();

        let (report_tx, mut report_rx) = mpsc::unbounded_channel();
        let refresh_task = self.refresh.take().map(|refresh| refresh.spawn(report_tx));

        loop {
            tokio::select! {
                event = inputs.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => {
                        tracing::debug!("Host input closed, stopping overlay runtime");
                        break;
                    }
                },
                Some(firing) = self.timer_rx.recv() => self.on_timer(firing),
                Some(report) = report_rx.recv() => self.on_refresh(report),
            }
        }

        if let Some(task) = refresh_task {
            task.abort();
        }
        self.timers.shutdown();
        self.host
    }

    /// Translate one host event and apply the resulting effects
    pub fn dispatch(&mut self, event: HostEvent) {
        let event = match event {
            HostEvent::PointerMoved { x, y } => {
                let zone = player::classify(self.host.element_at(x, y).as_ref());
                tracing::trace!(x, y, ?zone, "Pointer sample");
                Event::PointerMoved {
                    over_player: zone.is_over_player(),
                }
            }
            HostEvent::CategoryEntered(category_id) => Event::CategoryEntered(category_id),
            HostEvent::CategoryLeft => Event::CategoryLeft,
            HostEvent::PanelEntered => Event::PanelEntered,
            HostEvent::PanelLeft => Event::PanelLeft,
            HostEvent::ItemEntered(item_id) => Event::ItemEntered(item_id),
            HostEvent::ItemLeft => Event::ItemLeft,
            HostEvent::CardEntered => Event::CardEntered,
            HostEvent::CardLeft => Event::CardLeft,
        };
        self.handle(event);
    }

    fn init(&mut self) {
        for region in Region::REQUIRED {
            if !self.host.has_region(region) {
                self.report_host_error(HostError::MissingRegion(region));
            }
        }

        let buttons = render::rail_buttons();
        if let Err(e) = self.host.render_rail(&buttons) {
            self.report_host_error(e);
        }
        tracing::info!(categories = buttons.len(), "Overlay initialized");
    }

    fn on_timer(&mut self, firing: TimerFiring) {
        self.handle(Event::TimerFired {
            slot: firing.slot,
            token: firing.token,
        });
    }

    fn on_refresh(&mut self, report: RefreshReport) {
        match report {
            RefreshReport::Loaded {
                count,
                last_updated,
            } => {
                self.set_status(&render::loaded_line(count, last_updated.as_deref()));
                self.handle(Event::RefreshCompleted);
            }
            RefreshReport::Failed {
                first_attempt,
                message,
            } => self.set_status(&render::failure_line(first_attempt, &message)),
        }
    }

    fn handle(&mut self, event: Event) {
        let effects = self.machine.handle(event);
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let result = match effect {
                Effect::Show(layer) => self.host.set_visible(layer, true),
                Effect::Hide(layer) => self.host.set_visible(layer, false),
                Effect::Arm { slot, token, delay } => {
                    self.timers.arm(slot, token, delay);
                    Ok(())
                }
                Effect::Cancel(slot) => {
                    self.timers.cancel(slot);
                    Ok(())
                }
                Effect::RenderPanel(category_id) => {
                    let view = render::panel_view(&self.store.snapshot(), &category_id);
                    self.host.render_panel(&view)
                }
                Effect::RenderCard(item_id) => {
                    match render::card_for(&self.store.snapshot(), &item_id) {
                        Some(view) => self.host.render_card(&view),
                        None => {
                            tracing::debug!(item_id = %item_id, "Item not in catalog, card left as is");
                            Ok(())
                        }
                    }
                }
            };

            if let Err(e) = result {
                self.report_host_error(e);
            }
        }
    }

    fn report_host_error(&mut self, err: HostError) {
        tracing::warn!("{}", err);
        self.set_status(&err.to_string());
    }

    fn set_status(&mut self, text: &str) {
        if let Err(e) = self.host.show_status(text) {
            tracing::warn!(status = text, "{}", e);
        }
    }
}
