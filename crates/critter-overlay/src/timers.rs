//! Timer driver
//!
//! Turns `Arm`/`Cancel` effects into tokio sleep tasks. Each slot owns at
//! most one task; arming a slot aborts whatever was running there.

use std::collections::HashMap;
use std::time::Duration;

use critter_core::visibility::{TimerSlot, TimerToken};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A timer that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFiring {
    pub slot: TimerSlot,
    pub token: TimerToken,
}

pub struct TimerDriver {
    handles: HashMap<TimerSlot, JoinHandle<()>>,
    fired_tx: mpsc::UnboundedSender<TimerFiring>,
}

impl TimerDriver {
    pub fn new(fired_tx: mpsc::UnboundedSender<TimerFiring>) -> Self {
        Self {
            handles: HashMap::new(),
            fired_tx,
        }
    }

    pub fn arm(&mut self, slot: TimerSlot, token: TimerToken, delay: Duration) {
        self.cancel(slot);

        let tx = self.fired_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the runtime stopped; nothing to notify.
            let _ = tx.send(TimerFiring { slot, token });
        });
        self.handles.insert(slot, handle);
    }

    pub fn cancel(&mut self, slot: TimerSlot) {
        if let Some(handle) = self.handles.remove(&slot) {
            handle.abort();
        }
    }

    /// Slots whose sleep task is still running
    pub fn running(&self) -> usize {
        self.handles.values().filter(|h| !h.is_finished()).count()
    }

    pub fn shutdown(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
