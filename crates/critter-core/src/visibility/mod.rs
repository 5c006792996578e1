//! Visibility State Machine
//!
//! Decides from pointer and hover events whether the overlay, the category
//! panel and the item card are shown. Pure: the shell owns the real timers
//! and applies the returned effects.

mod machine;
mod state;
mod types;

pub use machine::VisibilityMachine;
pub use state::{TimerTable, VisibilityState};
pub use types::{Delays, Effect, Event, Layer, TimerSlot, TimerToken};
