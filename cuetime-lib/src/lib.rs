//! # Cuetime Library
//!
//! Playback timer engine for live show control. Turns control commands and
//! clock samples into timer states, resolves display values, and aggregates
//! everything into one runtime snapshot that is republished on every change.

pub mod clock;
pub mod event;
pub mod runtime;
pub mod settings;
pub mod timer;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use event::{CustomField, Event};
pub use runtime::{RuntimeState, RuntimeStore, RuntimeUpdate, ShowTimers, TimerSlot};
pub use settings::{EngineSettings, SettingsError};
pub use timer::{Direction, Playback, SharedTimer, SimpleTimer, TimerError, TimerState};
