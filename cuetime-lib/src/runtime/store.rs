//! The composite runtime snapshot and the partial updates that build it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::timer::{Playback, SimpleTimerState, TimerState};

use super::error::RuntimeError;
use super::slots::TimerSlot;

/// A text channel shown on one class of display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub text: String,
    pub visible: bool,
}

impl Message {
    pub fn shown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
        }
    }
}

/// Message shown over the stage timer, with timer display overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerMessage {
    pub text: String,
    pub visible: bool,
    pub timer_blink: bool,
    pub timer_blackout: bool,
}

/// Position of the loaded event within the rundown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Loaded {
    pub num_events: usize,
    pub selected_event_index: Option<usize>,
    pub selected_event_id: Option<String>,
    pub selected_public_event_id: Option<String>,
    pub next_event_id: Option<String>,
    pub next_public_event_id: Option<String>,
}

/// Everything the event loader owns in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedEvents {
    pub loaded: Loaded,
    pub event_now: Option<Event>,
    pub public_event_now: Option<Event>,
    pub event_next: Option<Event>,
    pub public_event_next: Option<Event>,
}

/// A partial update submitted by exactly one owning subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeUpdate {
    Timer(TimerState),
    ExtraTimer(TimerSlot, SimpleTimerState),
    TimerMessage(TimerMessage),
    PublicMessage(Message),
    LowerMessage(Message),
    ExternalMessage(Message),
    OnAir(bool),
    EventLoader(LoadedEvents),
}

/// Immutable snapshot of all live timer and event-loader state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeStore {
    pub timer: TimerState,
    pub playback: Playback,

    pub timer_message: TimerMessage,
    pub public_message: Message,
    pub lower_message: Message,
    pub external_message: Message,
    pub on_air: bool,

    pub loaded: Loaded,
    pub event_now: Option<Event>,
    pub public_event_now: Option<Event>,
    pub event_next: Option<Event>,
    pub public_event_next: Option<Event>,

    #[serde(flatten)]
    pub extra_timers: BTreeMap<TimerSlot, SimpleTimerState>,
}

impl RuntimeStore {
    /// Empty snapshot with one stopped timer per configured slot.
    pub fn new(slots: &[TimerSlot]) -> Self {
        Self {
            extra_timers: slots
                .iter()
                .map(|slot| (*slot, SimpleTimerState::default()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn extra_timer(&self, slot: TimerSlot) -> Option<&SimpleTimerState> {
        self.extra_timers.get(&slot)
    }

    /// Return a new snapshot with `update` merged in.
    ///
    /// Fields outside the update are carried over unchanged.
    ///
    /// # Errors
    /// Returns [`RuntimeError::InactiveTimerSlot`] when an extra timer update
    /// targets a slot that was not configured at startup.
    pub fn merged(&self, update: RuntimeUpdate) -> Result<RuntimeStore, RuntimeError> {
        let mut next = self.clone();
        next.merge(update)?;
        Ok(next)
    }

    pub(super) fn merge(&mut self, update: RuntimeUpdate) -> Result<(), RuntimeError> {
        match update {
            RuntimeUpdate::Timer(timer) => {
                self.timer = timer;
                self.playback = timer.playback;
            }
            RuntimeUpdate::ExtraTimer(slot, timer) => match self.extra_timers.get_mut(&slot) {
                Some(current) => *current = timer,
                None => return Err(RuntimeError::InactiveTimerSlot(slot)),
            },
            RuntimeUpdate::TimerMessage(message) => self.timer_message = message,
            RuntimeUpdate::PublicMessage(message) => self.public_message = message,
            RuntimeUpdate::LowerMessage(message) => self.lower_message = message,
            RuntimeUpdate::ExternalMessage(message) => self.external_message = message,
            RuntimeUpdate::OnAir(on_air) => self.on_air = on_air,
            RuntimeUpdate::EventLoader(events) => {
                self.loaded = events.loaded;
                self.event_now = events.event_now;
                self.public_event_now = events.public_event_now;
                self.event_next = events.event_next;
                self.public_event_next = events.public_event_next;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Direction;

    fn running(current: i64) -> TimerState {
        TimerState {
            duration: 1000,
            current,
            direction: Direction::CountDown,
            playback: Playback::Play,
        }
    }

    #[test]
    fn timer_update_mirrors_playback_at_top_level() {
        let store = RuntimeStore::new(&[TimerSlot::Timer1]);
        let next = store.merged(RuntimeUpdate::Timer(running(900))).unwrap();
        assert_eq!(next.playback, Playback::Play);
        assert_eq!(next.timer.current, 900);
        assert_eq!(store.playback, Playback::Stop);
    }

    #[test]
    fn untouched_fields_are_carried_over() {
        let store = RuntimeStore::new(&[TimerSlot::Timer1])
            .merged(RuntimeUpdate::PublicMessage(Message::shown("Welcome")))
            .unwrap()
            .merged(RuntimeUpdate::OnAir(true))
            .unwrap();
        let next = store.merged(RuntimeUpdate::Timer(running(500))).unwrap();
        assert_eq!(next.public_message, Message::shown("Welcome"));
        assert!(next.on_air);
        assert_eq!(next.extra_timers, store.extra_timers);
    }

    #[test]
    fn extra_timer_updates_need_a_configured_slot() {
        let store = RuntimeStore::new(&[]);
        assert_eq!(
            store.merged(RuntimeUpdate::ExtraTimer(TimerSlot::Timer1, running(1))),
            Err(RuntimeError::InactiveTimerSlot(TimerSlot::Timer1))
        );
    }

    #[test]
    fn snapshot_serializes_with_flattened_extra_timers() {
        let mut events = LoadedEvents::default();
        events.loaded.num_events = 3;
        events.event_now = Some(Event::new("a", "Opening"));
        let store = RuntimeStore::new(&[TimerSlot::Timer1])
            .merged(RuntimeUpdate::EventLoader(events))
            .unwrap();

        let value = serde_json::to_value(&store).expect("serialize store");
        assert_eq!(value["timer1"]["playback"], "stop");
        assert_eq!(value["timer"]["direction"], "count-down");
        assert_eq!(value["onAir"], false);
        assert_eq!(value["loaded"]["numEvents"], 3);
        assert_eq!(value["eventNow"]["title"], "Opening");
        assert!(value["eventNext"].is_null());
        assert_eq!(value["timerMessage"]["timerBlink"], false);
    }
}
