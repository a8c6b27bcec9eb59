//! The set of live timers and their link to the runtime snapshot.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::info;

use crate::clock::Clock;
use crate::settings::{EngineSettings, SettingsError};
use crate::timer::{Direction, SharedTimer, TimerState};

use super::{RuntimeError, RuntimeState, RuntimeStore, RuntimeUpdate, TimerSlot};

/// Which timer a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTarget {
    Primary,
    Extra(TimerSlot),
}

impl Display for TimerTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerTarget::Primary => f.write_str("timer"),
            TimerTarget::Extra(slot) => write!(f, "{}", slot),
        }
    }
}

/// Control command for a single timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Play,
    Pause,
    Toggle,
    Stop,
    SetDuration(i64),
    SetDirection(Direction),
}

/// Primary timer plus the extra timers fixed at startup.
///
/// Every command result is submitted to the shared [`RuntimeState`] right
/// away, so control changes are visible without waiting for the next tick.
#[derive(Clone)]
pub struct ShowTimers {
    primary: SharedTimer,
    extra: BTreeMap<TimerSlot, SharedTimer>,
    runtime: Arc<RuntimeState>,
    clock: Arc<dyn Clock>,
}

impl ShowTimers {
    pub fn new(slots: &[TimerSlot], clock: Arc<dyn Clock>) -> Self {
        let extra = slots
            .iter()
            .map(|slot| (*slot, SharedTimer::new(clock.clone())))
            .collect();
        Self {
            primary: SharedTimer::new(clock.clone()),
            extra,
            runtime: Arc::new(RuntimeState::new(slots)),
            clock,
        }
    }

    /// Build the timers described by `settings` and publish their first state.
    pub fn from_settings(
        settings: &EngineSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SettingsError> {
        let slots = settings.slots()?;
        let timers = Self::new(&slots, clock);
        timers.command(
            TimerTarget::Primary,
            TimerCommand::SetDirection(settings.direction),
        )?;
        timers.command(
            TimerTarget::Primary,
            TimerCommand::SetDuration(settings.duration_ms),
        )?;
        info!(
            "show timers ready: {}ms {}, {} extra timer(s)",
            settings.duration_ms,
            settings.direction,
            slots.len()
        );
        Ok(timers)
    }

    pub fn primary(&self) -> &SharedTimer {
        &self.primary
    }

    pub fn extra(&self, slot: TimerSlot) -> Option<&SharedTimer> {
        self.extra.get(&slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = TimerSlot> + '_ {
        self.extra.keys().copied()
    }

    pub fn runtime(&self) -> &Arc<RuntimeState> {
        &self.runtime
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn snapshot(&self) -> Arc<RuntimeStore> {
        self.runtime.snapshot()
    }

    /// Run `command` against `target` and publish the resulting state.
    ///
    /// The command and its publication happen under the runtime writer lock,
    /// so a concurrent [`ShowTimers::tick`] can never publish an older state
    /// after this one.
    pub fn command(
        &self,
        target: TimerTarget,
        command: TimerCommand,
    ) -> Result<TimerState, RuntimeError> {
        let timer = self.timer(target)?;
        let mut state = timer.state();
        self.runtime.apply_with(|| {
            state = match command {
                TimerCommand::Play => timer.play(),
                TimerCommand::Pause => timer.pause(),
                TimerCommand::Toggle => timer.toggle(),
                TimerCommand::Stop => timer.stop(),
                TimerCommand::SetDuration(ms) => timer.set_duration(ms)?,
                TimerCommand::SetDirection(direction) => timer.set_direction(direction),
            };
            Ok([Self::update_for(target, state)])
        })?;
        Ok(state)
    }

    /// Update every timer with one clock sample and publish them together.
    pub fn tick(&self) -> Result<Arc<RuntimeStore>, RuntimeError> {
        self.runtime.apply_with(|| {
            let now = self.clock.now_ms();
            let mut updates = Vec::with_capacity(1 + self.extra.len());
            updates.push(RuntimeUpdate::Timer(self.primary.update_at(now)));
            for (slot, timer) in &self.extra {
                updates.push(RuntimeUpdate::ExtraTimer(*slot, timer.update_at(now)));
            }
            Ok(updates)
        })
    }

    fn timer(&self, target: TimerTarget) -> Result<&SharedTimer, RuntimeError> {
        match target {
            TimerTarget::Primary => Ok(&self.primary),
            TimerTarget::Extra(slot) => self
                .extra
                .get(&slot)
                .ok_or(RuntimeError::InactiveTimerSlot(slot)),
        }
    }

    fn update_for(target: TimerTarget, state: TimerState) -> RuntimeUpdate {
        match target {
            TimerTarget::Primary => RuntimeUpdate::Timer(state),
            TimerTarget::Extra(slot) => RuntimeUpdate::ExtraTimer(slot, state),
        }
    }
}

impl std::fmt::Debug for ShowTimers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShowTimers")
            .field("primary", &self.primary)
            .field("extra", &self.extra)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::clock::ManualClock;
    use crate::timer::{Playback, TimerError};

    fn timers() -> (Arc<ManualClock>, ShowTimers) {
        let clock = Arc::new(ManualClock::new(0));
        let settings = EngineSettings {
            duration_ms: 60_000,
            ..EngineSettings::default()
        };
        let timers = ShowTimers::from_settings(&settings, clock.clone()).expect("settings");
        (clock, timers)
    }

    #[test]
    fn settings_are_published_before_the_first_tick() {
        let (_, timers) = timers();
        let snapshot = timers.snapshot();
        assert_eq!(snapshot.timer.duration, 60_000);
        assert_eq!(snapshot.timer.current, 60_000);
        assert_eq!(snapshot.playback, Playback::Stop);
        assert!(snapshot.extra_timer(TimerSlot::Timer1).is_some());
    }

    #[test]
    fn commands_and_ticks_reach_the_snapshot() {
        let (clock, timers) = timers();
        timers
            .command(TimerTarget::Primary, TimerCommand::Play)
            .unwrap();
        assert_eq!(timers.snapshot().playback, Playback::Play);

        clock.set(1_500);
        let snapshot = timers.tick().unwrap();
        assert_eq!(snapshot.timer.current, 58_500);

        let extra = TimerTarget::Extra(TimerSlot::Timer1);
        timers
            .command(extra, TimerCommand::SetDirection(Direction::CountUp))
            .unwrap();
        timers.command(extra, TimerCommand::Toggle).unwrap();
        clock.set(2_000);
        let snapshot = timers.tick().unwrap();
        assert_eq!(snapshot.timer.current, 58_000);
        assert_eq!(
            snapshot.extra_timer(TimerSlot::Timer1).map(|t| t.current),
            Some(500)
        );
    }

    #[test]
    fn rejected_duration_keeps_the_published_state() {
        let (_, timers) = timers();
        let before = timers.snapshot();
        assert_eq!(
            timers.command(TimerTarget::Primary, TimerCommand::SetDuration(-5)),
            Err(RuntimeError::Timer(TimerError::InvalidDuration(-5)))
        );
        assert!(Arc::ptr_eq(&before, &timers.snapshot()));
    }

    #[test]
    fn missing_slot_is_rejected() {
        let clock = Arc::new(ManualClock::new(0));
        let timers = ShowTimers::new(&[], clock);
        assert_eq!(
            timers.command(TimerTarget::Extra(TimerSlot::Timer1), TimerCommand::Play),
            Err(RuntimeError::InactiveTimerSlot(TimerSlot::Timer1))
        );
    }

    #[test]
    fn ticks_never_overwrite_a_newer_command() {
        let (clock, timers) = timers();
        // slow subscriber widens the gap between computing and publishing
        timers
            .runtime()
            .subscribe(|_| thread::sleep(Duration::from_micros(200)));

        let finish = Arc::new(AtomicBool::new(false));
        let ticking = {
            let timers = timers.clone();
            let clock = clock.clone();
            let finish = finish.clone();
            thread::spawn(move || {
                while !finish.load(Ordering::Relaxed) {
                    clock.advance(1);
                    timers.tick().unwrap();
                }
            })
        };

        for _ in 0..49 {
            timers
                .command(TimerTarget::Primary, TimerCommand::Toggle)
                .unwrap();
        }
        finish.store(true, Ordering::Relaxed);
        ticking.join().expect("tick thread");

        assert_eq!(timers.primary().state().playback, Playback::Play);
        assert_eq!(timers.primary().state(), timers.snapshot().timer);

        timers
            .command(TimerTarget::Primary, TimerCommand::Pause)
            .unwrap();
        clock.advance(10);
        timers.tick().unwrap();
        assert_eq!(timers.primary().state().playback, Playback::Pause);
        assert_eq!(timers.primary().state(), timers.snapshot().timer);
    }
}
