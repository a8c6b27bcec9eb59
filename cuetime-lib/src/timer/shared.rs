//! Thread-safe handle around a [`SimpleTimer`].
//!
//! Control commands may arrive from a command handler while a ticker calls
//! `update` on the same instance. The handle samples `now` from its clock
//! before taking the lock, so a command keeps the timestamp of its arrival
//! even when it has to wait for a tick to finish.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::clock::Clock;

use super::{Direction, Playback, SimpleTimer, TimerError, TimerState};

#[derive(Clone)]
pub struct SharedTimer {
    timer: Arc<Mutex<SimpleTimer>>,
    clock: Arc<dyn Clock>,
}

impl SharedTimer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::from_timer(SimpleTimer::new(), clock)
    }

    pub fn from_timer(timer: SimpleTimer, clock: Arc<dyn Clock>) -> Self {
        Self {
            timer: Arc::new(Mutex::new(timer)),
            clock,
        }
    }

    pub fn state(&self) -> TimerState {
        self.lock().state()
    }

    pub fn set_duration(&self, ms: i64) -> Result<TimerState, TimerError> {
        self.lock().set_duration(ms)
    }

    pub fn set_direction(&self, direction: Direction) -> TimerState {
        self.lock().set_direction(direction)
    }

    pub fn play(&self) -> TimerState {
        let now = self.clock.now_ms();
        self.lock().play(now)
    }

    pub fn pause(&self) -> TimerState {
        let now = self.clock.now_ms();
        self.lock().pause(now)
    }

    /// Pause when running, play otherwise.
    pub fn toggle(&self) -> TimerState {
        let now = self.clock.now_ms();
        let mut timer = self.lock();
        match timer.state().playback {
            Playback::Play => timer.pause(now),
            Playback::Stop | Playback::Pause => timer.play(now),
        }
    }

    pub fn stop(&self) -> TimerState {
        self.lock().stop()
    }

    pub fn update(&self) -> TimerState {
        let now = self.clock.now_ms();
        self.update_at(now)
    }

    /// Apply a tick sampled by the caller.
    pub fn update_at(&self, now: i64) -> TimerState {
        self.lock().update(now)
    }

    /// Elapsed play time at the clock's current reading.
    pub fn elapsed(&self) -> i64 {
        let now = self.clock.now_ms();
        self.lock().elapsed(now)
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    fn lock(&self) -> MutexGuard<'_, SimpleTimer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SharedTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTimer")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn commands_use_the_clock_reading() {
        let clock = Arc::new(ManualClock::new(0));
        let timer = SharedTimer::new(clock.clone());
        timer.set_duration(1000).unwrap();

        timer.play();
        clock.set(300);
        assert_eq!(timer.update().current, 700);
        clock.set(500);
        assert_eq!(timer.pause().current, 500);
        clock.set(900);
        assert_eq!(timer.update().current, 500);
        assert_eq!(timer.toggle().playback, Playback::Play);
        clock.set(1000);
        assert_eq!(timer.update().current, 400);
        assert_eq!(timer.elapsed(), 600);
    }

    #[test]
    fn clones_share_one_engine() {
        let clock = Arc::new(ManualClock::new(0));
        let timer = SharedTimer::new(clock.clone());
        timer.set_duration(10_000).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let timer = timer.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        timer.play();
                        timer.update_at(100);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker thread");
        }

        assert_eq!(timer.state().playback, Playback::Play);
        assert_eq!(timer.update_at(100).current, 9_900);
    }
}
