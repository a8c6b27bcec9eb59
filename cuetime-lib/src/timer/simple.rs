//! Elapsed-time engine for a single timer.

use log::{debug, info, warn};

use crate::clock::time_of_day;

use super::{Direction, Playback, TimerError, TimerState};

/// Converts control commands and clock samples into a [`TimerState`].
///
/// Every timing-sensitive call takes `now` explicitly, so a given sequence
/// of calls always produces the same states.
#[derive(Debug, Clone, Default)]
pub struct SimpleTimer {
    state: TimerState,
    started_at: Option<i64>,
    paused_accumulated: i64,
    last_pause_at: Option<i64>,
}

impl SimpleTimer {
    /// Create a stopped count-down timer with zero duration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last published state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Set the duration and reset the running data.
    ///
    /// Playback is left as it is. A playing timer re-anchors its start on the
    /// next `update`.
    ///
    /// # Errors
    /// Returns [`TimerError::InvalidDuration`] for negative input; the timer
    /// is left unchanged.
    pub fn set_duration(&mut self, ms: i64) -> Result<TimerState, TimerError> {
        if ms < 0 {
            warn!("rejecting negative timer duration {}ms", ms);
            return Err(TimerError::InvalidDuration(ms));
        }
        self.state.duration = ms;
        self.state.current = ms;
        self.clear_accounting();
        Ok(self.state)
    }

    /// Change how the timer counts. Current value and playback are kept.
    pub fn set_direction(&mut self, direction: Direction) -> TimerState {
        self.state.direction = direction;
        self.state
    }

    /// Start or resume the timer at `now`.
    pub fn play(&mut self, now: i64) -> TimerState {
        match self.state.playback {
            Playback::Play => {
                debug!("play ignored, timer already running");
            }
            Playback::Stop => {
                self.started_at = Some(now);
                self.paused_accumulated = 0;
                self.last_pause_at = None;
                self.state.playback = Playback::Play;
                info!("timer started at {}", now);
            }
            Playback::Pause => {
                match (self.started_at, self.last_pause_at.take()) {
                    (Some(_), Some(paused_at)) => {
                        self.paused_accumulated = self
                            .paused_accumulated
                            .saturating_add(now.saturating_sub(paused_at));
                    }
                    // accounting was cleared while paused
                    _ => {
                        self.started_at = Some(now);
                        self.paused_accumulated = 0;
                    }
                }
                self.state.playback = Playback::Play;
                info!("timer resumed at {}", now);
            }
        }
        self.state
    }

    /// Freeze the timer at its value for `now`.
    pub fn pause(&mut self, now: i64) -> TimerState {
        if self.state.playback != Playback::Play {
            debug!("pause ignored, timer is {}", self.state.playback);
            return self.state;
        }
        self.state.current = self.compute_current(now);
        self.last_pause_at = Some(now);
        self.state.playback = Playback::Pause;
        info!("timer paused at {}", now);
        self.state
    }

    /// Reset to the configured duration and clear the running data.
    pub fn stop(&mut self) -> TimerState {
        self.state.current = self.state.duration;
        self.state.playback = Playback::Stop;
        self.clear_accounting();
        info!("timer stopped");
        self.state
    }

    /// Recompute `current` for `now`. A no-op unless playing.
    pub fn update(&mut self, now: i64) -> TimerState {
        if self.state.playback != Playback::Play {
            return self.state;
        }
        self.state.current = self.compute_current(now);
        self.state
    }

    /// Time accrued while playing up to `now`, excluding paused intervals.
    ///
    /// While paused this is the elapsed time at the moment of pausing.
    pub fn elapsed(&self, now: i64) -> i64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let until = match (self.state.playback, self.last_pause_at) {
            (Playback::Pause, Some(paused_at)) => paused_at,
            _ => now,
        };
        until
            .saturating_sub(started_at)
            .saturating_sub(self.paused_accumulated)
    }

    fn compute_current(&mut self, now: i64) -> i64 {
        let started_at = *self.started_at.get_or_insert(now);
        // extreme timestamps saturate instead of wrapping
        let elapsed = now
            .saturating_sub(started_at)
            .saturating_sub(self.paused_accumulated);
        match self.state.direction {
            Direction::CountDown | Direction::TimeToEnd => {
                self.state.duration.saturating_sub(elapsed)
            }
            Direction::CountUp => self.state.duration.saturating_add(elapsed),
            Direction::Clock => time_of_day(now),
        }
    }

    fn clear_accounting(&mut self) {
        self.started_at = None;
        self.paused_accumulated = 0;
        self.last_pause_at = None;
    }
}
