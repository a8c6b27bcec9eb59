//! Clock sources feeding `now` into the timer engine.
//!
//! The engine never reads the wall clock itself. Callers sample a [`Clock`]
//! and pass the value into every timing-sensitive operation.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::SystemTime;

/// Milliseconds in one day.
pub const DAY_MS: i64 = 86_400_000;

/// Source of millisecond timestamps.
pub trait Clock: Send + Sync {
    /// Current timestamp in milliseconds since the clock's epoch.
    fn now_ms(&self) -> i64;
}

/// Wall clock measured in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Clock whose value only moves when told to.
///
/// Used by tests and by the `simulate` command to replay timestamps
/// deterministically.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(start_ms),
        }
    }

    /// Jump to `ms`. Moving backwards is ignored.
    pub fn set(&self, ms: i64) {
        self.now.fetch_max(ms, Ordering::SeqCst);
    }

    /// Move forward by `delta_ms` and return the new value.
    pub fn advance(&self, delta_ms: i64) -> i64 {
        self.now.fetch_add(delta_ms.max(0), Ordering::SeqCst) + delta_ms.max(0)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Reinterpret a timestamp as milliseconds since midnight.
pub fn time_of_day(now: i64) -> i64 {
    now.rem_euclid(DAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_never_goes_backwards() {
        let clock = ManualClock::new(100);
        clock.set(50);
        assert_eq!(clock.now_ms(), 100);
        clock.set(250);
        assert_eq!(clock.now_ms(), 250);
        assert_eq!(clock.advance(-10), 250);
        assert_eq!(clock.advance(10), 260);
    }

    #[test]
    fn time_of_day_wraps_at_midnight() {
        assert_eq!(time_of_day(0), 0);
        assert_eq!(time_of_day(DAY_MS + 1_000), 1_000);
        assert_eq!(time_of_day(-1_000), DAY_MS - 1_000);
    }

    #[test]
    fn system_clock_is_past_epoch() {
        assert!(SystemClock.now_ms() > 0);
    }
}
