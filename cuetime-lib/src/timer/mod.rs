//! Timer state types and the elapsed-time engine.

mod error;
mod shared;
mod simple;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error::TimerError;
pub use shared::SharedTimer;
pub use simple::SimpleTimer;

/// Configured display mode of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    CountDown,
    CountUp,
    Clock,
    TimeToEnd,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::CountDown,
        Direction::CountUp,
        Direction::Clock,
        Direction::TimeToEnd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::CountDown => "count-down",
            Direction::CountUp => "count-up",
            Direction::Clock => "clock",
            Direction::TimeToEnd => "time-to-end",
        }
    }

    /// Next direction in display order, wrapping around.
    pub fn cycle(&self) -> Direction {
        match self {
            Direction::CountDown => Direction::CountUp,
            Direction::CountUp => Direction::Clock,
            Direction::Clock => Direction::TimeToEnd,
            Direction::TimeToEnd => Direction::CountDown,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TimerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.as_str() == value)
            .ok_or_else(|| TimerError::InvalidDirection(value.to_string()))
    }
}

/// Control state of a timer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Playback {
    #[default]
    Stop,
    Play,
    Pause,
}

impl Display for Playback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Playback::Stop => "stop",
            Playback::Play => "play",
            Playback::Pause => "pause",
        };
        f.write_str(label)
    }
}

/// Published state of a timer, fixed at the last control or update call.
///
/// `current` is signed: count-down timers go negative on overrun and
/// count-up timers grow past `duration`. Neither is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerState {
    pub duration: i64,
    pub current: i64,
    pub direction: Direction,
    pub playback: Playback,
}

/// Extra timers publish the same shape as the primary timer.
pub type SimpleTimerState = TimerState;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_wire_names() {
        for direction in Direction::ALL {
            assert_eq!(direction.as_str().parse::<Direction>().unwrap(), direction);
        }
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(TimerError::InvalidDirection(value)) if value == "sideways"
        ));
    }

    #[test]
    fn direction_cycle_visits_every_variant() {
        let mut direction = Direction::CountDown;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(direction);
            direction = direction.cycle();
        }
        assert_eq!(direction, Direction::CountDown);
        assert_eq!(seen, Direction::ALL.to_vec());
    }

    #[test]
    fn timer_state_serializes_to_wire_shape() {
        let state = TimerState {
            duration: 1000,
            current: -500,
            direction: Direction::CountDown,
            playback: Playback::Pause,
        };
        let json = serde_json::to_string(&state).expect("serialize timer state");
        assert_eq!(
            json,
            r#"{"duration":1000,"current":-500,"direction":"count-down","playback":"pause"}"#
        );
    }

    #[test]
    fn unknown_direction_is_rejected_by_serde() {
        let json = r#"{"duration":0,"current":0,"direction":"up-ish","playback":"stop"}"#;
        assert!(serde_json::from_str::<TimerState>(json).is_err());
    }
}
