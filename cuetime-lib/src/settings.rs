//! Startup configuration for the show timers.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runtime::{parse_slots, RuntimeError, TimerSlot, UnknownTimerSlot};
use crate::timer::{Direction, TimerError};

/// Default tick cadence in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 32;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    UnknownTimerSlot(#[from] UnknownTimerSlot),

    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("tick interval must be at least 1ms")]
    ZeroTickInterval,
}

/// Serialized engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub tick_interval_ms: u64,
    pub duration_ms: i64,
    pub direction: Direction,
    pub extra_timers: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            duration_ms: 0,
            direction: Direction::CountDown,
            extra_timers: vec![TimerSlot::Timer1.to_string()],
        }
    }
}

impl EngineSettings {
    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field without building anything.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_interval_ms == 0 {
            return Err(SettingsError::ZeroTickInterval);
        }
        if self.duration_ms < 0 {
            return Err(TimerError::InvalidDuration(self.duration_ms).into());
        }
        self.slots()?;
        Ok(())
    }

    /// Configured extra timer slots, checked against the known set.
    pub fn slots(&self) -> Result<Vec<TimerSlot>, SettingsError> {
        Ok(parse_slots(&self.extra_timers)?)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_json() {
        let json = EngineSettings::default().to_json_pretty().unwrap();
        assert!(json.contains("\"direction\": \"count-down\""));
        assert_eq!(
            EngineSettings::from_json(&json).unwrap(),
            EngineSettings::default()
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings =
            EngineSettings::from_json(r#"{"duration_ms": 300000, "direction": "count-up"}"#)
                .unwrap();
        assert_eq!(settings.duration_ms, 300_000);
        assert_eq!(settings.direction, Direction::CountUp);
        assert_eq!(settings.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(settings.slots().unwrap(), vec![TimerSlot::Timer1]);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(matches!(
            EngineSettings::from_json(r#"{"extra_timers": ["timer2"]}"#),
            Err(SettingsError::UnknownTimerSlot(_))
        ));
        assert!(matches!(
            EngineSettings::from_json(r#"{"duration_ms": -1}"#),
            Err(SettingsError::Timer(TimerError::InvalidDuration(-1)))
        ));
        assert!(matches!(
            EngineSettings::from_json(r#"{"tick_interval_ms": 0}"#),
            Err(SettingsError::ZeroTickInterval)
        ));
        assert!(matches!(
            EngineSettings::from_json(r#"{"direction": "backwards"}"#),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn no_extra_timers_is_allowed() {
        let settings = EngineSettings::from_json(r#"{"extra_timers": []}"#).unwrap();
        assert!(settings.slots().unwrap().is_empty());
    }
}
