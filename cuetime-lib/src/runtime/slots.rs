//! Identifiers of the extra timer slots.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Addressable secondary timer alongside the primary show timer.
///
/// The set is closed; slot names from configuration are checked against it
/// at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimerSlot {
    #[serde(rename = "timer1")]
    Timer1,
}

impl TimerSlot {
    pub const ALL: [TimerSlot; 1] = [TimerSlot::Timer1];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerSlot::Timer1 => "timer1",
        }
    }
}

impl Display for TimerSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timer slot: {0:?}")]
pub struct UnknownTimerSlot(pub String);

impl FromStr for TimerSlot {
    type Err = UnknownTimerSlot;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TimerSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == value)
            .ok_or_else(|| UnknownTimerSlot(value.to_string()))
    }
}

/// Parse and de-duplicate slot names, keeping first-seen order.
pub fn parse_slots<S: AsRef<str>>(names: &[S]) -> Result<Vec<TimerSlot>, UnknownTimerSlot> {
    let mut slots = Vec::with_capacity(names.len());
    for name in names {
        let slot = name.as_ref().parse::<TimerSlot>()?;
        if !slots.contains(&slot) {
            slots.push(slot);
        }
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_slots_once() {
        let slots = parse_slots(&["timer1", "timer1"]).expect("known slots");
        assert_eq!(slots, vec![TimerSlot::Timer1]);
    }

    #[test]
    fn rejects_unknown_slot_names() {
        assert_eq!(
            parse_slots(&["timer1", "timer9"]),
            Err(UnknownTimerSlot("timer9".to_string()))
        );
    }
}
