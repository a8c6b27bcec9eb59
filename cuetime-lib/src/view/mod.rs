//! Pure helpers used by display templates to pick what to show.

use crate::event::Event;
use crate::timer::{Direction, TimerState};

/// Prefix that routes a property name to the event's custom fields.
pub const CUSTOM_PROPERTY_PREFIX: &str = "custom-";

/// Projection of a timer needed to choose its display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTypeParams {
    pub timer_type: Direction,
    pub current: i64,
    pub elapsed: Option<i64>,
    pub clock: i64,
}

impl TimerTypeParams {
    /// Build the projection from an engine state and a time-of-day reading.
    pub fn from_timer(state: &TimerState, clock: i64) -> Self {
        let elapsed = match state.direction {
            Direction::CountDown | Direction::TimeToEnd => Some(state.duration - state.current),
            Direction::CountUp => Some(state.current - state.duration),
            Direction::Clock => None,
        };
        Self {
            timer_type: state.direction,
            current: state.current,
            elapsed,
            clock,
        }
    }
}

/// Value a display should show for the timer's direction.
///
/// Returns `None` only when no timer is supplied.
pub fn get_timer_by_type(timer: Option<&TimerTypeParams>) -> Option<i64> {
    let timer = timer?;
    let value = match timer.timer_type {
        Direction::CountDown | Direction::TimeToEnd => timer.current,
        Direction::CountUp => timer.elapsed.unwrap_or(0).abs(),
        Direction::Clock => timer.clock,
    };
    Some(value)
}

/// Resolve a display-bound property name against an event.
///
/// Names starting with `custom-` look up the remainder in the event's custom
/// fields; any other name is read as a built-in attribute.
pub fn get_property_value(event: Option<&Event>, property: Option<&str>) -> Option<String> {
    let event = event?;
    let property = property?;

    match property.strip_prefix(CUSTOM_PROPERTY_PREFIX) {
        Some(field) => event.custom.get(field).map(|custom| custom.value.clone()),
        None => event.attribute(property),
    }
}

/// Interpret a query-string style flag: `true` (any case) or `1`.
pub fn is_string_boolean(text: Option<&str>) -> bool {
    match text {
        Some(text) => text.eq_ignore_ascii_case("true") || text == "1",
        None => false,
    }
}
