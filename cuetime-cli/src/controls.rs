use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use cuetime_lib::clock::time_of_day;
use cuetime_lib::runtime::{RuntimeUpdate, ShowTimers, TimerCommand, TimerTarget};
use cuetime_lib::view::{get_timer_by_type, TimerTypeParams};
use cuetime_lib::{Direction, Playback, RuntimeStore, TimerSlot, TimerState};
use log::warn;

const DURATION_STEP_MS: i64 = 60_000;

/// One rendered timer row.
pub struct TimerLine {
    pub text: String,
    pub playback: Playback,
    pub overrun: bool,
}

pub struct StatusSnapshot {
    pub timers: Vec<TimerLine>,
    pub on_air: bool,
    pub public_message: Option<String>,
}

impl StatusSnapshot {
    pub fn any_overrun(&self) -> bool {
        self.timers.iter().any(|line| line.overrun)
    }
}

/// Build the status pane model for one runtime snapshot.
pub fn status_text(store: &RuntimeStore, now: i64) -> StatusSnapshot {
    let clock = time_of_day(now);
    let mut timers = vec![timer_line("Timer ", &store.timer, clock)];
    for (slot, timer) in &store.extra_timers {
        timers.push(timer_line(&format!("{:<6}", slot.as_str()), timer, clock));
    }

    StatusSnapshot {
        timers,
        on_air: store.on_air,
        public_message: store
            .public_message
            .visible
            .then(|| store.public_message.text.clone()),
    }
}

fn timer_line(label: &str, timer: &TimerState, clock: i64) -> TimerLine {
    let params = TimerTypeParams::from_timer(timer, clock);
    let shown = get_timer_by_type(Some(&params)).unwrap_or(timer.current);
    let state = match timer.playback {
        Playback::Play => "▶",
        Playback::Pause => "⏸",
        Playback::Stop => "⏹",
    };
    let overrun = match timer.direction {
        Direction::CountDown | Direction::TimeToEnd => timer.current < 0,
        Direction::CountUp => timer.current > timer.duration,
        Direction::Clock => false,
    };
    TimerLine {
        text: format!(
            "{} {} {}  / {}  [{}]{}",
            label,
            state,
            format_time(shown),
            format_time(timer.duration),
            timer.direction,
            if overrun { "  OVER" } else { "" }
        ),
        playback: timer.playback,
        overrun,
    }
}

/// Apply one key press. Returns `false` when the console should quit.
pub fn handle_key_event(timers: &ShowTimers) -> bool {
    if event::poll(Duration::from_millis(50)).unwrap_or(false) {
        if let Ok(Event::Key(key)) = event::read() {
            if key.kind != KeyEventKind::Press {
                return true;
            }
            let primary = TimerTarget::Primary;
            let result = match key.code {
                KeyCode::Char('q') => return false,
                KeyCode::Char(' ') => timers.command(primary, TimerCommand::Toggle).map(|_| ()),
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    timers.command(primary, TimerCommand::Stop).map(|_| ())
                }
                KeyCode::Char('d') | KeyCode::Char('D') => {
                    let next = timers.primary().state().direction.cycle();
                    timers
                        .command(primary, TimerCommand::SetDirection(next))
                        .map(|_| ())
                }
                KeyCode::Char('=') | KeyCode::Char('+') => {
                    let duration = timers
                        .primary()
                        .state()
                        .duration
                        .saturating_add(DURATION_STEP_MS);
                    timers
                        .command(primary, TimerCommand::SetDuration(duration))
                        .map(|_| ())
                }
                KeyCode::Char('-') => {
                    let duration = (timers.primary().state().duration - DURATION_STEP_MS).max(0);
                    timers
                        .command(primary, TimerCommand::SetDuration(duration))
                        .map(|_| ())
                }
                KeyCode::Char('1') => timers
                    .command(TimerTarget::Extra(TimerSlot::Timer1), TimerCommand::Toggle)
                    .map(|_| ()),
                KeyCode::Char('!') => timers
                    .command(TimerTarget::Extra(TimerSlot::Timer1), TimerCommand::Stop)
                    .map(|_| ()),
                KeyCode::Char('o') | KeyCode::Char('O') => {
                    let on_air = !timers.snapshot().on_air;
                    timers
                        .runtime()
                        .apply(RuntimeUpdate::OnAir(on_air))
                        .map(|_| ())
                }
                _ => Ok(()),
            };
            if let Err(err) = result {
                warn!("{}", err);
            }
        }
    }

    true
}

/// Format signed milliseconds as `hh:mm:ss`, prefixing overrun with `-`.
pub fn format_time(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let seconds = (ms.unsigned_abs() + 999) / 1000;
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    let hours = minutes / 60;
    let minutes = minutes % 60;

    format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_rounds_up_and_keeps_sign() {
        assert_eq!(format_time(0), "00:00:00");
        assert_eq!(format_time(1), "00:00:01");
        assert_eq!(format_time(61_000), "00:01:01");
        assert_eq!(format_time(3_600_000), "01:00:00");
        assert_eq!(format_time(-500), "-00:00:01");
    }

    #[test]
    fn status_marks_overrun() {
        let mut store = RuntimeStore::new(&[TimerSlot::Timer1]);
        store.timer = TimerState {
            duration: 1000,
            current: -600,
            direction: Direction::CountDown,
            playback: Playback::Play,
        };
        let status = status_text(&store, 0);
        assert!(status.any_overrun());
        assert!(status.timers[0].text.contains("-00:00:01"));
        assert!(status.timers[0].text.contains("OVER"));
        assert!(status.timers[1].text.contains("timer1"));
        assert!(!status.timers[1].overrun);
        assert_eq!(status.timers[1].playback, Playback::Stop);
    }

    #[test]
    fn status_carries_on_air_and_visible_message() {
        let mut store = RuntimeStore::new(&[]);
        store.on_air = true;
        store.public_message.text = "Doors open".to_string();
        let status = status_text(&store, 0);
        assert!(status.on_air);
        assert_eq!(status.public_message, None);

        store.public_message.visible = true;
        let status = status_text(&store, 0);
        assert_eq!(status.public_message.as_deref(), Some("Doors open"));
        assert_eq!(status.timers.len(), 1);
    }
}
