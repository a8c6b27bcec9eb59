//! Deterministic replay of timer commands with explicit timestamps.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::str::FromStr;

use clap::ArgMatches;
use cuetime_lib::runtime::{RuntimeState, RuntimeUpdate};
use cuetime_lib::{Direction, EngineSettings, SimpleTimer, TimerError, TimerState};
use log::info;

/// One replayed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Play(i64),
    Pause(i64),
    Update(i64),
    Stop,
    Duration(i64),
    Direction(Direction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    Malformed(String),
    Direction(TimerError),
}

impl Display for StepError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(step) => write!(f, "malformed step: {:?}", step),
            Self::Direction(err) => write!(f, "{}", err),
        }
    }
}

impl Error for StepError {}

impl FromStr for Step {
    type Err = StepError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || StepError::Malformed(value.to_string());
        let number = |text: &str| text.trim().parse::<i64>().map_err(|_| malformed());

        if value == "stop" {
            return Ok(Step::Stop);
        }
        if let Some((command, at)) = value.split_once('@') {
            let now = number(at)?;
            return match command {
                "play" => Ok(Step::Play(now)),
                "pause" => Ok(Step::Pause(now)),
                "update" => Ok(Step::Update(now)),
                _ => Err(malformed()),
            };
        }
        match value.split_once('=') {
            Some(("duration", ms)) => Ok(Step::Duration(number(ms)?)),
            Some(("direction", direction)) => direction
                .parse::<Direction>()
                .map(Step::Direction)
                .map_err(StepError::Direction),
            _ => Err(malformed()),
        }
    }
}

impl Step {
    pub fn apply(&self, timer: &mut SimpleTimer) -> Result<TimerState, TimerError> {
        let state = match *self {
            Step::Play(now) => timer.play(now),
            Step::Pause(now) => timer.pause(now),
            Step::Update(now) => timer.update(now),
            Step::Stop => timer.stop(),
            Step::Duration(ms) => timer.set_duration(ms)?,
            Step::Direction(direction) => timer.set_direction(direction),
        };
        Ok(state)
    }
}

/// Run the `simulate` subcommand.
pub fn run_simulate(args: &ArgMatches, settings: &EngineSettings) -> Result<i32, Box<dyn Error>> {
    let steps = args
        .get_many::<String>("STEP")
        .unwrap_or_default()
        .map(|step| step.parse::<Step>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut timer = SimpleTimer::new();
    timer.set_direction(settings.direction);
    timer.set_duration(settings.duration_ms)?;
    let runtime = RuntimeState::new(&settings.slots()?);
    runtime.apply(RuntimeUpdate::Timer(timer.state()))?;

    info!("simulating {} step(s)", steps.len());
    let mut out = io::stdout().lock();
    for step in &steps {
        let state = step.apply(&mut timer)?;
        runtime.apply(RuntimeUpdate::Timer(state))?;
        writeln!(out, "{}", serde_json::to_string(&state)?)?;
    }

    if args.get_flag("store") {
        writeln!(out, "{}", serde_json::to_string_pretty(&*runtime.snapshot())?)?;
    }

    Ok(0)
}
