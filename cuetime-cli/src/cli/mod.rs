pub mod args;
pub mod simulate;

use std::error::Error;

use clap::ArgMatches;
use cuetime_lib::{Direction, EngineSettings};

/// Load settings from `--settings-json` (or defaults) and apply flag overrides.
pub fn resolve_settings(args: &ArgMatches) -> Result<EngineSettings, Box<dyn Error>> {
    let mut settings = match args.get_one::<String>("settings-json") {
        Some(path) => EngineSettings::from_file(path)?,
        None => EngineSettings::default(),
    };

    if let Some(duration) = args.get_one::<i64>("duration") {
        settings.duration_ms = *duration;
    }
    if let Some(direction) = args.get_one::<String>("direction") {
        settings.direction = direction.parse::<Direction>()?;
    }
    if let Some(tick_ms) = args.get_one::<u64>("tick-ms") {
        settings.tick_interval_ms = *tick_ms;
    }

    settings.validate()?;
    Ok(settings)
}

/// Print the default engine settings JSON.
pub fn print_default_settings() -> Result<i32, Box<dyn Error>> {
    println!("{}", EngineSettings::default().to_json_pretty()?);
    Ok(0)
}
