//! CLI argument definitions for `cuetime`.

use clap::{value_parser, Arg, ArgAction, Command};

/// Wire names accepted for `--direction`.
pub const DIRECTION_NAMES: [&str; 4] = ["count-down", "count-up", "clock", "time-to-end"];

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    Command::new("Cuetime")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Show-control playback timer")
        .arg(
            Arg::new("settings-json")
                .long("settings-json")
                .short('S')
                .value_name("PATH")
                .global(true)
                .help("Path to JSON file containing engine settings"),
        )
        .arg(
            Arg::new("duration")
                .long("duration")
                .short('t')
                .value_name("MS")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .global(true)
                .help("Primary timer duration in milliseconds"),
        )
        .arg(
            Arg::new("direction")
                .long("direction")
                .short('D')
                .value_name("DIRECTION")
                .value_parser(DIRECTION_NAMES)
                .global(true)
                .help("Primary timer direction"),
        )
        .arg(
            Arg::new("tick-ms")
                .long("tick-ms")
                .value_name("MS")
                .value_parser(value_parser!(u64))
                .global(true)
                .help("Interval between timer updates in milliseconds"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .help("Do not draw the console; keys still control the timers"),
        )
        .subcommand(
            Command::new("simulate")
                .about("Replay timer commands with explicit timestamps and print each state as JSON")
                .arg(
                    Arg::new("store")
                        .long("store")
                        .action(ArgAction::SetTrue)
                        .help("Print the final runtime snapshot after the steps"),
                )
                .arg(
                    Arg::new("STEP")
                        .help("play@MS, pause@MS, update@MS, stop, duration=MS or direction=DIRECTION")
                        .num_args(1..)
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Emit default JSON payloads")
                .subcommand_required(true)
                .subcommand(
                    Command::new("settings-json").about("Print the default engine settings JSON"),
                ),
        )
}
