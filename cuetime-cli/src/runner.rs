use std::{error::Error, io, sync::Arc};

use clap::ArgMatches;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use cuetime_lib::runtime::{ShowTimers, Ticker};
use cuetime_lib::{Clock, EngineSettings, SystemClock};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::{cli, controls, logging, ui};

pub fn run(args: &ArgMatches, log_buffer: logging::LogBuffer) -> Result<i32, Box<dyn Error>> {
    match args.subcommand() {
        Some(("create", sub)) => match sub.subcommand() {
            Some(("settings-json", _)) => cli::print_default_settings(),
            _ => Ok(2),
        },
        Some(("simulate", sub)) => {
            let settings = cli::resolve_settings(sub)?;
            cli::simulate::run_simulate(sub, &settings)
        }
        _ => {
            let settings = cli::resolve_settings(args)?;
            run_console(&settings, args.get_flag("quiet"), log_buffer)
        }
    }
}

fn run_console(
    settings: &EngineSettings,
    quiet: bool,
    log_buffer: logging::LogBuffer,
) -> Result<i32, Box<dyn Error>> {
    info!("Starting Cuetime console");
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let timers = ShowTimers::from_settings(settings, clock.clone())?;
    let ticker = Ticker::new(timers.clone(), settings.tick_interval());
    ticker.start();

    let _raw_mode = RawModeGuard::enable().ok();
    let mut terminal = if !quiet {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, EnterAlternateScreen, cursor::Hide);
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).ok()
    } else {
        None
    };

    // UI / input loop; key polling paces the redraws.
    loop {
        if let Some(term) = terminal.as_mut() {
            let snapshot = timers.snapshot();
            let status = controls::status_text(&snapshot, clock.now_ms());
            let log_lines = logging::snapshot(&log_buffer);
            ui::draw_status(term, &status, &log_lines);
        }

        if !controls::handle_key_event(&timers) {
            break;
        }
    }

    ticker.stop();

    // Restore the terminal state before exiting.
    if let Some(mut term) = terminal {
        let _ = term.show_cursor();
        let stdout = term.backend_mut();
        let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
    }

    Ok(0)
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
