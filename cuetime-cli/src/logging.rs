use cuetime_lib::clock::{time_of_day, Clock, SystemClock};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

const LOG_CAPACITY: usize = 500;

pub type LogBuffer = Arc<Mutex<VecDeque<String>>>;

struct SharedLogger {
    level: LevelFilter,
    buffer: LogBuffer,
    echo_stderr: bool,
}

impl Log for SharedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(
            SystemClock.now_ms(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        if self.echo_stderr {
            eprintln!("{}", line);
        }

        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        if buffer.len() >= LOG_CAPACITY {
            buffer.pop_front();
        }
        buffer.push_back(line);
    }

    fn flush(&self) {}
}

static LOG_BUFFER: OnceLock<LogBuffer> = OnceLock::new();
static LOGGER: OnceLock<SharedLogger> = OnceLock::new();

/// Install the ring-buffer logger and return its buffer.
pub fn init() -> LogBuffer {
    let buffer = LOG_BUFFER
        .get_or_init(|| Arc::new(Mutex::new(VecDeque::with_capacity(LOG_CAPACITY))))
        .clone();

    let level = match std::env::var("RUST_LOG") {
        Ok(level) => parse_level(&level),
        Err(_) => LevelFilter::Info,
    };

    let echo_stderr = std::env::var("CUETIME_LOG_STDERR")
        .map(|value| value != "0")
        .unwrap_or(false);

    let logger = SharedLogger {
        level,
        buffer: buffer.clone(),
        echo_stderr,
    };

    let logger_ref = LOGGER.get_or_init(|| logger);
    if log::set_logger(logger_ref).is_ok() {
        log::set_max_level(level);
    }

    buffer
}

pub fn snapshot(buffer: &LogBuffer) -> Vec<String> {
    buffer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .cloned()
        .collect()
}

/// `hh:mm:ss [LEVEL] module: message`, stamped with the UTC time of day.
fn format_line(now_ms: i64, level: Level, target: &str, message: &str) -> String {
    let seconds = time_of_day(now_ms) / 1000;
    let module = target.rsplit("::").next().unwrap_or(target);
    format!(
        "{:02}:{:02}:{:02} [{}] {}: {}",
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60,
        level,
        module,
        message
    )
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_levels_fall_back_to_info() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }

    #[test]
    fn lines_carry_time_level_and_module() {
        let now = 3 * 86_400_000 + (13 * 3600 + 5 * 60 + 9) * 1000 + 250;
        assert_eq!(
            format_line(now, Level::Warn, "cuetime_lib::runtime::ticker", "tick failed"),
            "13:05:09 [WARN] ticker: tick failed"
        );
        assert_eq!(
            format_line(0, Level::Info, "cuetime", "Starting Cuetime console"),
            "00:00:00 [INFO] cuetime: Starting Cuetime console"
        );
    }
}
