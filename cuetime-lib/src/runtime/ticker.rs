//! Fixed-cadence driver that ticks the show timers.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::JoinHandle,
    time::Duration,
};

use log::{info, warn};

use super::ShowTimers;

/// Background thread calling [`ShowTimers::tick`] at a fixed interval.
#[derive(Clone)]
pub struct Ticker {
    timers: ShowTimers,
    interval: Duration,
    finish: Arc<AtomicBool>,
    thread_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Ticker {
    pub fn new(timers: ShowTimers, interval: Duration) -> Self {
        Self {
            timers,
            interval,
            finish: Arc::new(AtomicBool::new(false)),
            thread_handle: Arc::new(Mutex::new(None)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.handle().is_some()
    }

    fn run(&self) {
        loop {
            if let Err(err) = self.timers.tick() {
                warn!("tick rejected: {}", err);
            }

            if self.finish.load(Ordering::Relaxed) {
                break;
            }

            std::thread::sleep(self.interval);
        }
    }

    /// Start the background tick thread.
    pub fn start(&self) {
        self.stop();
        self.finish.store(false, Ordering::Relaxed);
        let this = self.clone();
        let handle = std::thread::spawn(move || this.run());
        *self.handle() = Some(handle);
        info!("ticker started every {}ms", self.interval.as_millis());
    }

    /// Stop the background tick thread and wait for it to exit.
    pub fn stop(&self) {
        self.finish.store(true, Ordering::Relaxed);
        let handle = self.handle().take();
        if let Some(handle) = handle {
            if handle.thread().id() == std::thread::current().id() {
                warn!("ticker stop called from ticker thread; skipping join");
            } else if handle.join().is_err() {
                warn!("ticker thread panicked during join");
            } else {
                info!("ticker stopped");
            }
        }
    }

    fn handle(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.thread_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
