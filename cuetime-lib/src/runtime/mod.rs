//! Runtime state aggregation and publication.
//!
//! [`RuntimeState`] is the single writer of the composite [`RuntimeStore`].
//! Subsystems submit [`RuntimeUpdate`]s; each accepted batch produces a new
//! snapshot that replaces the previous one in a single swap and is handed to
//! every subscriber as an `Arc`.

mod error;
mod service;
mod slots;
mod store;
mod ticker;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use log::{info, warn};

pub use error::RuntimeError;
pub use service::{ShowTimers, TimerCommand, TimerTarget};
pub use slots::{parse_slots, TimerSlot, UnknownTimerSlot};
pub use store::{Loaded, LoadedEvents, Message, RuntimeStore, RuntimeUpdate, TimerMessage};
pub use ticker::Ticker;

type Callback = Box<dyn Fn(Arc<RuntimeStore>) + Send>;

enum Subscriber {
    Callback(Callback),
    Channel(Sender<Arc<RuntimeStore>>),
}

/// Owner of the current runtime snapshot.
///
/// Subscribers are invoked on the writer's thread while the writer lock is
/// held, so they observe snapshots in publication order. They must not call
/// back into [`RuntimeState::apply`] or register new subscribers.
pub struct RuntimeState {
    writer: Mutex<()>,
    current: RwLock<Arc<RuntimeStore>>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl RuntimeState {
    /// Create the aggregator with one extra timer per slot.
    pub fn new(slots: &[TimerSlot]) -> Self {
        info!(
            "runtime state created with extra timers [{}]",
            slots
                .iter()
                .map(TimerSlot::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self {
            writer: Mutex::new(()),
            current: RwLock::new(Arc::new(RuntimeStore::new(slots))),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// The latest complete snapshot.
    pub fn snapshot(&self) -> Arc<RuntimeStore> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge one update and republish if anything changed.
    pub fn apply(&self, update: RuntimeUpdate) -> Result<Arc<RuntimeStore>, RuntimeError> {
        self.apply_all([update])
    }

    /// Merge a batch of updates from one subsystem as a single publication.
    ///
    /// Either every update is merged or, on error, none is and the previous
    /// snapshot stays current.
    pub fn apply_all<I>(&self, updates: I) -> Result<Arc<RuntimeStore>, RuntimeError>
    where
        I: IntoIterator<Item = RuntimeUpdate>,
    {
        self.apply_with(|| Ok(updates))
    }

    /// Produce a batch with `produce` and merge it, both under the writer lock.
    ///
    /// Writers that read shared state to build their updates use this so that
    /// publication order matches the order in which that state was read.
    /// `produce` must not call back into this `RuntimeState`.
    pub fn apply_with<F, I>(&self, produce: F) -> Result<Arc<RuntimeStore>, RuntimeError>
    where
        F: FnOnce() -> Result<I, RuntimeError>,
        I: IntoIterator<Item = RuntimeUpdate>,
    {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let updates = produce()?;

        let previous = self.snapshot();
        let mut next = RuntimeStore::clone(&previous);
        for update in updates {
            if let Err(err) = next.merge(update) {
                warn!("runtime update rejected: {}", err);
                return Err(err);
            }
        }

        if next == *previous {
            return Ok(previous);
        }

        let next = Arc::new(next);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next.clone();
        self.publish(&next);
        Ok(next)
    }

    /// Call `callback` with every future snapshot.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(Arc<RuntimeStore>) + Send + 'static,
    {
        self.subscribers()
            .push(Subscriber::Callback(Box::new(callback)));
    }

    /// Receive every future snapshot on a channel.
    ///
    /// The sender is dropped once the receiver hangs up.
    pub fn channel(&self) -> Receiver<Arc<RuntimeStore>> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers().push(Subscriber::Channel(sender));
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }

    fn publish(&self, snapshot: &Arc<RuntimeStore>) {
        self.subscribers().retain(|subscriber| match subscriber {
            Subscriber::Callback(callback) => {
                callback(snapshot.clone());
                true
            }
            Subscriber::Channel(sender) => {
                let alive = sender.send(snapshot.clone()).is_ok();
                if !alive {
                    info!("runtime subscriber disconnected");
                }
                alive
            }
        });
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RuntimeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeState")
            .field("snapshot", &self.snapshot())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
