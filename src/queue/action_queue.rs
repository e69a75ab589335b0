//! ActionQueue implementation
//!
//! Crossbeam channel feeding a single named worker thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::{Mutex, RwLock};

use super::{DEFAULT_STOP_ATTEMPTS, DEFAULT_STOP_SLEEP_MS};
use crate::error::{Result, StoreError};

/// A zero-argument, possibly-failing unit of work
type Action = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// Messages consumed by the worker
enum Message {
    Run { description: String, action: Action },
    Shutdown,
}

/// Sequential executor with a single background worker
///
/// ## Concurrency:
/// - `sender`: RwLock so producers enqueue concurrently; `stop` takes it
/// - `pending`: counts enqueued actions that have not finished yet
/// - `abandon`: set when `stop` gives up waiting; the worker then discards
///   whatever is still queued
pub struct ActionQueue {
    /// Worker thread name, also used in log lines
    name: String,

    /// Producer side of the channel (None once stopped)
    sender: RwLock<Option<Sender<Message>>>,

    /// Worker thread handle (None once stopped)
    worker: Mutex<Option<JoinHandle<()>>>,

    /// Actions enqueued but not yet finished
    pending: Arc<AtomicUsize>,

    /// Tells the worker to skip the rest of the backlog
    abandon: Arc<AtomicBool>,

    /// Outcome of the first stop, reported to every later caller
    drained: Mutex<Option<bool>>,
}

impl ActionQueue {
    /// Spawn the worker thread and return a running queue
    pub fn start(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (sender, receiver) = channel::unbounded::<Message>();

        let pending = Arc::new(AtomicUsize::new(0));
        let abandon = Arc::new(AtomicBool::new(false));

        let worker = {
            let name = name.clone();
            let pending = Arc::clone(&pending);
            let abandon = Arc::clone(&abandon);
            thread::Builder::new()
                .name(name.clone())
                .spawn(move || run_worker(&name, receiver, &pending, &abandon))?
        };

        tracing::debug!(queue = %name, "Action queue started");

        Ok(Self {
            name,
            sender: RwLock::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            pending,
            abandon,
            drained: Mutex::new(None),
        })
    }

    /// Append an action to the queue and return immediately
    ///
    /// Completion is not guaranteed by the time this returns. Fails only if
    /// the queue has been stopped.
    pub fn enqueue<F>(&self, description: impl Into<String>, action: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let sender = self.sender.read();
        let sender = sender
            .as_ref()
            .ok_or_else(|| StoreError::QueueClosed(self.name.clone()))?;

        self.pending.fetch_add(1, Ordering::SeqCst);
        let message = Message::Run {
            description: description.into(),
            action: Box::new(action),
        };
        if sender.send(message).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(StoreError::QueueClosed(self.name.clone()));
        }
        Ok(())
    }

    /// Block until every action enqueued before this call has run
    pub fn fence(&self) -> Result<()> {
        let (done_tx, done_rx) = channel::bounded::<()>(1);
        self.enqueue("fence", move || {
            let _ = done_tx.send(());
            Ok(())
        })?;

        // The sender is dropped without sending if the backlog was abandoned
        done_rx
            .recv()
            .map_err(|_| StoreError::QueueClosed(self.name.clone()))
    }

    /// Stop with the default drain budget
    pub fn stop(&self) -> bool {
        self.stop_with(DEFAULT_STOP_ATTEMPTS, DEFAULT_STOP_SLEEP_MS)
    }

    /// Stop accepting actions and wait (bounded) for the backlog to drain
    ///
    /// Polls up to `max_attempts` times, sleeping `sleep_ms` between polls.
    /// Returns `true` if the worker finished everything queued. Otherwise the
    /// rest of the backlog is abandoned and `false` is returned. Later calls
    /// return the first call's outcome.
    pub fn stop_with(&self, max_attempts: u32, sleep_ms: u64) -> bool {
        // Poison pill goes in behind everything already queued
        if let Some(sender) = self.sender.write().take() {
            let _ = sender.send(Message::Shutdown);
        }

        // Concurrent stoppers wait here for the first one's verdict
        let mut drained = self.drained.lock();
        if let Some(drained) = *drained {
            return drained;
        }

        let Some(handle) = self.worker.lock().take() else {
            return true;
        };

        for _ in 0..max_attempts {
            if handle.is_finished() {
                break;
            }
            thread::sleep(Duration::from_millis(sleep_ms));
        }

        let outcome = if handle.is_finished() {
            if handle.join().is_err() {
                tracing::error!(queue = %self.name, "Action queue worker panicked");
            }
            tracing::debug!(queue = %self.name, "Action queue stopped");
            true
        } else {
            self.abandon.store(true, Ordering::SeqCst);
            tracing::warn!(
                queue = %self.name,
                pending = self.pending(),
                attempts = max_attempts,
                sleep_ms,
                "Action queue did not drain in time, abandoning remaining actions"
            );
            false
        };

        *drained = Some(outcome);
        outcome
    }

    /// Number of actions enqueued but not yet finished
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Whether the queue still accepts actions
    pub fn is_running(&self) -> bool {
        self.sender.read().is_some()
    }

    /// The worker thread name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for ActionQueue {
    fn drop(&mut self) {
        if self.is_running() {
            self.stop();
        }
    }
}

// =============================================================================
// Worker
// =============================================================================

fn run_worker(name: &str, receiver: Receiver<Message>, pending: &AtomicUsize, abandon: &AtomicBool) {
    let mut abandoned = 0usize;

    while let Ok(message) = receiver.recv() {
        let (description, action) = match message {
            Message::Run { description, action } => (description, action),
            Message::Shutdown => break,
        };

        if abandon.load(Ordering::SeqCst) {
            abandoned += 1;
            pending.fetch_sub(1, Ordering::SeqCst);
            continue;
        }

        // A panicking action must not take the worker down with it
        match panic::catch_unwind(AssertUnwindSafe(action)) {
            Ok(Ok(())) => {
                tracing::trace!(queue = %name, action = %description, "Action completed");
            }
            Ok(Err(e)) => {
                tracing::error!(queue = %name, action = %description, error = %e, "Action failed");
            }
            Err(payload) => {
                tracing::error!(
                    queue = %name,
                    action = %description,
                    panic = %panic_message(payload.as_ref()),
                    "Action panicked"
                );
            }
        }
        pending.fetch_sub(1, Ordering::SeqCst);
    }

    if abandoned > 0 {
        tracing::warn!(queue = %name, abandoned, "Discarded queued actions after shutdown timeout");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
