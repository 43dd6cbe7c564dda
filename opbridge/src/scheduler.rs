//! Host scheduler seam: how the bridge gets its periodic tick.
//!
//! The bridge does not own the execution thread. It registers one recurring
//! callback with the host's scheduler; the host calls that callback on its
//! execution thread after an initial delay, then again after whatever
//! interval the previous invocation asked for, until the callback asks to
//! stop. The interval is a callback cadence, not a scheduling guarantee.
//!
//! Embedding into a real host means implementing [`HostScheduler`] over the
//! host's timer API. [`ThreadScheduler`] is a standalone implementation on a
//! dedicated thread, used by the demo host and by tests.

use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::error;

/// What a tick callback wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Call the callback again after this interval.
    Reschedule(Duration),
    /// Unregister the callback; it will never be called again.
    Stop,
}

/// A recurring callback run on the host's execution thread.
pub type TickCallback = Box<dyn FnMut() -> TickOutcome + Send + 'static>;

/// Abstraction over the host's periodic callback mechanism.
///
/// Implementations must call a registered callback from exactly one thread,
/// never concurrently with itself, honoring the initial delay and the
/// per-invocation reschedule interval.
pub trait HostScheduler {
    fn register(&self, initial_delay: Duration, tick: TickCallback);
}

/// Scheduler for standalone use: one dedicated thread per registered
/// callback, acting as the "execution thread" of a host-less deployment.
#[derive(Default)]
pub struct ThreadScheduler {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for all registered callbacks to stop.
    ///
    /// Only returns once every callback has returned [`TickOutcome::Stop`],
    /// so stop the bridge before joining.
    pub fn join(self) {
        let handles = self
            .handles
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        for handle in handles {
            if handle.join().is_err() {
                error!("scheduler tick thread panicked");
            }
        }
    }
}

impl HostScheduler for ThreadScheduler {
    fn register(&self, initial_delay: Duration, mut tick: TickCallback) {
        let spawned = thread::Builder::new()
            .name("opbridge-tick".to_string())
            .spawn(move || {
                thread::sleep(initial_delay);
                loop {
                    match tick() {
                        TickOutcome::Reschedule(interval) => thread::sleep(interval),
                        TickOutcome::Stop => break,
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                if let Ok(mut handles) = self.handles.lock() {
                    handles.push(handle);
                }
            }
            Err(err) => error!(error = %err, "failed to spawn scheduler tick thread"),
        }
    }
}
