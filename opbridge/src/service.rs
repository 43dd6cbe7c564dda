//! Owned bridge service: listener + queue + pump tick registration.
//!
//! [`BridgeService`] replaces any free-standing server globals with one
//! owned object and an explicit lifecycle: `start` binds the listener and
//! registers the pump's tick callback with the host scheduler; `stop`
//! closes the listener and tells the tick callback to unregister itself on
//! its next invocation. Dropping a running service stops it.
//!
//! The execution pump is moved into the tick callback at start, so host
//! operations are only ever reachable from the thread the host runs that
//! callback on.

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::listener::Listener;
use crate::pump::ExecutionPump;
use crate::queue::CommandQueue;
use crate::registry::OperationRegistry;
use crate::scheduler::{HostScheduler, TickOutcome};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// A running command bridge.
#[derive(Debug)]
pub struct BridgeService {
    listener: Option<Listener>,
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
}

impl BridgeService {
    /// Starts the bridge: binds the listener and registers the pump tick.
    ///
    /// The registry is consumed; it is read-only for the lifetime of the
    /// bridge. Callers connecting before the first tick fires simply wait
    /// in their response deadline like any other caller.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Bind`] if the endpoint cannot be bound;
    /// this is the only fatal startup fault.
    pub fn start(
        config: BridgeConfig,
        registry: OperationRegistry,
        scheduler: &dyn HostScheduler,
    ) -> Result<Self, BridgeError> {
        let queue = Arc::new(CommandQueue::new());
        let listener = Listener::bind(&config, Arc::clone(&queue))?;
        let local_addr = listener.local_addr();

        let shutdown = Arc::new(AtomicBool::new(false));
        let mut pump = ExecutionPump::new(queue, registry);
        let tick_shutdown = Arc::clone(&shutdown);
        let tick_interval = config.tick_interval;

        scheduler.register(
            config.tick_initial_delay,
            Box::new(move || {
                if tick_shutdown.load(Ordering::Acquire) {
                    return TickOutcome::Stop;
                }
                pump.tick();
                TickOutcome::Reschedule(tick_interval)
            }),
        );

        info!(addr = %local_addr, "bridge started");
        Ok(Self {
            listener: Some(listener),
            local_addr,
            shutdown,
        })
    }

    /// Address the listener is bound to. Useful with a port-0 config.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns true until [`stop`](Self::stop) is called.
    pub fn is_running(&self) -> bool {
        self.listener.is_some()
    }

    /// Stops the bridge. Idempotent.
    ///
    /// The listener stops accepting immediately; the tick callback
    /// unregisters itself on its next invocation. Requests still queued at
    /// that point are dropped, and their waiting callers resolve through
    /// their own deadlines.
    pub fn stop(&mut self) {
        if let Some(listener) = self.listener.take() {
            self.shutdown.store(true, Ordering::Release);
            listener.stop();
            info!(addr = %self.local_addr, "bridge stopped");
        }
    }
}

impl Drop for BridgeService {
    fn drop(&mut self) {
        self.stop();
    }
}
