//! TCP listener: accepts connections and spawns session handlers.
//!
//! The accept loop runs on its own thread and spawns one detached handler
//! thread per accepted connection, with no connection or backlog limit
//! (deliberate: resource-exhaustion protection is an explicit non-goal).
//! A failed accept or a failed session never affects the loop or other
//! sessions. Bind failure is the one fatal startup error.

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::queue::CommandQueue;
use crate::session;
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};

/// How often the accept loop re-checks the shutdown flag while idle.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Owns the listening socket and its accept-loop thread.
#[derive(Debug)]
pub(crate) struct Listener {
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    accept_thread: Option<JoinHandle<()>>,
}

impl Listener {
    /// Binds the endpoint and starts accepting.
    pub(crate) fn bind(config: &BridgeConfig, queue: Arc<CommandQueue>) -> Result<Self, BridgeError> {
        let socket = TcpListener::bind(config.bind_addr).map_err(|source| BridgeError::Bind {
            addr: config.bind_addr,
            source,
        })?;
        // Non-blocking accept so the loop can observe shutdown.
        socket.set_nonblocking(true)?;
        let local_addr = socket.local_addr()?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let read_ceiling = config.read_ceiling;
        let response_deadline = config.response_deadline;

        let loop_shutdown = Arc::clone(&shutdown);
        let accept_thread = thread::Builder::new()
            .name("opbridge-listener".to_string())
            .spawn(move || {
                accept_loop(socket, queue, loop_shutdown, read_ceiling, response_deadline);
            })?;

        info!(addr = %local_addr, "bridge listening");
        Ok(Self {
            local_addr,
            shutdown,
            accept_thread: Some(accept_thread),
        })
    }

    pub(crate) fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting and joins the accept loop. In-flight sessions run
    /// to completion on their own threads.
    pub(crate) fn stop(mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.accept_thread.take() {
            if handle.join().is_err() {
                warn!("listener accept thread panicked");
            }
        }
        info!(addr = %self.local_addr, "bridge listener stopped");
    }
}

fn accept_loop(
    socket: TcpListener,
    queue: Arc<CommandQueue>,
    shutdown: Arc<AtomicBool>,
    read_ceiling: usize,
    response_deadline: Duration,
) {
    while !shutdown.load(Ordering::Acquire) {
        match socket.accept() {
            Ok((stream, peer)) => {
                // The listening socket is non-blocking; accepted sockets
                // must not be, session reads are synchronous.
                if let Err(err) = stream.set_nonblocking(false) {
                    warn!(peer = %peer, error = %err, "failed to configure connection");
                    continue;
                }

                let session_queue = Arc::clone(&queue);
                let spawned = thread::Builder::new()
                    .name("opbridge-session".to_string())
                    .spawn(move || {
                        session::run(stream, &session_queue, read_ceiling, response_deadline);
                    });
                if let Err(err) = spawned {
                    warn!(peer = %peer, error = %err, "failed to spawn session thread");
                }
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(err) => {
                warn!(error = %err, "accept failed");
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
        }
    }
}
