//! Bridge error types.

use std::io;
use std::net::SocketAddr;

/// Errors that can occur while starting or running the bridge.
///
/// Failing to bind the listener is the only fault that is fatal to the
/// bridge; everything after startup is isolated per connection or per
/// command.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The listener could not bind its endpoint. Fatal at startup.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Listener socket setup failed after binding.
    #[error("listener I/O error: {0}")]
    Io(#[from] io::Error),
}
