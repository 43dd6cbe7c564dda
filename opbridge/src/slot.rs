//! Single-use response rendezvous between the pump and a session handler.
//!
//! Each pending request carries a [`ResponseSlot`] that the execution pump
//! fills exactly once, while the owning session handler blocks on the paired
//! [`ResponseWaiter`] with a deadline. Both halves consume themselves on
//! use, so a slot can never be reused or raced.
//!
//! Delivering to a slot whose waiter has already given up (caller timed out
//! and closed the connection) is a silent no-op: the response is dropped,
//! the pump is never blocked or failed by an absent listener.

use crate::command::Response;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Errors observed by the waiting side of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    /// The deadline elapsed before the pump delivered a response.
    #[error("timed out waiting for a response")]
    Timeout,
    /// The slot was dropped without a delivery (bridge shut down while the
    /// request was still queued).
    #[error("the response slot was dropped before delivery")]
    Abandoned,
}

/// Producer half: held by the pending request, filled by the pump.
#[derive(Debug)]
pub struct ResponseSlot {
    tx: Sender<Response>,
}

/// Consumer half: held by the session handler that created the request.
#[derive(Debug)]
pub struct ResponseWaiter {
    rx: Receiver<Response>,
}

/// Creates a connected slot/waiter pair for one request-response cycle.
pub fn response_slot() -> (ResponseSlot, ResponseWaiter) {
    // Capacity 1 so delivery never blocks on a waiter that has not yet
    // reached its recv, and never blocks on a waiter that is already gone.
    let (tx, rx) = bounded(1);
    (ResponseSlot { tx }, ResponseWaiter { rx })
}

impl ResponseSlot {
    /// Delivers the response, consuming the slot.
    ///
    /// Never blocks and never fails: if the waiter has abandoned the slot,
    /// the response is discarded.
    pub fn deliver(self, response: Response) {
        let _ = self.tx.send(response);
    }
}

impl ResponseWaiter {
    /// Blocks until the response arrives or the deadline elapses,
    /// consuming the waiter.
    pub fn wait(self, deadline: Duration) -> Result<Response, WaitError> {
        self.rx.recv_timeout(deadline).map_err(|err| match err {
            RecvTimeoutError::Timeout => WaitError::Timeout,
            RecvTimeoutError::Disconnected => WaitError::Abandoned,
        })
    }
}
