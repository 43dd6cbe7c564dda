//! Thread-safe command queue between session handlers and the pump.
//!
//! The queue is the only state shared across connection threads and the
//! host's execution thread. Any number of session handlers enqueue
//! concurrently; exactly one consumer (the pump) pops. FIFO order of
//! enqueue is preserved. There is no capacity bound, no priority and no
//! deduplication.

use crate::command::Command;
use crate::slot::ResponseSlot;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::time::Instant;

/// A command waiting for the execution thread, paired with the slot its
/// response must be delivered to.
///
/// Created by one session handler, consumed exactly once by the pump.
#[derive(Debug)]
pub struct PendingRequest {
    pub command: Command,
    pub slot: ResponseSlot,
    pub enqueued_at: Instant,
}

impl PendingRequest {
    pub fn new(command: Command, slot: ResponseSlot) -> Self {
        Self {
            command,
            slot,
            enqueued_at: Instant::now(),
        }
    }
}

/// Unbounded multi-producer FIFO of pending requests.
///
/// Shared behind an `Arc`; all operations are non-blocking.
#[derive(Debug)]
pub struct CommandQueue {
    tx: Sender<PendingRequest>,
    rx: Receiver<PendingRequest>,
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Enqueues a pending request. Never blocks.
    pub fn push(&self, request: PendingRequest) {
        // The receiver lives in the same struct, so the channel cannot be
        // disconnected while the queue exists.
        let _ = self.tx.send(request);
    }

    /// Pops the oldest pending request, if any. Never blocks.
    pub fn try_pop(&self) -> Option<PendingRequest> {
        self.rx.try_recv().ok()
    }

    /// Number of requests currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Returns true if no requests are queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
