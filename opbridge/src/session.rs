//! Per-connection session handling.
//!
//! One session is one request-response exchange: read a single bounded
//! payload, parse it, enqueue it for the execution thread, block on the
//! response slot with a deadline, write the reply, close. No keep-alive,
//! no pipelining.
//!
//! A request that fails to parse (or lacks an operator) is answered
//! immediately and never touches the command queue. A deadline expiry
//! answers the caller with a timeout error; the queued command may still
//! execute later, with its response discarded by the abandoned slot.
//!
//! Faults here are strictly per-connection: they are logged and the
//! connection is dropped, nothing propagates to the listener or to other
//! sessions.

use crate::command::{self, Response};
use crate::queue::{CommandQueue, PendingRequest};
use crate::slot::{response_slot, WaitError};
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;
use tracing::{debug, warn};

/// Handles one accepted connection to completion.
pub(crate) fn run(
    mut stream: TcpStream,
    queue: &CommandQueue,
    read_ceiling: usize,
    response_deadline: Duration,
) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());

    let mut buf = vec![0u8; read_ceiling];
    let read = match stream.read(&mut buf) {
        Ok(n) => n,
        Err(err) => {
            warn!(peer = %peer, error = %err, "failed to read request");
            return;
        }
    };

    let command = match command::parse_request(&buf[..read]) {
        Ok(command) => command,
        Err(err) => {
            debug!(peer = %peer, error = %err, "rejected malformed request");
            write_response(&mut stream, &peer, &Response::error(err.to_string()));
            return;
        }
    };

    let operator = command.operator.clone();
    let (slot, waiter) = response_slot();
    queue.push(PendingRequest::new(command, slot));
    debug!(peer = %peer, operator = %operator, "command queued");

    let response = match waiter.wait(response_deadline) {
        Ok(response) => response,
        Err(WaitError::Timeout) => {
            warn!(peer = %peer, operator = %operator, "timed out waiting for the execution thread");
            Response::error("Host process timed out.")
        }
        Err(WaitError::Abandoned) => {
            warn!(peer = %peer, operator = %operator, "bridge stopped before the command ran");
            Response::error("Bridge shut down before the command could run.")
        }
    };

    write_response(&mut stream, &peer, &response);
}

fn write_response(stream: &mut TcpStream, peer: &str, response: &Response) {
    if let Err(err) = stream
        .write_all(&response.to_wire())
        .and_then(|()| stream.flush())
    {
        warn!(peer = %peer, error = %err, "failed to write response");
        return;
    }
    let _ = stream.shutdown(Shutdown::Both);
}
