//! Execution pump: drains queued commands on the host's tick.
//!
//! The pump is the only code path that reaches registry entries. It is
//! constructed by [`crate::service::BridgeService`] and moved into the tick
//! callback registered with the host scheduler, so nothing outside that
//! callback can ever invoke a host operation.
//!
//! One tick performs one drain pass: it snapshots the queue length, then
//! pops and executes at most that many requests. Requests arriving while a
//! pass runs may or may not make it into the same pass; that timing window
//! is documented nondeterminism, not a defect. Within one pass, execution
//! order is the FIFO enqueue order.
//!
//! A single slow operation stalls the host tick for its full duration. The
//! pump does not preempt and does not budget time per item or per pass;
//! that hazard is inherent to cooperative scheduling and is preserved here
//! rather than masked.

use crate::command::Response;
use crate::queue::{CommandQueue, PendingRequest};
use crate::registry::{OperationRegistry, Outcome};
use std::sync::Arc;
use tracing::{debug, warn};

pub(crate) struct ExecutionPump {
    queue: Arc<CommandQueue>,
    registry: OperationRegistry,
}

impl ExecutionPump {
    pub(crate) fn new(queue: Arc<CommandQueue>, registry: OperationRegistry) -> Self {
        Self { queue, registry }
    }

    /// Runs one drain pass. Returns the number of commands executed.
    ///
    /// Never blocks on an empty queue; a per-command failure never aborts
    /// the rest of the pass.
    pub(crate) fn tick(&mut self) -> usize {
        let pass_size = self.queue.len();
        let mut executed = 0;

        for _ in 0..pass_size {
            let Some(request) = self.queue.try_pop() else {
                break;
            };
            self.execute(request);
            executed += 1;
        }

        if executed > 0 {
            debug!(executed, "drain pass complete");
        }
        executed
    }

    fn execute(&self, request: PendingRequest) {
        let PendingRequest {
            command,
            slot,
            enqueued_at,
        } = request;

        let response = match self.registry.invoke(&command.operator, &command.params) {
            Ok(Outcome::Finished) => {
                Response::ok(format!("Executed '{}' successfully.", command.operator))
            }
            Ok(Outcome::NotFinished) => {
                Response::error(format!("Operator '{}' did not finish.", command.operator))
            }
            Err(err) => {
                warn!(operator = %command.operator, error = %err, "operation failed");
                Response::error(err.to_string())
            }
        };

        debug!(
            operator = %command.operator,
            queued_for = ?enqueued_at.elapsed(),
            ok = response.is_ok(),
            "command executed"
        );

        // No-op if the caller already gave up waiting.
        slot.deliver(response);
    }
}
