//! Standalone demo host.
//!
//! Runs the bridge against a toy operation registry, with the pump ticked
//! by a [`ThreadScheduler`] standing in for a real host's execution thread.
//! Useful for trying the protocol end to end:
//!
//! ```text
//! opbridge demo &
//! opbridge send demo.echo --params '{"x":1}'
//! ```

use crate::error::CliError;
use opbridge::command::Params;
use opbridge::config::BridgeConfig;
use opbridge::logging::init_logging;
use opbridge::registry::{OperationError, OperationRegistry, Outcome};
use opbridge::scheduler::ThreadScheduler;
use opbridge::service::BridgeService;
use std::net::SocketAddr;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Starts a demo bridge on `addr` and serves until the process is killed.
pub fn run(addr: SocketAddr) -> Result<(), CliError> {
    let _guard = init_logging("logs", "opbridge.log")
        .map_err(|err| CliError::LoggingInit(err.to_string()))?;

    let config = BridgeConfig::default().with_bind_addr(addr);
    let scheduler = ThreadScheduler::new();
    let service = BridgeService::start(config, demo_registry(), &scheduler)
        .map_err(CliError::Serve)?;

    info!(addr = %service.local_addr(), "demo host running, Ctrl-C to stop");

    // The demo host has no UI; it serves until the process is terminated.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

fn demo_registry() -> OperationRegistry {
    let mut registry = OperationRegistry::new();

    registry.register("demo.echo", |params: &Params| {
        info!(params = %serde_json::Value::Object(params.clone()), "demo.echo invoked");
        Ok(Outcome::Finished)
    });

    // Holds the execution thread for the requested number of milliseconds,
    // demonstrating how one slow command stalls the host tick.
    registry.register("demo.sleep", |params: &Params| {
        let millis = params
            .get("millis")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                OperationError::InvalidParams("'millis' must be a non-negative integer".to_string())
            })?;
        thread::sleep(Duration::from_millis(millis));
        Ok(Outcome::Finished)
    });

    registry.register("demo.unfinished", |_: &Params| Ok(Outcome::NotFinished));

    registry.register("demo.fail", |params: &Params| {
        let message = params
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("demo failure");
        Err(OperationError::Failed(message.to_string()))
    });

    registry
}
