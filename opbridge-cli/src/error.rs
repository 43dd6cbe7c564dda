//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use opbridge::error::BridgeError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// The --params argument was not a JSON object
    InvalidParams(String),
    /// Failed to reach or talk to the bridge
    Connection { addr: String, error: std::io::Error },
    /// The bridge sent something that was not a response object
    MalformedResponse(String),
    /// The bridge reported an ERROR response
    CommandRejected(String),
    /// Failed to start the demo bridge
    Serve(BridgeError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Connection { .. } => {
                eprintln!();
                eprintln!("Is the bridge running? Start a demo host with: opbridge demo");
            }
            CliError::Serve(BridgeError::Bind { .. }) => {
                eprintln!();
                eprintln!("Another process may already be listening on that address.");
                eprintln!("Pick a different one with: opbridge demo --addr 127.0.0.1:<port>");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::InvalidParams(msg) => {
                write!(f, "--params must be a JSON object: {}", msg)
            }
            CliError::Connection { addr, error } => {
                write!(f, "Failed to talk to the bridge at {}: {}", addr, error)
            }
            CliError::MalformedResponse(msg) => {
                write!(f, "Bridge sent a malformed response: {}", msg)
            }
            CliError::CommandRejected(msg) => write!(f, "Command failed: {}", msg),
            CliError::Serve(err) => write!(f, "Failed to start the bridge: {}", err),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Connection { error, .. } => Some(error),
            CliError::Serve(err) => Some(err),
            _ => None,
        }
    }
}
