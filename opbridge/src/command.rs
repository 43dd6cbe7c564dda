//! Wire types for the command bridge protocol.
//!
//! A caller sends one JSON object per connection:
//!
//! ```text
//! {"operator": "<name>", "params": {...}}
//! ```
//!
//! and receives exactly one JSON object back:
//!
//! ```text
//! {"status": "OK"|"ERROR", "message": "<text>"}
//! ```
//!
//! Requests are read in a single bounded receive with no length framing, so
//! a request larger than the configured read ceiling is truncated and will
//! normally fail to parse. This is a known fragility of the protocol, not
//! something this module works around.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameter mapping passed to host operations: string keys to JSON values.
pub type Params = serde_json::Map<String, Value>;

/// Outcome status carried on every wire response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// The operation ran and reported completion.
    #[serde(rename = "OK")]
    Ok,
    /// Anything else: malformed request, unknown operator, operation
    /// failure, or a caller-side timeout.
    #[serde(rename = "ERROR")]
    Error,
}

/// One response, written once per connection before it is closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    pub message: String,
}

impl Response {
    /// Creates an `OK` response with the given message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            message: message.into(),
        }
    }

    /// Creates an `ERROR` response with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }

    /// Returns true if the response reports success.
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Serializes the response for the wire.
    ///
    /// Serializing this struct cannot realistically fail; if it somehow
    /// does, the caller still gets a well-formed `ERROR` object rather
    /// than a dropped connection.
    pub fn to_wire(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|_| {
            br#"{"status":"ERROR","message":"response serialization failed"}"#.to_vec()
        })
    }
}

/// A parsed command: operator name plus parameter mapping.
///
/// Immutable once parsed. A command with an absent or empty operator name
/// never comes out of [`parse_request`].
#[derive(Debug, Clone)]
pub struct Command {
    pub operator: String,
    pub params: Params,
}

/// Errors produced while parsing a request payload.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("request is empty")]
    Empty,
    #[error("request is not a valid JSON object: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request is missing the 'operator' field")]
    MissingOperator,
}

#[derive(Deserialize)]
struct RequestPayload {
    operator: Option<String>,
    #[serde(default)]
    params: Params,
}

/// Parses one request payload into a [`Command`].
///
/// Leading/trailing whitespace is ignored. `params` defaults to an empty
/// mapping when absent. Unknown fields are ignored.
pub fn parse_request(bytes: &[u8]) -> Result<Command, ParseError> {
    let trimmed = bytes.trim_ascii();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let payload: RequestPayload = serde_json::from_slice(trimmed)?;
    match payload.operator {
        Some(operator) if !operator.is_empty() => Ok(Command {
            operator,
            params: payload.params,
        }),
        _ => Err(ParseError::MissingOperator),
    }
}
