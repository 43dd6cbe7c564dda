//! One-shot client: send a command to a running bridge.

use crate::error::CliError;
use opbridge::command::{Response, Status};
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

/// Connects, sends one request, prints the response.
///
/// Exits non-zero (via [`CliError`]) when the bridge cannot be reached or
/// reports an `ERROR` response, so scripts can chain commands.
pub fn run(addr: SocketAddr, operator: &str, params: &str) -> Result<(), CliError> {
    let params: Value =
        serde_json::from_str(params).map_err(|err| CliError::InvalidParams(err.to_string()))?;
    if !params.is_object() {
        return Err(CliError::InvalidParams(format!(
            "expected an object, got {}",
            params
        )));
    }

    let request = json!({ "operator": operator, "params": params });
    let response = exchange(addr, request.to_string().as_bytes())?;

    match response.status {
        Status::Ok => {
            println!("OK: {}", response.message);
            Ok(())
        }
        Status::Error => Err(CliError::CommandRejected(response.message)),
    }
}

fn exchange(addr: SocketAddr, payload: &[u8]) -> Result<Response, CliError> {
    let connection = |error| CliError::Connection {
        addr: addr.to_string(),
        error,
    };

    let mut stream = TcpStream::connect(addr).map_err(connection)?;
    stream.write_all(payload).map_err(connection)?;
    stream.shutdown(Shutdown::Write).map_err(connection)?;

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).map_err(connection)?;

    serde_json::from_slice(&reply).map_err(|err| CliError::MalformedResponse(err.to_string()))
}
