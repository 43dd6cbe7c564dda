//! End-to-end tests for the command bridge.
//!
//! These tests run a real bridge over loopback TCP and verify the complete
//! request path: listener, session handling, command queue, execution pump
//! and response delivery. They cover:
//! - Success and error classification on the wire
//! - Malformed-request rejection without killing the server
//! - Per-caller response isolation under concurrency
//! - Timeout behavior when the host stops ticking, and recovery after

use opbridge::config::BridgeConfig;
use opbridge::registry::{OperationError, OperationRegistry, Outcome};
use opbridge::scheduler::{HostScheduler, ThreadScheduler, TickCallback};
use opbridge::service::BridgeService;
use serde_json::Value;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// =============================================================================
// Test Helpers
// =============================================================================

fn loopback_config() -> BridgeConfig {
    BridgeConfig::default()
        .with_bind_addr(SocketAddr::from(([127, 0, 0, 1], 0)))
        .with_tick_initial_delay(Duration::ZERO)
        .with_tick_interval(Duration::from_millis(5))
}

fn demo_registry() -> OperationRegistry {
    let mut registry = OperationRegistry::new();
    registry.register("demo.echo", |_| Ok(Outcome::Finished));
    registry.register("demo.unfinished", |_| Ok(Outcome::NotFinished));
    registry.register("demo.fail", |_| {
        Err(OperationError::Failed("the host rejected the request".to_string()))
    });
    registry
}

/// Sends one raw payload and returns the parsed response object.
fn exchange(addr: SocketAddr, payload: &[u8]) -> Value {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.write_all(payload).expect("send request");
    stream.shutdown(Shutdown::Write).expect("shutdown write");

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).expect("read response");
    serde_json::from_slice(&reply).expect("response is valid JSON")
}

/// A scheduler the test drives by hand, standing in for a host whose tick
/// cadence the bridge does not control.
#[derive(Default)]
struct ManualScheduler {
    tick: Mutex<Option<TickCallback>>,
}

impl ManualScheduler {
    fn run_once(&self) {
        if let Some(tick) = self.tick.lock().unwrap().as_mut() {
            tick();
        }
    }
}

impl HostScheduler for ManualScheduler {
    fn register(&self, _initial_delay: Duration, tick: TickCallback) {
        *self.tick.lock().unwrap() = Some(tick);
    }
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[test]
fn test_echo_command_reports_ok() {
    let scheduler = ThreadScheduler::new();
    let mut service =
        BridgeService::start(loopback_config(), demo_registry(), &scheduler).expect("start");

    let response = exchange(
        service.local_addr(),
        br#"{"operator":"demo.echo","params":{"x":1}}"#,
    );

    assert_eq!(response["status"], "OK");
    assert!(response["message"].as_str().unwrap().contains("demo.echo"));

    service.stop();
    scheduler.join();
}

#[test]
fn test_missing_operator_reports_error() {
    let scheduler = ThreadScheduler::new();
    let mut service =
        BridgeService::start(loopback_config(), demo_registry(), &scheduler).expect("start");

    let response = exchange(service.local_addr(), br#"{"params":{}}"#);

    assert_eq!(response["status"], "ERROR");
    assert!(response["message"].as_str().unwrap().contains("operator"));

    service.stop();
    scheduler.join();
}

#[test]
fn test_non_json_request_does_not_kill_the_server() {
    let scheduler = ThreadScheduler::new();
    let mut service =
        BridgeService::start(loopback_config(), demo_registry(), &scheduler).expect("start");
    let addr = service.local_addr();

    let garbage = exchange(addr, b"\x00\xffdefinitely not json\x01");
    assert_eq!(garbage["status"], "ERROR");

    // The server keeps serving later connections without a restart.
    let followup = exchange(addr, br#"{"operator":"demo.echo","params":{}}"#);
    assert_eq!(followup["status"], "OK");

    service.stop();
    scheduler.join();
}

#[test]
fn test_unknown_operator_reports_error() {
    let scheduler = ThreadScheduler::new();
    let mut service =
        BridgeService::start(loopback_config(), demo_registry(), &scheduler).expect("start");

    let response = exchange(service.local_addr(), br#"{"operator":"unknown.op","params":{}}"#);

    assert_eq!(response["status"], "ERROR");
    assert!(response["message"].as_str().unwrap().contains("unknown"));

    service.stop();
    scheduler.join();
}

#[test]
fn test_operation_failure_text_reaches_the_caller() {
    let scheduler = ThreadScheduler::new();
    let mut service =
        BridgeService::start(loopback_config(), demo_registry(), &scheduler).expect("start");

    let response = exchange(service.local_addr(), br#"{"operator":"demo.fail","params":{}}"#);

    assert_eq!(response["status"], "ERROR");
    assert_eq!(response["message"], "the host rejected the request");

    service.stop();
    scheduler.join();
}

#[test]
fn test_unfinished_operation_reports_error() {
    let scheduler = ThreadScheduler::new();
    let mut service =
        BridgeService::start(loopback_config(), demo_registry(), &scheduler).expect("start");

    let response = exchange(
        service.local_addr(),
        br#"{"operator":"demo.unfinished","params":{}}"#,
    );

    assert_eq!(response["status"], "ERROR");
    assert!(response["message"].as_str().unwrap().contains("did not finish"));

    service.stop();
    scheduler.join();
}

#[test]
fn test_concurrent_callers_get_their_own_responses() {
    let mut registry = demo_registry();
    for i in 0..8 {
        registry.register(format!("iso.{i}"), |_| Ok(Outcome::Finished));
    }

    let scheduler = ThreadScheduler::new();
    let mut service =
        BridgeService::start(loopback_config(), registry, &scheduler).expect("start");
    let addr = service.local_addr();

    let callers: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let payload = format!(r#"{{"operator":"iso.{i}","params":{{"caller":{i}}}}}"#);
                let response = exchange(addr, payload.as_bytes());

                assert_eq!(response["status"], "OK");
                let message = response["message"].as_str().unwrap();
                // The response must name this caller's operator and no other.
                assert!(message.contains(&format!("iso.{i}")));
                for other in (0..8).filter(|&j| j != i) {
                    assert!(!message.contains(&format!("iso.{other}'")));
                }
            })
        })
        .collect();

    for caller in callers {
        caller.join().expect("caller thread");
    }

    service.stop();
    scheduler.join();
}

#[test]
fn test_stalled_host_times_out_caller_then_bridge_recovers() {
    let scheduler = Arc::new(ManualScheduler::default());
    let config = loopback_config().with_response_deadline(Duration::from_millis(200));
    let mut service =
        BridgeService::start(config, demo_registry(), scheduler.as_ref()).expect("start");
    let addr = service.local_addr();

    // The host never ticks, so the caller's deadline fires.
    let timed_out = exchange(addr, br#"{"operator":"demo.echo","params":{}}"#);
    assert_eq!(timed_out["status"], "ERROR");
    assert!(timed_out["message"].as_str().unwrap().contains("timed out"));

    // The host resumes ticking; a new connection succeeds.
    let ticker_scheduler = Arc::clone(&scheduler);
    let ticker = thread::spawn(move || {
        for _ in 0..200 {
            ticker_scheduler.run_once();
            thread::sleep(Duration::from_millis(5));
        }
    });

    let recovered = exchange(addr, br#"{"operator":"demo.echo","params":{}}"#);
    assert_eq!(recovered["status"], "OK");

    service.stop();
    ticker.join().expect("ticker thread");
}

#[test]
fn test_oversized_request_is_truncated_and_rejected() {
    // Ceiling smaller than the request; the truncated read is not valid
    // JSON, so the caller gets an ERROR (documented protocol fragility).
    let config = loopback_config().with_read_ceiling(16);
    let scheduler = ThreadScheduler::new();
    let mut service = BridgeService::start(config, demo_registry(), &scheduler).expect("start");

    let response = exchange(
        service.local_addr(),
        br#"{"operator":"demo.echo","params":{"padding":"0123456789012345678901234567890123456789"}}"#,
    );

    assert_eq!(response["status"], "ERROR");

    service.stop();
    scheduler.join();
}
