//! opbridge - Synchronous command bridge for single-threaded hosts
//!
//! This library lets remote TCP callers issue imperative commands to a host
//! application that only permits state-mutating operations on one designated
//! execution thread, driven by the host's own cooperative scheduler tick.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides the owned facade:
//!
//! ```ignore
//! use opbridge::registry::{OperationRegistry, Outcome};
//! use opbridge::scheduler::ThreadScheduler;
//! use opbridge::service::BridgeService;
//! use opbridge::config::BridgeConfig;
//!
//! let mut registry = OperationRegistry::new();
//! registry.register("demo.echo", |_params| Ok(Outcome::Finished));
//!
//! let scheduler = ThreadScheduler::new();
//! let mut service = BridgeService::start(BridgeConfig::default(), registry, &scheduler)?;
//!
//! // ... callers connect over TCP, one request/response per connection ...
//!
//! service.stop();
//! ```
//!
//! Embedding into a real host means implementing [`scheduler::HostScheduler`]
//! over the host's timer API so the pump only ever runs on the host's
//! execution thread.

pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod queue;
pub mod registry;
pub mod scheduler;
pub mod service;
pub mod slot;

pub(crate) mod listener;
pub(crate) mod pump;
pub(crate) mod session;

/// Version of the opbridge library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
