//! Operation registry: named host capabilities the bridge can dispatch to.
//!
//! The host integration layer populates the registry once, before the
//! bridge starts, by registering a callable per operator name. The bridge
//! treats the registry as read-only from then on.
//!
//! Invocation is deliberately not public: entries can only be reached
//! through the execution pump, which itself only runs inside the tick
//! callback registered with the host scheduler. That makes the
//! execution-thread affinity structural rather than a convention.

use crate::command::Params;
use std::collections::HashMap;

/// Completion classification reported by a host operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran to completion.
    Finished,
    /// The operation ran but did not complete (cancelled, deferred, or
    /// otherwise inconclusive on the host side).
    NotFinished,
}

/// Typed failure surface of registry entries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OperationError {
    #[error("unknown operator '{name}'")]
    UnknownOperation { name: String },
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("{0}")]
    Failed(String),
}

/// A registered host capability.
///
/// Runs only on the host's execution thread, synchronously, for however
/// long it takes. The bridge never preempts it.
pub type OperationFn = Box<dyn Fn(&Params) -> Result<Outcome, OperationError> + Send>;

/// Mapping from operator name to host capability.
#[derive(Default)]
pub struct OperationRegistry {
    entries: HashMap<String, OperationFn>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a capability under the given operator name.
    ///
    /// Registering the same name twice replaces the earlier entry.
    pub fn register<F>(&mut self, name: impl Into<String>, operation: F)
    where
        F: Fn(&Params) -> Result<Outcome, OperationError> + Send + 'static,
    {
        self.entries.insert(name.into(), Box::new(operation));
    }

    /// Returns true if an operator with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered operators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invokes the named capability with the given parameters.
    ///
    /// Only reachable from the execution pump; a missing name is a typed
    /// [`OperationError::UnknownOperation`], never a lookup panic.
    pub(crate) fn invoke(&self, name: &str, params: &Params) -> Result<Outcome, OperationError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| OperationError::UnknownOperation {
                name: name.to_string(),
            })?;
        entry(params)
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("OperationRegistry")
            .field("operators", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_registered_operation_is_invoked() {
        let mut registry = OperationRegistry::new();
        registry.register("demo.echo", |params: &Params| {
            assert_eq!(params.get("x"), Some(&Value::from(1)));
            Ok(Outcome::Finished)
        });

        let mut params = Params::new();
        params.insert("x".to_string(), Value::from(1));

        assert_eq!(
            registry.invoke("demo.echo", &params).unwrap(),
            Outcome::Finished
        );
    }

    #[test]
    fn test_unknown_operator_is_typed_error() {
        let registry = OperationRegistry::new();

        let err = registry.invoke("no.such.op", &Params::new()).unwrap_err();

        assert!(matches!(err, OperationError::UnknownOperation { .. }));
        assert!(err.to_string().contains("unknown operator"));
        assert!(err.to_string().contains("no.such.op"));
    }

    #[test]
    fn test_reregistering_replaces_entry() {
        let mut registry = OperationRegistry::new();
        registry.register("op", |_: &Params| Ok(Outcome::NotFinished));
        registry.register("op", |_: &Params| Ok(Outcome::Finished));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.invoke("op", &Params::new()).unwrap(), Outcome::Finished);
    }

    #[test]
    fn test_operation_failure_propagates_message() {
        let mut registry = OperationRegistry::new();
        registry.register("fragile", |_: &Params| {
            Err(OperationError::Failed("context is missing".to_string()))
        });

        let err = registry.invoke("fragile", &Params::new()).unwrap_err();
        assert_eq!(err.to_string(), "context is missing");
    }

    #[test]
    fn test_debug_lists_operator_names() {
        let mut registry = OperationRegistry::new();
        registry.register("b.op", |_: &Params| Ok(Outcome::Finished));
        registry.register("a.op", |_: &Params| Ok(Outcome::Finished));

        let debug = format!("{registry:?}");
        assert!(debug.contains("a.op"));
        assert!(debug.contains("b.op"));
    }
}
