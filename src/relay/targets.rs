//! Relay dispatch targets.
//!
//! Hosts register named targets up front; dispatch looks the name up
//! and fails with [`Error::TargetNotFound`] when a message names a
//! target that was never registered. There is no runtime object
//! discovery: the registry is the single source of dispatchable names.
//!
//! # Examples
//!
//! ```
//! use browser_bridge::relay::{RelayMessage, RelayPayload, TargetRegistry};
//!
//! let mut registry = TargetRegistry::new();
//! registry.register("game", |method: &str, _payload: Option<&RelayPayload>| {
//!     println!("game.{method} called");
//! });
//!
//! registry.dispatch(RelayMessage::bare("game", "reset")).unwrap();
//! assert!(registry.dispatch(RelayMessage::bare("ghost", "x")).is_err());
//! ```

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::error::{Error, Result};

use super::message::{RelayMessage, RelayPayload};

// ============================================================================
// RelayTarget
// ============================================================================

/// A host-side receiver of relay messages.
///
/// Implemented automatically for `FnMut(&str, Option<&RelayPayload>)`
/// closures; implement it directly when a target carries its own
/// state.
pub trait RelayTarget {
    /// Receives one relayed call.
    ///
    /// `method` is the method name from the message; `payload` is the
    /// optional scalar argument.
    fn invoke(&mut self, method: &str, payload: Option<&RelayPayload>);
}

impl<F> RelayTarget for F
where
    F: FnMut(&str, Option<&RelayPayload>),
{
    fn invoke(&mut self, method: &str, payload: Option<&RelayPayload>) {
        self(method, payload);
    }
}

// ============================================================================
// TargetRegistry
// ============================================================================

/// Named registry of relay targets.
///
/// Owned by the host and handed to the bridge tick by mutable
/// reference, so targets may freely mutate host state. Registering a
/// name twice replaces the earlier target and logs a warning.
#[derive(Default)]
pub struct TargetRegistry {
    targets: FxHashMap<String, Box<dyn RelayTarget + Send>>,
}

impl TargetRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a target under `name`.
    ///
    /// A later registration under the same name replaces the earlier
    /// one; the replacement is logged.
    pub fn register(&mut self, name: impl Into<String>, target: impl RelayTarget + Send + 'static) {
        let name = name.into();
        if self
            .targets
            .insert(name.clone(), Box::new(target))
            .is_some()
        {
            warn!(target_name = %name, "relay target replaced by re-registration");
        }
    }

    /// Removes a target, returning `true` if it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.targets.remove(name).is_some()
    }

    /// Returns `true` if `name` is registered.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Returns the number of registered targets.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if no targets are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Delivers one message to its named target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TargetNotFound`] if the message names an
    /// unregistered target. The message is dropped in that case.
    pub fn dispatch(&mut self, message: RelayMessage) -> Result<()> {
        match self.targets.get_mut(&message.target) {
            Some(target) => {
                target.invoke(&message.method, message.payload.as_ref());
                Ok(())
            }
            None => Err(Error::target_not_found(message.target)),
        }
    }
}

impl std::fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetRegistry")
            .field("targets", &self.targets.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Test target that records every call it receives.
    struct Recorder {
        calls: Arc<Mutex<Vec<(String, Option<RelayPayload>)>>>,
    }

    impl RelayTarget for Recorder {
        fn invoke(&mut self, method: &str, payload: Option<&RelayPayload>) {
            self.calls
                .lock()
                .unwrap()
                .push((method.to_string(), payload.cloned()));
        }
    }

    #[test]
    fn test_dispatch_to_closure() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = Arc::clone(&calls);

        let mut registry = TargetRegistry::new();
        registry.register("game", move |method: &str, _payload: Option<&RelayPayload>| {
            calls_clone.lock().unwrap().push(method.to_string());
        });

        registry
            .dispatch(RelayMessage::bare("game", "reset"))
            .expect("dispatch");
        registry
            .dispatch(RelayMessage::with_number("game", "setScore", 7.0))
            .expect("dispatch");

        assert_eq!(*calls.lock().unwrap(), ["reset", "setScore"]);
    }

    #[test]
    fn test_dispatch_to_struct_target() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = TargetRegistry::new();
        registry.register(
            "game",
            Recorder {
                calls: Arc::clone(&calls),
            },
        );

        registry
            .dispatch(RelayMessage::with_text("game", "setName", "Ada"))
            .expect("dispatch");

        let recorded = calls.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "setName");
        assert_eq!(
            recorded[0].1,
            Some(RelayPayload::Text("Ada".to_string()))
        );
    }

    #[test]
    fn test_dispatch_unknown_target() {
        let mut registry = TargetRegistry::new();
        let err = registry
            .dispatch(RelayMessage::bare("ghost", "anything"))
            .expect_err("should fail");
        assert!(matches!(err, Error::TargetNotFound { target } if target == "ghost"));
    }

    #[test]
    fn test_reregistration_replaces() {
        let first = Arc::new(Mutex::new(0u32));
        let second = Arc::new(Mutex::new(0u32));

        let mut registry = TargetRegistry::new();
        let first_clone = Arc::clone(&first);
        registry.register("game", move |_: &str, _: Option<&RelayPayload>| {
            *first_clone.lock().unwrap() += 1;
        });
        let second_clone = Arc::clone(&second);
        registry.register("game", move |_: &str, _: Option<&RelayPayload>| {
            *second_clone.lock().unwrap() += 1;
        });

        registry
            .dispatch(RelayMessage::bare("game", "tick"))
            .expect("dispatch");

        assert_eq!(*first.lock().unwrap(), 0);
        assert_eq!(*second.lock().unwrap(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = TargetRegistry::new();
        registry.register("game", |_: &str, _: Option<&RelayPayload>| {});

        assert!(registry.contains("game"));
        assert!(registry.unregister("game"));
        assert!(!registry.unregister("game"));
        assert!(registry.is_empty());

        let err = registry
            .dispatch(RelayMessage::bare("game", "reset"))
            .expect_err("should fail");
        assert!(err.to_string().contains("game"));
    }
}
