//! Remote execution channel.
//!
//! Wraps an [`AutomationSession`] with the bridge's calling
//! conventions:
//!
//! - every call is gated on the readiness handshake; nothing touches
//!   the session before the page has reported in,
//! - a best-effort diagnostic (`_bridgeLogHostCall`) is sent ahead of
//!   each command so the page can display host traffic,
//! - value-returning commands are wrapped in `return ...` and the
//!   result converted through the closed [`RemoteValue`] set,
//! - every call is bounded by the configured script timeout.
//!
//! # Checked vs. contained
//!
//! The `try_*` surface reports faults as errors. The bare surface
//! (`execute_void` / `execute_value`) is for hosts with a tick to
//! keep running: faults are logged and a zero value is returned, so a
//! broken page never takes the host loop down with it.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{error, trace};

use crate::error::{Error, Result};

use super::AutomationSession;
use super::value::RemoteValue;

// ============================================================================
// RemoteChannel
// ============================================================================

/// Host-side handle for running script in the bridged page.
///
/// Cheap to clone; clones share the session and observe the same
/// readiness flag.
#[derive(Clone)]
pub struct RemoteChannel {
    /// Session shared with the bridge controller.
    session: Arc<dyn AutomationSession>,
    /// Readiness flag, flipped by the control server's ready route.
    ready: watch::Receiver<bool>,
    /// Upper bound for a single remote call.
    script_timeout: Duration,
}

impl RemoteChannel {
    /// Creates a channel over `session`, gated on `ready`.
    pub(crate) fn new(
        session: Arc<dyn AutomationSession>,
        ready: watch::Receiver<bool>,
        script_timeout: Duration,
    ) -> Self {
        Self {
            session,
            ready,
            script_timeout,
        }
    }

    /// Returns `true` once the page has completed the readiness
    /// handshake.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Returns the per-call script timeout.
    #[inline]
    #[must_use]
    pub fn script_timeout(&self) -> Duration {
        self.script_timeout
    }

    // ========================================================================
    // Checked Surface
    // ========================================================================

    /// Runs `command` in the page, discarding its result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] before the handshake (the session
    /// is not touched), [`Error::ScriptTimeout`] when the call exceeds
    /// the script timeout, and [`Error::RemoteExecution`] /
    /// [`Error::Http`] for remote failures.
    pub async fn try_execute_void(&self, command: &str) -> Result<()> {
        self.require_ready()?;
        self.log_host_call(command).await;
        self.evaluate_with_timeout(command).await?;
        Ok(())
    }

    /// Runs `command` in the page and converts its result to `T`.
    ///
    /// The command is evaluated as `return <command>`, so plain
    /// expressions work: `try_execute_value::<f64>("6 * 7")`.
    ///
    /// # Errors
    ///
    /// Everything [`try_execute_void`](Self::try_execute_void) returns,
    /// plus [`Error::TypeConversion`] when the result is outside `T`'s
    /// conversion rule.
    pub async fn try_execute_value<T: RemoteValue>(&self, command: &str) -> Result<T> {
        self.require_ready()?;
        self.log_host_call(command).await;
        let value = self.evaluate_with_timeout(&format!("return {command}")).await?;
        T::from_remote(value)
    }

    // ========================================================================
    // Contained Surface
    // ========================================================================

    /// Runs `command`, logging any failure instead of returning it.
    pub async fn execute_void(&self, command: &str) {
        if let Err(error) = self.try_execute_void(command).await {
            error!(%command, %error, "remote call failed");
        }
    }

    /// Runs `command` and converts its result to `T`, logging any
    /// failure and returning `T`'s zero value instead.
    pub async fn execute_value<T: RemoteValue>(&self, command: &str) -> T {
        match self.try_execute_value(command).await {
            Ok(value) => value,
            Err(error) => {
                error!(
                    %command,
                    %error,
                    fallback = T::TYPE_NAME,
                    "remote call failed, returning zero value"
                );
                T::zero()
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Fails fast before any remote interaction.
    fn require_ready(&self) -> Result<()> {
        if *self.ready.borrow() {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    /// Mirrors the command into the page's host-call log, best-effort.
    ///
    /// Single quotes are escaped as `&apos;` so the command survives
    /// its own quoting. Delivery failures are invisible to the caller.
    async fn log_host_call(&self, command: &str) {
        let escaped = command.replace('\'', "&apos;");
        let script = format!("_bridgeLogHostCall('{escaped}')");

        match timeout(self.script_timeout, self.session.evaluate(&script)).await {
            Ok(Ok(_)) => {}
            Ok(Err(error)) => trace!(%error, "host call diagnostic not delivered"),
            Err(_) => trace!("host call diagnostic timed out"),
        }
    }

    /// Evaluates a script, bounding it with the script timeout.
    async fn evaluate_with_timeout(&self, script: &str) -> Result<Value> {
        match timeout(self.script_timeout, self.session.evaluate(script)).await {
            Ok(result) => result,
            Err(_) => Err(Error::script_timeout(self.script_timeout.as_millis() as u64)),
        }
    }
}

impl std::fmt::Debug for RemoteChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteChannel")
            .field("ready", &self.is_ready())
            .field("script_timeout", &self.script_timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
