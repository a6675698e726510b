//! Error types for the browser bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use browser_bridge::{Result, Error};
//!
//! async fn example(bridge: &Bridge) -> Result<()> {
//!     bridge.execute_void("console.log('hello')").await;
//!     let title: String = bridge.try_execute_value("document.title").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Lifecycle | [`Error::Startup`], [`Error::NotReady`] |
//! | Remote execution | [`Error::RemoteExecution`], [`Error::ScriptTimeout`], [`Error::TypeConversion`] |
//! | Relay | [`Error::BadRequest`], [`Error::TargetNotFound`] |
//! | Scripts | [`Error::DuplicateScript`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Http`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when bridge configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// Bridge startup failed.
    ///
    /// Returned when the control server cannot bind, the automation
    /// session cannot be opened, or initial navigation fails. Startup
    /// unwinds any partially constructed state before returning this.
    #[error("Startup failed: {message}")]
    Startup {
        /// Description of which startup step failed and why.
        message: String,
    },

    /// Browser has not completed the readiness handshake.
    ///
    /// Returned by checked remote execution before the loaded page has
    /// called back on the readiness route.
    #[error("Bridge not ready")]
    NotReady,

    // ========================================================================
    // Remote Execution Errors
    // ========================================================================
    /// Remote script execution failed.
    ///
    /// Returned when the browser reports a script error or the
    /// automation endpoint rejects the command.
    #[error("Remote execution failed: {message}")]
    RemoteExecution {
        /// Error message from the remote side.
        message: String,
    },

    /// Remote script execution timed out.
    ///
    /// Returned when a script does not complete within the configured
    /// per-call timeout.
    #[error("Script timed out after {timeout_ms}ms")]
    ScriptTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Remote result could not be converted to the requested type.
    ///
    /// Returned when a value-returning call yields a result outside the
    /// supported conversion set.
    #[error("Cannot convert remote result to {expected}: got {actual}")]
    TypeConversion {
        /// Name of the requested Rust type.
        expected: &'static str,
        /// Description of the value actually returned.
        actual: String,
    },

    // ========================================================================
    // Relay Errors
    // ========================================================================
    /// Malformed relay request.
    ///
    /// Returned when a relay request is missing a mandatory parameter
    /// or carries an unparsable numeric payload.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Description of what is missing or malformed.
        message: String,
    },

    /// Relay target is not registered.
    ///
    /// Returned by dispatch when a message names an unknown target.
    #[error("Target not found: {target}")]
    TargetNotFound {
        /// The unregistered target name.
        target: String,
    },

    // ========================================================================
    // Script Registration Errors
    // ========================================================================
    /// Script file name already registered.
    ///
    /// Returned when two registered scripts would be served under the
    /// same file name.
    #[error("Duplicate script registration: {name}")]
    DuplicateScript {
        /// The conflicting file name.
        name: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error talking to the automation endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a startup error.
    #[inline]
    pub fn startup(message: impl Into<String>) -> Self {
        Self::Startup {
            message: message.into(),
        }
    }

    /// Creates a remote execution error.
    #[inline]
    pub fn remote_execution(message: impl Into<String>) -> Self {
        Self::RemoteExecution {
            message: message.into(),
        }
    }

    /// Creates a script timeout error.
    #[inline]
    pub fn script_timeout(timeout_ms: u64) -> Self {
        Self::ScriptTimeout { timeout_ms }
    }

    /// Creates a type conversion error.
    #[inline]
    pub fn type_conversion(expected: &'static str, actual: impl Into<String>) -> Self {
        Self::TypeConversion {
            expected,
            actual: actual.into(),
        }
    }

    /// Creates a bad request error.
    #[inline]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a target not found error.
    #[inline]
    pub fn target_not_found(target: impl Into<String>) -> Self {
        Self::TargetNotFound {
            target: target.into(),
        }
    }

    /// Creates a duplicate script error.
    #[inline]
    pub fn duplicate_script(name: impl Into<String>) -> Self {
        Self::DuplicateScript { name: name.into() }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ScriptTimeout { .. })
    }

    /// Returns `true` if the bridge was not ready for remote execution.
    #[inline]
    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady)
    }

    /// Returns `true` if this is a remote-side fault.
    ///
    /// Remote faults are the errors the contained execution surface
    /// absorbs: the host keeps running and receives a fallback value.
    #[inline]
    #[must_use]
    pub fn is_remote_fault(&self) -> bool {
        matches!(
            self,
            Self::RemoteExecution { .. }
                | Self::ScriptTimeout { .. }
                | Self::TypeConversion { .. }
                | Self::Http(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
