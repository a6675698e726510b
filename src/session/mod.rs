//! Host-to-browser remote execution.
//!
//! This module owns the outbound half of the bridge: an automation
//! session abstracts "a browser page we can run script in", and the
//! [`RemoteChannel`] layers readiness gating, diagnostics, timeouts,
//! and result conversion on top of it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  execute_value("return score()")  ┌──────────────────┐
//! │  Host code   │──────────────────────────────────►│  RemoteChannel   │
//! └──────────────┘                                   │  ready gate      │
//!                                                    │  timeout         │
//!                                                    │  conversion      │
//!                                                    └────────┬─────────┘
//!                                                             │ evaluate
//!                                                             ▼
//!                                                    ┌──────────────────┐
//!                                                    │AutomationSession │
//!                                                    │ (WebDriver HTTP) │
//!                                                    └──────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | Checked and contained execution surface |
//! | `value` | Closed remote result conversion set |
//! | `webdriver` | W3C WebDriver session implementation |

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Submodules
// ============================================================================

/// Checked and contained execution surface.
pub mod channel;

/// Closed remote result conversion set.
pub mod value;

/// W3C WebDriver session implementation.
pub mod webdriver;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::RemoteChannel;
pub use value::RemoteValue;
pub use webdriver::{WebDriverSession, DEFAULT_ENDPOINT};

// ============================================================================
// AutomationSession
// ============================================================================

/// A browser page the host can drive.
///
/// The default implementation is [`WebDriverSession`]; tests inject
/// stub sessions through
/// [`BridgeBuilder::session`](crate::bridge::BridgeBuilder::session).
#[async_trait]
pub trait AutomationSession: Send + Sync {
    /// Runs `script` in the page and returns its completion value.
    ///
    /// The script executes as a function body: it must contain a
    /// `return` statement to produce a non-null value.
    async fn evaluate(&self, script: &str) -> Result<Value>;

    /// Navigates the page to `url`.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Ends the session, releasing the page.
    async fn close(&self) -> Result<()>;
}
