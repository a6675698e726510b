//! Browser Bridge - Drive a real browser page from host code.
//!
//! This library connects a long-running host application to a web page
//! in a real browser, with calls flowing in both directions.
//!
//! # Architecture
//!
//! The bridge runs two transports side by side:
//!
//! - **Host to browser**: script execution through a W3C WebDriver
//!   session (chromedriver by default)
//! - **Browser to host**: HTTP callbacks against a local control
//!   server, queued and dispatched on the host's own update loop
//!
//! Key design principles:
//!
//! - One [`Bridge`] owns: control server + automation session + queue
//! - No script reaches the page before its readiness handshake
//! - Browser messages never run on a server thread; [`Bridge::tick`]
//!   dispatches them wherever the host calls it
//! - Bare messages dispatch ahead of payload-carrying ones
//!
//! # Quick Start
//!
//! ```no_run
//! use browser_bridge::{Bridge, RelayPayload, Result, TargetRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Serve ./web, inject app.js, open the page through chromedriver
//!     let bridge = Bridge::builder()
//!         .content_root("web")
//!         .script("web/app.js")
//!         .start()
//!         .await?;
//!     bridge.wait_ready(std::time::Duration::from_secs(10)).await?;
//!
//!     // Host to browser
//!     bridge.execute_void("showMenu('main')").await;
//!     let score: f64 = bridge.execute_value("game.score()").await;
//!     println!("score: {score}");
//!
//!     // Browser to host, drained from the host's update loop
//!     let mut targets = TargetRegistry::new();
//!     targets.register("game", |method: &str, payload: Option<&RelayPayload>| {
//!         println!("game.{method}({payload:?})");
//!     });
//!     bridge.tick(&mut targets);
//!
//!     bridge.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | Lifecycle and top-level API: [`Bridge`], [`BridgeBuilder`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`relay`] | Browser-to-host messages, queue, and dispatch |
//! | [`server`] | Local control server and bootstrap page assets |
//! | [`session`] | Host-to-browser execution over WebDriver |
//!
//! # Features
//!
//! - **Readiness-gated**: execution waits for the page to call in
//! - **Contained mode**: `execute_*` never panics and never surfaces
//!   remote faults into the host loop
//! - **Pluggable sessions**: WebDriver by default, any
//!   [`AutomationSession`] implementation in tests
//! - **Self-serving**: bundled bootstrap page and client script when no
//!   content root is configured

// ============================================================================
// Modules
// ============================================================================

/// Bridge lifecycle and top-level API.
///
/// Use [`Bridge::builder()`] to configure and start a bridge.
pub mod bridge;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Browser-to-host messages, queue, and dispatch.
///
/// This module contains the inbound half of the bridge:
///
/// - [`RelayMessage`] - A `target.method(payload)` call from the page
/// - [`RelayQueue`] - Two-lane FIFO buffer between server and host
/// - [`TargetRegistry`] - Named dispatch table of host handlers
pub mod relay;

/// Local control server and bootstrap page assets.
///
/// Internal routes plus the public [`ScriptRegistry`] for injected
/// script files.
pub mod server;

/// Host-to-browser execution over WebDriver.
///
/// [`AutomationSession`] abstracts the browser; [`RemoteChannel`] adds
/// readiness gating, timeouts, and result conversion.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

// Bridge types
pub use bridge::{Bridge, BridgeBuilder, BridgePhase, DEFAULT_PORT, DEFAULT_SCRIPT_TIMEOUT};

// Error types
pub use error::{Error, Result};

// Relay types
pub use relay::{RelayMessage, RelayPayload, RelayQueue, RelayTarget, TargetRegistry};

// Server types
pub use server::ScriptRegistry;

// Session types
pub use session::{AutomationSession, RemoteChannel, RemoteValue, WebDriverSession, DEFAULT_ENDPOINT};
