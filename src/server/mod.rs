//! The control server.
//!
//! A loopback HTTP server the bridged browser talks back to. It
//! bootstraps the page, hands out scripts and static files, receives
//! the readiness handshake, and accepts relay messages.
//!
//! # Routes
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | bootstrap page, placeholders injected |
//! | `GET /bridgeReady[/]` | readiness handshake, idempotent |
//! | `GET /bridgeMessage[/]` | relay enqueue (`target`, `method`, `valueNum`/`valueStr`) |
//! | `GET /scripts/{name}` | embedded client or registered script |
//! | anything else | static file under the content root |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `assets` | Embedded client and bootstrap rendering |
//! | `control` | Listener lifecycle and shutdown |
//! | `router` | Route table and relay parsing |
//! | `scripts` | Registered script files |
//! | `statics` | Bootstrap, script, and file handlers |

// ============================================================================
// Submodules
// ============================================================================

/// Embedded client and bootstrap rendering.
pub mod assets;

/// Listener lifecycle and shutdown.
pub(crate) mod control;

/// Route table and relay parsing.
pub(crate) mod router;

/// Registered script files.
pub mod scripts;

/// Bootstrap, script, and file handlers.
pub(crate) mod statics;

// ============================================================================
// Re-exports
// ============================================================================

pub use assets::{CLIENT_SCRIPT, CLIENT_SCRIPT_NAME, SCRIPT_LIST_PLACEHOLDER, SCRIPTS_PLACEHOLDER};
pub use scripts::ScriptRegistry;
