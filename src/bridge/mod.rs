//! Bridge lifecycle and top-level API.
//!
//! # Architecture
//!
//! ```text
//!                    Bridge::builder().start()
//!                              │
//!              ┌───────────────┼────────────────┐
//!              ▼               ▼                ▼
//!       ControlServer   AutomationSession   RemoteChannel
//!       (browser→host)  (navigate, close)   (host→browser)
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | Fluent configuration and validation |
//! | `controller` | Startup, ticking, execution, shutdown |
//! | `phase` | Lifecycle phase enum |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent configuration and validation.
pub mod builder;

/// Startup, ticking, execution, shutdown.
pub mod controller;

/// Lifecycle phase enum.
pub mod phase;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{BridgeBuilder, DEFAULT_PORT, DEFAULT_SCRIPT_TIMEOUT};
pub use controller::Bridge;
pub use phase::BridgePhase;
