//! Browser-to-host message relay.
//!
//! This module carries calls from page scripts back into host code.
//! The browser sends a relay request to the control server, the
//! request handler enqueues a [`RelayMessage`], and the host's tick
//! drains the queue and dispatches each message through its
//! [`TargetRegistry`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   GET /bridgeMessage   ┌──────────────┐
//! │  Browser     │───────────────────────►│  RelayQueue  │
//! │  (page JS)   │                        │  (two lanes) │
//! └──────────────┘                        └──────┬───────┘
//!                                                │ drain_all (tick)
//!                                                ▼
//!                                         ┌──────────────┐
//!                                         │TargetRegistry│
//!                                         │  (host code) │
//!                                         └──────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `message` | Relay message and payload types |
//! | `queue` | Thread-safe two-lane FIFO queue |
//! | `targets` | Target trait and dispatch registry |

// ============================================================================
// Submodules
// ============================================================================

/// Relay message and payload types.
pub mod message;

/// Thread-safe two-lane FIFO queue.
pub mod queue;

/// Target trait and dispatch registry.
pub mod targets;

// ============================================================================
// Re-exports
// ============================================================================

pub use message::{RelayMessage, RelayPayload};
pub use queue::RelayQueue;
pub use targets::{RelayTarget, TargetRegistry};
