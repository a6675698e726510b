//! Bridge lifecycle phases.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// BridgePhase
// ============================================================================

/// Lifecycle phase of a bridge.
///
/// The cycle is `Stopped → Starting → Running → Stopping → Stopped`.
/// Startup is atomic from the outside: a [`Bridge`](crate::Bridge)
/// handle only exists once its bridge reached `Running`, so
/// `Starting` shows up in logs but never from
/// [`Bridge::phase`](crate::Bridge::phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgePhase {
    /// Not running; terminal after a stop.
    Stopped,
    /// Startup steps in progress.
    Starting,
    /// Serving, relaying, and executing.
    Running,
    /// Shutdown steps in progress.
    Stopping,
}

impl BridgePhase {
    /// Returns `true` while the bridge accepts work.
    #[inline]
    #[must_use]
    pub fn is_running(self) -> bool {
        self == Self::Running
    }
}

impl fmt::Display for BridgePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Tests
// ============================================================================
