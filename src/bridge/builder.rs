//! Fluent configuration for starting a [`Bridge`].
//!
//! # Examples
//!
//! ```ignore
//! use browser_bridge::Bridge;
//!
//! let bridge = Bridge::builder()
//!     .port(0)
//!     .content_root("web")
//!     .script("web/app.js")
//!     .start()
//!     .await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::bridge::controller::{self, Bridge};
use crate::error::{Error, Result};
use crate::session::{AutomationSession, DEFAULT_ENDPOINT};

// ============================================================================
// Constants
// ============================================================================

/// Default port for the control server.
pub const DEFAULT_PORT: u16 = 63388;

/// Default per-call timeout for remote script execution.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Types
// ============================================================================

/// Where the automation session comes from at startup.
pub(crate) enum SessionSource {
    /// Open a WebDriver session against this endpoint.
    Endpoint(String),
    /// Use a caller-provided session as-is.
    Provided(Box<dyn AutomationSession>),
}

/// Builder for [`Bridge`] instances.
///
/// | Setting          | Default                         |
/// |------------------|---------------------------------|
/// | `port`           | `63388` (`0` picks an ephemeral port) |
/// | `content_root`   | none (embedded bootstrap page)  |
/// | `script`         | none                            |
/// | `webdriver_endpoint` | `http://127.0.0.1:9515`     |
/// | `script_timeout` | 30 seconds                      |
pub struct BridgeBuilder {
    pub(crate) port: u16,
    pub(crate) content_root: Option<PathBuf>,
    pub(crate) scripts: Vec<PathBuf>,
    pub(crate) session_source: SessionSource,
    pub(crate) script_timeout: Duration,
}

// ============================================================================
// Public API
// ============================================================================

impl BridgeBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            port: DEFAULT_PORT,
            content_root: None,
            scripts: Vec::new(),
            session_source: SessionSource::Endpoint(DEFAULT_ENDPOINT.to_owned()),
            script_timeout: DEFAULT_SCRIPT_TIMEOUT,
        }
    }

    /// Sets the control server port. `0` asks the OS for an ephemeral port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Serves static files from this directory and uses its `index.html`
    /// as the bootstrap page.
    #[must_use]
    pub fn content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = Some(root.into());
        self
    }

    /// Registers a script file to inject into the bootstrap page.
    ///
    /// May be called multiple times; injection preserves call order.
    #[must_use]
    pub fn script(mut self, path: impl Into<PathBuf>) -> Self {
        self.scripts.push(path.into());
        self
    }

    /// Opens the automation session against this WebDriver endpoint
    /// instead of the default local chromedriver.
    #[must_use]
    pub fn webdriver_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.session_source = SessionSource::Endpoint(endpoint.into());
        self
    }

    /// Uses a caller-provided automation session instead of opening a
    /// WebDriver session. Handy for tests and custom backends.
    #[must_use]
    pub fn session(mut self, session: Box<dyn AutomationSession>) -> Self {
        self.session_source = SessionSource::Provided(session);
        self
    }

    /// Sets the per-call timeout for remote script execution.
    #[must_use]
    pub fn script_timeout(mut self, timeout: Duration) -> Self {
        self.script_timeout = timeout;
        self
    }

    /// Validates the configuration and starts the bridge.
    ///
    /// Runs the full startup sequence: serve, open the session, navigate
    /// to the local page. Any failure tears down the parts already
    /// started and surfaces as [`Error::Startup`] (configuration
    /// problems surface as [`Error::Config`]). Script registration
    /// problems are logged and the entry skipped; they never abort the
    /// start.
    pub async fn start(self) -> Result<Bridge> {
        self.validate()?;
        controller::start(self).await
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn validate(&self) -> Result<()> {
        self.validate_content_root()?;
        self.validate_script_timeout()?;
        Ok(())
    }

    fn validate_content_root(&self) -> Result<()> {
        if let Some(root) = &self.content_root {
            if !root.is_dir() {
                return Err(Error::config(format!(
                    "content root {} is not a directory; point content_root at \
                     the directory holding your index.html",
                    root.display()
                )));
            }
        }
        Ok(())
    }

    fn validate_script_timeout(&self) -> Result<()> {
        if self.script_timeout.is_zero() {
            return Err(Error::config(
                "script_timeout must be positive; use a large value instead of \
                 zero if you want calls to wait indefinitely",
            ));
        }
        Ok(())
    }
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BridgeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = match &self.session_source {
            SessionSource::Endpoint(endpoint) => endpoint.as_str(),
            SessionSource::Provided(_) => "<provided>",
        };
        f.debug_struct("BridgeBuilder")
            .field("port", &self.port)
            .field("content_root", &self.content_root)
            .field("scripts", &self.scripts)
            .field("session", &session)
            .field("script_timeout", &self.script_timeout)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
