//! The bridge itself: lifecycle, ticking, and the execution surface.
//!
//! [`Bridge`] ties the other modules together. Starting one brings up
//! the control server, opens the automation session, and navigates the
//! page to the locally served bootstrap page. From then on the host
//! calls [`Bridge::tick`] from its update loop to dispatch queued
//! browser messages, and the `execute_*` methods to run script in the
//! page. [`Bridge::stop`] tears both halves down again.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::bridge::builder::{BridgeBuilder, SessionSource};
use crate::bridge::phase::BridgePhase;
use crate::error::{Error, Result};
use crate::relay::{RelayMessage, RelayQueue, TargetRegistry};
use crate::server::control::{ControlServer, SHUTDOWN_GRACE};
use crate::server::router::AppState;
use crate::server::ScriptRegistry;
use crate::session::{AutomationSession, RemoteChannel, RemoteValue, WebDriverSession};

// ============================================================================
// Types
// ============================================================================

/// Shared state behind a [`Bridge`] handle.
pub(crate) struct BridgeInner {
    /// Current lifecycle phase.
    phase: Mutex<BridgePhase>,
    /// Browser-to-host messages awaiting a tick.
    queue: Arc<RelayQueue>,
    /// Host-to-browser execution surface.
    channel: RemoteChannel,
    /// The automation session, kept for shutdown.
    session: Arc<dyn AutomationSession>,
    /// The control server, taken on stop.
    server: Mutex<Option<ControlServer>>,
    /// Readiness flag, flipped by the page's handshake.
    ready_rx: watch::Receiver<bool>,
    /// Bound control server port.
    port: u16,
}

/// A running host-to-browser bridge.
///
/// Cheap to clone; all clones share the same bridge. Obtain one
/// through [`Bridge::builder`].
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

// ============================================================================
// Startup
// ============================================================================

/// Runs the startup sequence for a validated builder.
///
/// Order matters: the server must be reachable before the page loads,
/// and the page load is what triggers the readiness handshake. Any
/// failure tears down the parts already started before returning.
pub(crate) async fn start(builder: BridgeBuilder) -> Result<Bridge> {
    info!(
        port = builder.port,
        phase = %BridgePhase::Starting,
        "starting bridge"
    );

    let mut scripts = ScriptRegistry::new();
    for path in &builder.scripts {
        // Registration problems drop the entry, never the whole start.
        if let Err(error) = scripts.register(path) {
            warn!(path = %path.display(), %error, "skipping script registration");
        }
    }

    let (ready_tx, ready_rx) = watch::channel(false);
    let queue = Arc::new(RelayQueue::new());
    let state = AppState {
        queue: Arc::clone(&queue),
        ready_tx: Arc::new(ready_tx),
        scripts: Arc::new(scripts),
        content_root: builder.content_root.map(Arc::new),
    };

    let server = ControlServer::bind(builder.port, state).await?;
    let port = server.port();
    let local_url = local_url_for(port);

    let session: Arc<dyn AutomationSession> = match builder.session_source {
        SessionSource::Endpoint(endpoint) => match WebDriverSession::open(&endpoint).await {
            Ok(session) => Arc::new(session),
            Err(error) => {
                server.stop(SHUTDOWN_GRACE).await;
                return Err(Error::startup(format!(
                    "could not open automation session at {endpoint}: {error}"
                )));
            }
        },
        SessionSource::Provided(session) => Arc::from(session),
    };
    debug!("automation session open");

    if let Err(error) = session.navigate(&local_url).await {
        if let Err(close_error) = session.close().await {
            warn!(error = %close_error, "could not close automation session");
        }
        server.stop(SHUTDOWN_GRACE).await;
        return Err(Error::startup(format!(
            "could not navigate to {local_url}: {error}"
        )));
    }

    let channel = RemoteChannel::new(
        Arc::clone(&session),
        ready_rx.clone(),
        builder.script_timeout,
    );
    let bridge = Bridge {
        inner: Arc::new(BridgeInner {
            phase: Mutex::new(BridgePhase::Running),
            queue,
            channel,
            session,
            server: Mutex::new(Some(server)),
            ready_rx,
            port,
        }),
    };

    info!(port, url = %local_url, phase = %BridgePhase::Running, "bridge running");
    Ok(bridge)
}

fn local_url_for(port: u16) -> String {
    format!("http://127.0.0.1:{port}/")
}

// ============================================================================
// Public API
// ============================================================================

impl Bridge {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> BridgePhase {
        *self.inner.phase.lock()
    }

    /// Returns the bound control server port.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// Returns the URL the page was navigated to.
    #[must_use]
    pub fn local_url(&self) -> String {
        local_url_for(self.inner.port)
    }

    /// Returns `true` once the page has completed the readiness
    /// handshake.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.channel.is_ready()
    }

    /// Waits for the readiness handshake, up to `timeout`.
    ///
    /// Returns [`Error::NotReady`] if the page has not called in by
    /// then.
    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let mut ready = self.inner.ready_rx.clone();
        match tokio::time::timeout(timeout, ready.wait_for(|flag| *flag)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(_)) | Err(_) => Err(Error::NotReady),
        }
    }

    /// Returns a standalone clone of the execution channel.
    ///
    /// The channel stays usable while the bridge runs; it shares the
    /// readiness flag and script timeout with the bridge.
    #[must_use]
    pub fn channel(&self) -> RemoteChannel {
        self.inner.channel.clone()
    }

    /// Runs `command` in the page, discarding the result.
    ///
    /// See [`RemoteChannel::try_execute_void`].
    pub async fn try_execute_void(&self, command: &str) -> Result<()> {
        self.inner.channel.try_execute_void(command).await
    }

    /// Runs `return {command}` in the page and converts the result.
    ///
    /// See [`RemoteChannel::try_execute_value`].
    pub async fn try_execute_value<T: RemoteValue>(&self, command: &str) -> Result<T> {
        self.inner.channel.try_execute_value(command).await
    }

    /// Contained variant of [`Bridge::try_execute_void`]: failures are
    /// logged, never surfaced.
    pub async fn execute_void(&self, command: &str) {
        self.inner.channel.execute_void(command).await;
    }

    /// Contained variant of [`Bridge::try_execute_value`]: failures are
    /// logged and the type's zero value is returned.
    pub async fn execute_value<T: RemoteValue>(&self, command: &str) -> T {
        self.inner.channel.execute_value(command).await
    }

    /// Queues a message as if the browser had sent it.
    ///
    /// It is dispatched by the next [`Bridge::tick`], after any bare
    /// messages already queued.
    pub fn enqueue(&self, message: RelayMessage) {
        self.inner.queue.enqueue(message);
    }

    /// Returns the number of messages awaiting a tick.
    #[must_use]
    pub fn pending_messages(&self) -> usize {
        self.inner.queue.len()
    }

    /// Drains queued browser messages and dispatches them to `targets`.
    ///
    /// Call this from the host's update loop. Messages without a
    /// registered target are logged and discarded; the drain never
    /// aborts early. Returns the number of messages dispatched. Does
    /// nothing unless the bridge is running.
    pub fn tick(&self, targets: &mut TargetRegistry) -> usize {
        if !self.phase().is_running() {
            return 0;
        }
        let mut dispatched = 0;
        for message in self.inner.queue.drain_all() {
            match targets.dispatch(message) {
                Ok(()) => dispatched += 1,
                Err(error) => error!(%error, "relay message dropped"),
            }
        }
        dispatched
    }

    /// Stops the bridge: closes the automation session, then shuts the
    /// control server down.
    ///
    /// Idempotent. A close failure on the session side is logged and
    /// does not keep the server from stopping.
    pub async fn stop(&self) {
        {
            let mut phase = self.inner.phase.lock();
            match *phase {
                BridgePhase::Stopping | BridgePhase::Stopped => {
                    debug!(phase = %*phase, "stop already underway");
                    return;
                }
                _ => *phase = BridgePhase::Stopping,
            }
        }
        info!("stopping bridge");

        if let Err(error) = self.inner.session.close().await {
            warn!(%error, "could not close automation session");
        } else {
            debug!("automation session closed");
        }

        let server = self.inner.server.lock().take();
        if let Some(server) = server {
            server.stop(SHUTDOWN_GRACE).await;
            debug!("control server stopped");
        }

        *self.inner.phase.lock() = BridgePhase::Stopped;
        info!("bridge stopped");
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("phase", &self.phase())
            .field("port", &self.inner.port)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
