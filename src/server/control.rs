//! Control server lifecycle.
//!
//! Binds the loopback listener, runs the router in a background task,
//! and stops cooperatively: shutdown is a signal the serve loop
//! observes, never a thread kill. In-flight requests get a short
//! grace period and are abandoned if they outlive it.

// ============================================================================
// Imports
// ============================================================================

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};

use super::router::{AppState, build_router};

// ============================================================================
// Constants
// ============================================================================

/// How long `stop` waits for in-flight requests before abandoning
/// them.
pub(crate) const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

// ============================================================================
// ControlServer
// ============================================================================

/// A running control server bound to loopback.
///
/// Dropping the handle leaves the serve task running; call
/// [`stop`](Self::stop) for an orderly shutdown.
#[derive(Debug)]
pub(crate) struct ControlServer {
    /// Actual bound port (resolves port 0 requests).
    port: u16,
    /// Shutdown signal observed by the serve loop.
    shutdown_tx: watch::Sender<bool>,
    /// The serve task itself.
    task: JoinHandle<()>,
}

impl ControlServer {
    /// Binds `127.0.0.1:port` and starts serving `state`.
    ///
    /// Port `0` picks an ephemeral port; [`port`](Self::port) reports
    /// the real one. Only loopback is bound: the control surface is
    /// for the bridged browser, not the network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Startup`] when the address cannot be bound
    /// (typically a port conflict).
    pub(crate) async fn bind(port: u16, state: AppState) -> Result<Self> {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::startup(format!("cannot bind control server on {addr}: {e}")))?;
        let port = listener
            .local_addr()
            .map_err(|e| Error::startup(format!("cannot resolve bound address: {e}")))?
            .port();

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let router = build_router(state);

        let task = tokio::spawn(async move {
            let shutdown = async move {
                // Only fails if the sender is gone, which also means stop.
                let _ = shutdown_rx.wait_for(|stop| *stop).await;
            };
            if let Err(error) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!(%error, "control server terminated abnormally");
            }
        });

        info!(port, "control server listening");
        Ok(Self {
            port,
            shutdown_tx,
            task,
        })
    }

    /// Returns the bound port.
    #[inline]
    #[must_use]
    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    /// Signals shutdown and waits up to `grace` for the serve task.
    ///
    /// The listener closes as soon as the signal lands; requests still
    /// in flight may finish within the grace period, after which the
    /// task is left to its fate.
    pub(crate) async fn stop(self, grace: Duration) {
        let _ = self.shutdown_tx.send(true);

        match tokio::time::timeout(grace, self.task).await {
            Ok(Ok(())) => debug!("control server stopped"),
            Ok(Err(error)) => warn!(%error, "control server task failed"),
            Err(_) => warn!("control server still draining after grace period, abandoning"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::relay::{RelayPayload, RelayQueue};
    use crate::server::scripts::ScriptRegistry;

    struct TestServer {
        server: ControlServer,
        queue: Arc<RelayQueue>,
        ready_rx: watch::Receiver<bool>,
        _content: Option<TempDir>,
    }

    impl TestServer {
        fn url(&self, path: &str) -> String {
            format!("http://127.0.0.1:{}{path}", self.server.port())
        }
    }

    async fn start_server(content: Option<TempDir>) -> TestServer {
        let (ready_tx, ready_rx) = watch::channel(false);
        let queue = Arc::new(RelayQueue::new());
        let state = AppState {
            queue: Arc::clone(&queue),
            ready_tx: Arc::new(ready_tx),
            scripts: Arc::new(ScriptRegistry::new()),
            content_root: content
                .as_ref()
                .map(|dir| Arc::new(dir.path().to_path_buf())),
        };

        let server = ControlServer::bind(0, state).await.expect("bind");
        TestServer {
            server,
            queue,
            ready_rx,
            _content: content,
        }
    }

    #[tokio::test]
    async fn test_bind_resolves_ephemeral_port() {
        let ts = start_server(None).await;
        assert!(ts.server.port() > 0);
    }

    #[tokio::test]
    async fn test_ready_route_flips_flag_and_stays() {
        let ts = start_server(None).await;
        assert!(!*ts.ready_rx.borrow());

        let resp = reqwest::get(ts.url("/bridgeReady")).await.expect("request");
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.expect("body"), "OK");
        assert!(*ts.ready_rx.borrow());

        // Idempotent, trailing slash included.
        let resp = reqwest::get(ts.url("/bridgeReady/")).await.expect("request");
        assert_eq!(resp.status(), 200);
        assert!(*ts.ready_rx.borrow());
    }

    #[tokio::test]
    async fn test_relay_enqueues_number_message() {
        let ts = start_server(None).await;

        let resp = reqwest::get(ts.url("/bridgeMessage?target=game&method=setScore&valueNum=42"))
            .await
            .expect("request");
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.expect("body"), "OK");

        let drained = ts.queue.drain_all();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].target, "game");
        assert_eq!(drained[0].method, "setScore");
        assert_eq!(
            drained[0].payload.as_ref().and_then(RelayPayload::as_number),
            Some(42.0)
        );
    }

    #[tokio::test]
    async fn test_relay_text_and_bare_messages() {
        let ts = start_server(None).await;

        reqwest::get(ts.url("/bridgeMessage?target=game&method=setName&valueStr=Ada"))
            .await
            .expect("request");
        reqwest::get(ts.url("/bridgeMessage?target=game&method=reset"))
            .await
            .expect("request");

        let drained = ts.queue.drain_all();
        assert_eq!(drained.len(), 2);
        // Bare lane drains first.
        assert_eq!(drained[0].method, "reset");
        assert_eq!(
            drained[1].payload.as_ref().and_then(RelayPayload::as_text),
            Some("Ada")
        );
    }

    #[tokio::test]
    async fn test_relay_missing_parameters_are_400() {
        let ts = start_server(None).await;

        let resp = reqwest::get(ts.url("/bridgeMessage?method=reset"))
            .await
            .expect("request");
        assert_eq!(resp.status(), 400);
        assert_eq!(resp.text().await.expect("body"), "target must be set.");

        let resp = reqwest::get(ts.url("/bridgeMessage?target=game"))
            .await
            .expect("request");
        assert_eq!(resp.status(), 400);
        assert_eq!(resp.text().await.expect("body"), "method must be set.");

        assert!(ts.queue.is_empty());
    }

    #[tokio::test]
    async fn test_relay_unparsable_number_is_400() {
        let ts = start_server(None).await;

        let resp = reqwest::get(ts.url("/bridgeMessage?target=game&method=setScore&valueNum=fast"))
            .await
            .expect("request");
        assert_eq!(resp.status(), 400);
        assert!(ts.queue.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_relays_all_arrive() {
        let ts = start_server(None).await;

        let (a, b, c) = tokio::join!(
            reqwest::get(ts.url("/bridgeMessage?target=game&method=tap&valueNum=1")),
            reqwest::get(ts.url("/bridgeMessage?target=game&method=tap&valueNum=2")),
            reqwest::get(ts.url("/bridgeMessage?target=game&method=tap&valueNum=3")),
        );
        assert_eq!(a.expect("request").status(), 200);
        assert_eq!(b.expect("request").status(), 200);
        assert_eq!(c.expect("request").status(), 200);

        assert_eq!(ts.queue.len(), 3);
    }

    #[tokio::test]
    async fn test_bootstrap_and_client_script_served() {
        let ts = start_server(None).await;

        let resp = reqwest::get(ts.url("/")).await.expect("request");
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        let body = resp.text().await.expect("body");
        assert!(body.contains("/scripts/browser-bridge.js"));

        let resp = reqwest::get(ts.url("/scripts/browser-bridge.js"))
            .await
            .expect("request");
        assert_eq!(resp.status(), 200);
        assert!(resp.text().await.expect("body").contains("bridgeHost"));
    }

    #[tokio::test]
    async fn test_static_file_and_traversal_over_the_wire() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("style.css"), "body{}").expect("write css");
        let ts = start_server(Some(dir)).await;

        let resp = reqwest::get(ts.url("/style.css")).await.expect("request");
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/css");

        // Encoded traversal reaches the handler undecoded by the client
        // and must be rejected.
        let resp = reqwest::get(ts.url("/%2e%2e/%2e%2e/etc/passwd"))
            .await
            .expect("request");
        assert_eq!(resp.status(), 404);

        let resp = reqwest::get(ts.url("/missing.png")).await.expect("request");
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.text().await.expect("body"), "Not found");
    }

    #[tokio::test]
    async fn test_stop_refuses_new_connections() {
        let ts = start_server(None).await;
        let url = ts.url("/bridgeReady");

        reqwest::get(&url).await.expect("server up");
        ts.server.stop(Duration::from_secs(1)).await;

        let result = reqwest::get(&url).await;
        assert!(result.is_err(), "stopped server must refuse connections");
    }
}
