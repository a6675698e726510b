//! W3C WebDriver automation session.
//!
//! Talks to an already-running WebDriver-compatible endpoint
//! (chromedriver, geckodriver, a Selenium server) over its HTTP
//! protocol. Launching the driver or the browser binary is the
//! operator's job; the bridge only opens a session against it.
//!
//! # Protocol
//!
//! Only the four commands the bridge needs:
//!
//! | Command | Request |
//! |---------|---------|
//! | New session | `POST /session` |
//! | Execute script | `POST /session/{id}/execute/sync` |
//! | Navigate | `POST /session/{id}/url` |
//! | Delete session | `DELETE /session/{id}` |
//!
//! Responses wrap their result in `{"value": ...}`; error responses
//! carry `{"value": {"error", "message"}}` with a non-2xx status.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};

use super::AutomationSession;

// ============================================================================
// Constants
// ============================================================================

/// Default automation endpoint (chromedriver's default port).
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9515";

/// TCP connect timeout for endpoint requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Wire Types
// ============================================================================

/// W3C response envelope.
#[derive(Debug, Deserialize)]
struct WireValue<T> {
    value: T,
}

// ============================================================================
// WebDriverSession
// ============================================================================

/// An open session against a WebDriver endpoint.
///
/// # Examples
///
/// ```no_run
/// use browser_bridge::session::{AutomationSession, WebDriverSession};
///
/// # async fn example() -> browser_bridge::Result<()> {
/// let session = WebDriverSession::open("http://127.0.0.1:9515").await?;
/// session.navigate("http://localhost:63388/").await?;
/// let title = session.evaluate("return document.title").await?;
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WebDriverSession {
    /// HTTP client for endpoint requests.
    client: Client,
    /// Normalized endpoint base, no trailing slash.
    endpoint: String,
    /// Session ID assigned by the endpoint.
    session_id: String,
}

impl WebDriverSession {
    /// Opens a session with default capabilities.
    ///
    /// The endpoint picks whichever browser it fronts; chromedriver
    /// opens Chrome, geckodriver opens Firefox.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unusable endpoint URL and
    /// [`Error::Http`] / [`Error::RemoteExecution`] when session
    /// creation fails.
    pub async fn open(endpoint: &str) -> Result<Self> {
        Self::open_with_capabilities(endpoint, json!({ "alwaysMatch": {} })).await
    }

    /// Opens a session with explicit W3C capabilities.
    ///
    /// `capabilities` is the object placed under the request's
    /// `"capabilities"` key, so headless flags and browser selection
    /// go through unchanged:
    ///
    /// ```no_run
    /// # async fn example() -> browser_bridge::Result<()> {
    /// let session = browser_bridge::session::WebDriverSession::open_with_capabilities(
    ///     "http://127.0.0.1:9515",
    ///     serde_json::json!({
    ///         "alwaysMatch": {
    ///             "goog:chromeOptions": { "args": ["--headless=new"] }
    ///         }
    ///     }),
    /// )
    /// .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open_with_capabilities(endpoint: &str, capabilities: Value) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint)?;
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;

        let body = json!({ "capabilities": capabilities });
        let value = send(client.post(format!("{endpoint}/session")).json(&body)).await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::remote_execution("session response missing sessionId"))?
            .to_string();

        debug!(%endpoint, %session_id, "webdriver session opened");
        Ok(Self {
            client,
            endpoint,
            session_id,
        })
    }

    /// Returns the endpoint-assigned session ID.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the normalized endpoint base URL.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds a session-scoped command URL.
    fn command_url(&self, path: &str) -> String {
        format!("{}/session/{}{path}", self.endpoint, self.session_id)
    }
}

#[async_trait]
impl AutomationSession for WebDriverSession {
    async fn evaluate(&self, script: &str) -> Result<Value> {
        trace!(script_len = script.len(), "evaluating remote script");
        let body = json!({ "script": script, "args": [] });
        send(self.client.post(self.command_url("/execute/sync")).json(&body)).await
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        debug!(%url, "navigating session");
        let body = json!({ "url": url });
        send(self.client.post(self.command_url("/url")).json(&body)).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        debug!(session_id = %self.session_id, "closing webdriver session");
        send(self.client.delete(self.command_url(""))).await?;
        Ok(())
    }
}

// ============================================================================
// Request Helpers
// ============================================================================

/// Sends a request and unpacks the W3C `value` envelope.
async fn send(request: reqwest::RequestBuilder) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        let wire: WireValue<Value> = response.json().await?;
        Ok(wire.value)
    } else {
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Err(Error::remote_execution(describe_wire_error(
            status.as_u16(),
            &body,
        )))
    }
}

/// Renders a W3C error payload into a single diagnostic line.
fn describe_wire_error(status: u16, body: &Value) -> String {
    let error = body.pointer("/value/error").and_then(Value::as_str);
    let message = body.pointer("/value/message").and_then(Value::as_str);

    match (error, message) {
        (Some(error), Some(message)) if !message.is_empty() => format!("{error}: {message}"),
        (Some(error), _) => error.to_string(),
        _ => format!("endpoint returned HTTP {status}"),
    }
}

/// Validates and normalizes an endpoint URL to a no-trailing-slash base.
fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let parsed = Url::parse(endpoint)
        .map_err(|e| Error::config(format!("invalid automation endpoint {endpoint:?}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(endpoint.trim_end_matches('/').to_string()),
        other => Err(Error::config(format!(
            "automation endpoint must be http or https, got {other:?}"
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================
