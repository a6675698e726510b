//! Control endpoint router.
//!
//! Builds the axum router for the five control surfaces:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | bootstrap page with script injection |
//! | `GET /bridgeReady` | readiness handshake |
//! | `GET /bridgeMessage` | relay enqueue |
//! | `GET /scripts/{name}` | registered script delivery |
//! | fallback | static files under the content root |
//!
//! Handlers do one short state touch each (an enqueue or a readiness
//! flip); no lock is held across request handling.

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use serde::Deserialize;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::relay::{RelayMessage, RelayQueue};

use super::scripts::ScriptRegistry;
use super::statics;

// ============================================================================
// AppState
// ============================================================================

/// Shared state handed to every request handler.
#[derive(Clone)]
pub(crate) struct AppState {
    /// Relay queue shared with the bridge.
    pub(crate) queue: Arc<RelayQueue>,
    /// Readiness flag, flipped once by the ready route.
    pub(crate) ready_tx: Arc<watch::Sender<bool>>,
    /// Scripts served under `/scripts/`.
    pub(crate) scripts: Arc<ScriptRegistry>,
    /// Static file root; `None` serves the embedded bootstrap only.
    pub(crate) content_root: Option<Arc<PathBuf>>,
}

// ============================================================================
// Router
// ============================================================================

/// Builds the control router over `state`.
///
/// The ready and relay routes accept an optional trailing slash, the
/// way browsers sometimes normalize bare paths.
pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(statics::bootstrap_handler))
        .route("/bridgeReady", get(ready_handler))
        .route("/bridgeReady/", get(ready_handler))
        .route("/bridgeMessage", get(relay_handler))
        .route("/bridgeMessage/", get(relay_handler))
        .route("/scripts/{name}", get(statics::script_handler))
        .fallback(get(statics::static_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Handlers
// ============================================================================

/// Marks the page ready. Idempotent; always answers `OK`.
async fn ready_handler(State(state): State<AppState>) -> &'static str {
    let was_ready = state.ready_tx.send_replace(true);
    if !was_ready {
        info!("browser is ready");
    }
    "OK"
}

/// Relay request query parameters.
#[derive(Debug, Deserialize)]
pub(crate) struct RelayParams {
    target: Option<String>,
    method: Option<String>,
    #[serde(rename = "valueNum")]
    value_num: Option<String>,
    #[serde(rename = "valueStr")]
    value_str: Option<String>,
}

/// Enqueues one relay message, or rejects the request with a
/// descriptive 400.
async fn relay_handler(
    State(state): State<AppState>,
    Query(params): Query<RelayParams>,
) -> impl IntoResponse {
    match parse_relay(params) {
        Ok(message) => {
            state.queue.enqueue(message);
            (StatusCode::OK, "OK".to_string())
        }
        Err(error) => {
            error!(%error, "relay request rejected");
            (StatusCode::BAD_REQUEST, bad_request_body(&error))
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Validates relay parameters into a message.
///
/// `target` and `method` are mandatory. `valueNum` wins over
/// `valueStr` when both are present; an unparsable `valueNum` is a
/// [`Error::BadRequest`], never a crash or a silent drop.
fn parse_relay(params: RelayParams) -> Result<RelayMessage> {
    let target = params
        .target
        .ok_or_else(|| Error::bad_request("target must be set."))?;
    let method = params
        .method
        .ok_or_else(|| Error::bad_request("method must be set."))?;

    if let Some(raw) = params.value_num {
        let value: f64 = raw.parse().map_err(|_| {
            Error::bad_request(format!("valueNum must be a number, got {raw:?}."))
        })?;
        return Ok(RelayMessage::with_number(target, method, value));
    }

    if let Some(text) = params.value_str {
        return Ok(RelayMessage::with_text(target, method, text));
    }

    Ok(RelayMessage::bare(target, method))
}

/// Response body for a rejected relay request.
fn bad_request_body(error: &Error) -> String {
    match error {
        Error::BadRequest { message } => message.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        target: Option<&str>,
        method: Option<&str>,
        value_num: Option<&str>,
        value_str: Option<&str>,
    ) -> RelayParams {
        RelayParams {
            target: target.map(str::to_string),
            method: method.map(str::to_string),
            value_num: value_num.map(str::to_string),
            value_str: value_str.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_bare_message() {
        let msg = parse_relay(params(Some("game"), Some("reset"), None, None)).expect("parse");
        assert_eq!(msg, RelayMessage::bare("game", "reset"));
    }

    #[test]
    fn test_parse_number_message() {
        let msg = parse_relay(params(Some("game"), Some("setScore"), Some("42"), None))
            .expect("parse");
        assert_eq!(msg, RelayMessage::with_number("game", "setScore", 42.0));
    }

    #[test]
    fn test_parse_text_message() {
        let msg = parse_relay(params(Some("game"), Some("setName"), None, Some("Ada")))
            .expect("parse");
        assert_eq!(msg, RelayMessage::with_text("game", "setName", "Ada"));
    }

    #[test]
    fn test_number_wins_over_text() {
        let msg = parse_relay(params(Some("g"), Some("m"), Some("1.5"), Some("ignored")))
            .expect("parse");
        assert_eq!(msg, RelayMessage::with_number("g", "m", 1.5));
    }

    #[test]
    fn test_missing_target_rejected() {
        let err = parse_relay(params(None, Some("reset"), None, None)).expect_err("reject");
        assert_eq!(bad_request_body(&err), "target must be set.");
    }

    #[test]
    fn test_missing_method_rejected() {
        let err = parse_relay(params(Some("game"), None, None, None)).expect_err("reject");
        assert_eq!(bad_request_body(&err), "method must be set.");
    }

    #[test]
    fn test_unparsable_number_rejected() {
        let err =
            parse_relay(params(Some("game"), Some("setScore"), Some("fast"), None))
                .expect_err("reject");
        assert!(matches!(err, Error::BadRequest { .. }));
        assert_eq!(
            bad_request_body(&err),
            "valueNum must be a number, got \"fast\"."
        );
    }

    #[test]
    fn test_empty_strings_pass_through() {
        // Present-but-empty parameters are valid; dispatch decides what
        // an empty target means.
        let msg = parse_relay(params(Some(""), Some(""), None, Some(""))).expect("parse");
        assert_eq!(msg, RelayMessage::with_text("", "", ""));
    }
}
