//! Content handlers: bootstrap page, scripts, static files.
//!
//! Static files come from the configured content root only. Request
//! paths are percent-decoded and then reduced to plain relative
//! components; any parent-directory component rejects the request, so
//! nothing outside the content root is reachable.

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use axum::extract::{Path as ScriptName, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use tracing::{debug, warn};

use super::assets::{self, CLIENT_SCRIPT, CLIENT_SCRIPT_NAME};
use super::router::AppState;

// ============================================================================
// Constants
// ============================================================================

/// Body for every missing-resource response.
const NOT_FOUND_BODY: &str = "Not found";

// ============================================================================
// Handlers
// ============================================================================

/// Serves the bootstrap page with script placeholders injected.
///
/// With a content root the page is `<root>/index.html`; without one
/// the embedded status page is served instead.
pub(crate) async fn bootstrap_handler(State(state): State<AppState>) -> Response {
    let template = match &state.content_root {
        Some(root) => {
            let index = root.join("index.html");
            match tokio::fs::read_to_string(&index).await {
                Ok(template) => Cow::Owned(template),
                Err(error) => {
                    warn!(path = %index.display(), %error, "bootstrap page unreadable");
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "index.html could not be read",
                    )
                        .into_response();
                }
            }
        }
        None => Cow::Borrowed(assets::DEFAULT_PAGE_TEMPLATE),
    };

    Html(assets::render_bootstrap(&template, &state.scripts)).into_response()
}

/// Serves a script by file name: the embedded client, or a registered
/// file.
pub(crate) async fn script_handler(
    ScriptName(name): ScriptName<String>,
    State(state): State<AppState>,
) -> Response {
    if name == CLIENT_SCRIPT_NAME {
        return script_response(CLIENT_SCRIPT.as_bytes().to_vec());
    }

    match state.scripts.get(&name) {
        Some(path) => match tokio::fs::read(path).await {
            Ok(bytes) => script_response(bytes),
            Err(error) => {
                warn!(script = %name, %error, "registered script unreadable");
                not_found()
            }
        },
        None => {
            warn!(script = %name, "script not registered");
            not_found()
        }
    }
}

/// Fallback handler: any other path is a static file under the
/// content root.
pub(crate) async fn static_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(root) = &state.content_root else {
        debug!(path = %uri.path(), "no content root configured");
        return not_found();
    };

    let Ok(decoded) = urlencoding::decode(uri.path()) else {
        warn!(path = %uri.path(), "request path is not valid UTF-8");
        return not_found();
    };

    let Some(relative) = sanitize_request_path(&decoded) else {
        warn!(path = %decoded, "request path rejected");
        return not_found();
    };

    let file = root.join(relative);
    match tokio::fs::read(&file).await {
        Ok(bytes) => {
            let mime = mime_for_path(&file);
            ([(header::CONTENT_TYPE, mime)], bytes).into_response()
        }
        Err(error) => {
            warn!(path = %file.display(), %error, "file not found");
            not_found()
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// 404 with the canonical body.
fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

/// 200 with JavaScript content type.
fn script_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/javascript")], bytes).into_response()
}

/// Reduces a decoded request path to a safe relative path.
///
/// Returns `None` for empty paths and for any path carrying a
/// parent-directory or rooted component.
fn sanitize_request_path(path: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

/// Content type by file extension.
fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Tests
// ============================================================================
