//! Embedded assets and bootstrap page rendering.
//!
//! The bridge ships its browser client embedded in the binary and
//! injects script tags into the bootstrap page at serve time. Pages
//! opt in with two placeholder comments:
//!
//! | Placeholder | Replaced with |
//! |-------------|---------------|
//! | `<!-- BRIDGE_SCRIPTS -->` | one `<script>` tag per served script |
//! | `<!-- BRIDGE_SCRIPT_LIST -->` | one link per served script |
//!
//! The embedded client is always injected first so page scripts can
//! rely on `bridgeHost` existing, followed by registered scripts in
//! registration order.

// ============================================================================
// Imports
// ============================================================================

use super::scripts::ScriptRegistry;

// ============================================================================
// Constants
// ============================================================================

/// File name the embedded client is served under.
pub const CLIENT_SCRIPT_NAME: &str = "browser-bridge.js";

/// The embedded browser client script.
pub const CLIENT_SCRIPT: &str = include_str!("browser-bridge.js");

/// Placeholder replaced with injected `<script>` tags.
pub const SCRIPTS_PLACEHOLDER: &str = "<!-- BRIDGE_SCRIPTS -->";

/// Placeholder replaced with the served-script link list.
pub const SCRIPT_LIST_PLACEHOLDER: &str = "<!-- BRIDGE_SCRIPT_LIST -->";

// ============================================================================
// Public Functions
// ============================================================================

/// Renders a bootstrap page from `template`, replacing both
/// placeholders.
///
/// Templates without placeholders pass through unchanged, so a page
/// that hard-codes its script tags keeps working.
#[must_use]
pub fn render_bootstrap(template: &str, scripts: &ScriptRegistry) -> String {
    template
        .replace(SCRIPTS_PLACEHOLDER, &render_script_tags(scripts))
        .replace(SCRIPT_LIST_PLACEHOLDER, &render_script_list(scripts))
}

// ============================================================================
// Internal Functions
// ============================================================================

/// Serve URL for a script name, percent-encoded.
fn script_url(name: &str) -> String {
    format!("/scripts/{}", urlencoding::encode(name))
}

/// All served script names: the client first, then registrations in
/// order.
fn served_names<'a>(scripts: &'a ScriptRegistry) -> impl Iterator<Item = &'a str> {
    std::iter::once(CLIENT_SCRIPT_NAME).chain(scripts.names())
}

/// Builds the injected `<script>` tags, one per line.
fn render_script_tags(scripts: &ScriptRegistry) -> String {
    served_names(scripts)
        .map(|name| format!("<script src=\"{}\"></script>", script_url(name)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the served-script link list, one per line.
fn render_script_list(scripts: &ScriptRegistry) -> String {
    served_names(scripts)
        .map(|name| {
            format!(
                "<a href=\"{}\" target=\"_blank\" class=\"script_list_entry\">{name}</a>",
                script_url(name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Default Page
// ============================================================================

/// Bootstrap page served when no content root is configured.
///
/// A minimal status panel: readiness light, served scripts, and the
/// two call lists the client's log hooks append to.
pub(crate) const DEFAULT_PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Browser Bridge</title>
    <style>
        body {
            background: #1a1a2e;
            color: #ccc;
            font-family: monospace;
            padding: 40px;
            line-height: 1.6;
        }
        h1 { color: #e94560; margin-bottom: 20px; }
        h2 { color: #4ade80; font-size: 1em; margin: 20px 0 8px 0; }
        hr { border: 0; border-top: 1px dashed #333; margin: 20px 0; }
        #bridge_status_light {
            display: inline-block;
            width: 10px;
            height: 10px;
            border-radius: 50%;
            background: #e94560;
        }
        #bridge_status_light.green { background: #4ade80; }
        .script_list_entry { display: block; color: #fff; }
        .calls_list {
            max-height: 180px;
            overflow-y: auto;
            border: 1px solid #333;
            padding: 6px;
        }
        .calls_list_entry { color: #fff; word-break: break-all; }
    </style>
    <!-- BRIDGE_SCRIPTS -->
</head>
<body>
    <h1>Browser Bridge</h1>
    <div><span id="bridge_status_light"></span> <span id="bridge_status_text">loading</span></div>
    <hr>
    <h2>Scripts</h2>
    <!-- BRIDGE_SCRIPT_LIST -->
    <h2>Host calls</h2>
    <div id="bridge_host_calls_list" class="calls_list"></div>
    <h2>Relay calls</h2>
    <div id="bridge_relay_calls_list" class="calls_list"></div>
</body>
</html>"##;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn registry_with(names: &[&str]) -> (TempDir, ScriptRegistry) {
        let dir = TempDir::new().expect("temp dir");
        let mut registry = ScriptRegistry::new();
        for name in names {
            let path = dir.path().join(name);
            fs::write(&path, "// script\n").expect("write script");
            registry.register(path).expect("register");
        }
        (dir, registry)
    }

    #[test]
    fn test_client_script_embedded() {
        assert!(CLIENT_SCRIPT.contains("bridgeHost"));
        assert!(CLIENT_SCRIPT.contains("bridgeReady"));
        assert!(CLIENT_SCRIPT.contains("_bridgeLogHostCall"));
    }

    #[test]
    fn test_render_injects_client_first() {
        let (_dir, registry) = registry_with(&["game.js"]);
        let html = render_bootstrap("<head><!-- BRIDGE_SCRIPTS --></head>", &registry);

        let client_pos = html
            .find("/scripts/browser-bridge.js")
            .expect("client injected");
        let game_pos = html.find("/scripts/game.js").expect("game injected");
        assert!(client_pos < game_pos);
        assert!(!html.contains(SCRIPTS_PLACEHOLDER));
    }

    #[test]
    fn test_render_preserves_registration_order() {
        let (_dir, registry) = registry_with(&["b.js", "a.js"]);
        let html = render_bootstrap(SCRIPTS_PLACEHOLDER, &registry);

        let b_pos = html.find("b.js").expect("b injected");
        let a_pos = html.find("a.js").expect("a injected");
        assert!(b_pos < a_pos);
    }

    #[test]
    fn test_render_script_list_links() {
        let (_dir, registry) = registry_with(&["game.js"]);
        let html = render_bootstrap(SCRIPT_LIST_PLACEHOLDER, &registry);

        assert!(html.contains(
            "<a href=\"/scripts/game.js\" target=\"_blank\" class=\"script_list_entry\">game.js</a>"
        ));
        assert!(!html.contains(SCRIPT_LIST_PLACEHOLDER));
    }

    #[test]
    fn test_render_encodes_awkward_names() {
        let (_dir, registry) = registry_with(&["my game.js"]);
        let html = render_bootstrap(SCRIPTS_PLACEHOLDER, &registry);
        assert!(html.contains("/scripts/my%20game.js"));
    }

    #[test]
    fn test_template_without_placeholders_unchanged() {
        let (_dir, registry) = registry_with(&["game.js"]);
        let template = "<html><body>static</body></html>";
        assert_eq!(render_bootstrap(template, &registry), template);
    }

    #[test]
    fn test_default_page_carries_placeholders_and_hooks() {
        assert!(DEFAULT_PAGE_TEMPLATE.contains(SCRIPTS_PLACEHOLDER));
        assert!(DEFAULT_PAGE_TEMPLATE.contains(SCRIPT_LIST_PLACEHOLDER));
        assert!(DEFAULT_PAGE_TEMPLATE.contains("bridge_status_light"));
        assert!(DEFAULT_PAGE_TEMPLATE.contains("bridge_host_calls_list"));
        assert!(DEFAULT_PAGE_TEMPLATE.contains("bridge_relay_calls_list"));
    }

    #[test]
    fn test_default_page_renders_complete() {
        let (_dir, registry) = registry_with(&[]);
        let html = render_bootstrap(DEFAULT_PAGE_TEMPLATE, &registry);

        assert!(html.contains("<script src=\"/scripts/browser-bridge.js\"></script>"));
        assert!(!html.contains("<!-- BRIDGE_"));
    }
}
