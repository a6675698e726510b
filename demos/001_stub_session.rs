//! Full bridge loop without a browser.
//!
//! Demonstrates:
//! - Starting a bridge against a stub automation session
//! - The readiness handshake, played here by plain HTTP requests
//! - Host-to-browser execution with result conversion
//! - Browser-to-host messages drained by `tick`
//!
//! Usage:
//!   cargo run --example 001_stub_session
//!   cargo run --example 001_stub_session -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use browser_bridge::{
    AutomationSession, Bridge, RelayPayload, Result, TargetRegistry,
};
use common::Args;
use serde_json::{json, Value};
use std::time::Duration;

// ============================================================================
// Stub session
// ============================================================================

/// Pretends to be a browser page: prints every script it is handed and
/// answers a couple of them.
struct EchoSession;

#[async_trait]
impl AutomationSession for EchoSession {
    async fn evaluate(&self, script: &str) -> Result<Value> {
        println!("        [page] evaluate: {script}");
        if script.contains("document.title") {
            return Ok(json!("Bridge Bootstrap"));
        }
        if script.contains("2 + 2") {
            return Ok(json!(4));
        }
        Ok(Value::Null)
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        println!("        [page] navigate: {url}");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        println!("        [page] session closed");
        Ok(())
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    println!("=== 001: Stub Session ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    println!("[Setup] Starting bridge on an ephemeral port...");

    let bridge = Bridge::builder()
        .port(0)
        .session(Box::new(EchoSession))
        .start()
        .await?;
    println!("        ✓ Running at {}\n", bridge.local_url());

    // ========================================================================
    // Readiness handshake
    // ========================================================================

    println!("[1] Page calls in ready (simulated with HTTP)");
    reqwest::get(format!("{}bridgeReady", bridge.local_url()))
        .await
        .map_err(browser_bridge::Error::from)?;
    bridge.wait_ready(Duration::from_secs(1)).await?;
    println!("    ✓ Ready\n");

    // ========================================================================
    // Host to browser
    // ========================================================================

    println!("[2] Execute in the page: return document.title");
    let title: String = bridge.try_execute_value("document.title").await?;
    println!("    Result: {title:?}");
    assert_eq!(title, "Bridge Bootstrap");
    println!("    ✓ Passed\n");

    println!("[3] Execute in the page: return 2 + 2");
    let sum: i64 = bridge.try_execute_value("2 + 2").await?;
    println!("    Result: {sum}");
    assert_eq!(sum, 4);
    println!("    ✓ Passed\n");

    // ========================================================================
    // Browser to host
    // ========================================================================

    println!("[4] Page sends messages (simulated with HTTP)");
    let base = bridge.local_url();
    reqwest::get(format!("{base}bridgeMessage?target=demo&method=clicked"))
        .await
        .map_err(browser_bridge::Error::from)?;
    reqwest::get(format!(
        "{base}bridgeMessage?target=demo&method=rolled&valueNum=0.5"
    ))
    .await
    .map_err(browser_bridge::Error::from)?;
    println!("    Pending: {}", bridge.pending_messages());

    let mut targets = TargetRegistry::new();
    targets.register("demo", |method: &str, payload: Option<&RelayPayload>| {
        match payload {
            Some(payload) => println!("    [host] demo.{method}({payload})"),
            None => println!("    [host] demo.{method}()"),
        }
    });
    let dispatched = bridge.tick(&mut targets);
    assert_eq!(dispatched, 2);
    println!("    ✓ Dispatched {dispatched} messages\n");

    // ========================================================================
    // Done
    // ========================================================================

    println!("[Cleanup] Stopping bridge...");
    bridge.stop().await;
    println!("          ✓ Done");

    Ok(())
}
