//! Live bridge against Chrome through chromedriver.
//!
//! Demonstrates:
//! - Serving a content root with injected scripts
//! - Opening a real WebDriver session
//! - Host-to-browser calls into page functions
//! - Receiving button clicks from the page via `tick`
//!
//! Requires a chromedriver listening on 127.0.0.1:9515:
//!   chromedriver --port=9515
//!
//! Usage:
//!   cargo run --example 002_chromedriver
//!   cargo run --example 002_chromedriver -- --no-wait
//!   cargo run --example 002_chromedriver -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use anyhow::Context;
use browser_bridge::{Bridge, RelayPayload, TargetRegistry};
use common::Args;
use std::time::Duration;

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    println!("=== 002: Chromedriver ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    println!("[Setup] Starting bridge and opening Chrome...");

    let bridge = Bridge::builder()
        .content_root("demos/web")
        .script("demos/web/app.js")
        .start()
        .await
        .context("could not start bridge (is chromedriver running on 127.0.0.1:9515?)")?;
    println!("        ✓ Serving {}\n", bridge.local_url());

    println!("[Setup] Waiting for the page's ready call...");
    bridge
        .wait_ready(Duration::from_secs(10))
        .await
        .context("page never reported ready")?;
    println!("        ✓ Ready\n");

    // ========================================================================
    // Host to browser
    // ========================================================================

    println!("[1] Call into the page: setStatus(...)");
    bridge
        .execute_void("setStatus('driven by the host')")
        .await;
    println!("    ✓ Sent\n");

    println!("[2] Evaluate in the page: add(19, 23)");
    let sum: f64 = bridge.execute_value("add(19, 23)").await;
    println!("    Result: {sum}");
    assert_eq!(sum, 42.0);
    println!("    ✓ Passed\n");

    // ========================================================================
    // Browser to host
    // ========================================================================

    println!("[3] Click the buttons in the browser window");
    println!("    Draining messages for 30 seconds...");

    let mut targets = TargetRegistry::new();
    targets.register("demo", |method: &str, payload: Option<&RelayPayload>| {
        match payload {
            Some(payload) => println!("    [host] demo.{method}({payload})"),
            None => println!("    [host] demo.{method}()"),
        }
    });

    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
    while tokio::time::Instant::now() < deadline {
        ticker.tick().await;
        bridge.tick(&mut targets);
    }
    println!("    ✓ Done\n");

    // ========================================================================
    // Done
    // ========================================================================

    common::wait_for_exit(args.no_wait).await;

    println!("\n[Cleanup] Stopping bridge...");
    bridge.stop().await;
    println!("          ✓ Done");

    Ok(())
}
