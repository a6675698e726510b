//! Relay queue benchmark suite.
//!
//! Benchmarks the browser-to-host message path at different scales:
//! - Queue sizes: 100, 1_000, 10_000
//! - HTTP round trips per tick: 1, 16
//!
//! Run with: cargo bench --bench relay_queue
//! Results saved to: target/criterion/

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tokio::runtime::Runtime;

use browser_bridge::{
    AutomationSession, Bridge, RelayMessage, RelayPayload, RelayQueue, Result, TargetRegistry,
};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const QUEUE_SIZES: &[usize] = &[100, 1_000, 10_000];
const BATCH_SIZES: &[usize] = &[1, 16];

// ============================================================================
// Benchmark: Enqueue and Drain
// ============================================================================

fn bench_enqueue_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue_drain");

    for &size in QUEUE_SIZES {
        group.bench_with_input(BenchmarkId::new("mixed", size), &size, |b, &size| {
            b.iter(|| {
                let queue = RelayQueue::new();
                for i in 0..size {
                    if i % 2 == 0 {
                        queue.enqueue(RelayMessage::bare("game", format!("m{i}")));
                    } else {
                        queue.enqueue(RelayMessage::with_number(
                            "game",
                            format!("m{i}"),
                            i as f64,
                        ));
                    }
                }
                queue.drain_all()
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Registry Dispatch
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for &size in QUEUE_SIZES {
        group.bench_with_input(BenchmarkId::new("registry", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    (0..size)
                        .map(|i| RelayMessage::with_number("game", format!("m{i}"), i as f64))
                        .collect::<Vec<_>>()
                },
                |messages| {
                    let mut targets = TargetRegistry::new();
                    targets.register("game", |method: &str, payload: Option<&RelayPayload>| {
                        std::hint::black_box((method.len(), payload.is_some()));
                    });
                    for message in messages {
                        let _ = targets.dispatch(message);
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: HTTP Round Trip
// ============================================================================

fn bench_http_round_trip(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let bridge = rt.block_on(async {
        Bridge::builder()
            .port(0)
            .session(Box::new(NullSession))
            .start()
            .await
            .unwrap()
    });
    let base = bridge.local_url();

    let mut group = c.benchmark_group("http_round_trip");
    group.sample_size(10); // Reduce samples for expensive benchmarks
    group.measurement_time(Duration::from_secs(15));

    for &batch in BATCH_SIZES {
        group.bench_with_input(BenchmarkId::new("messages", batch), &batch, |b, &batch| {
            b.to_async(&rt).iter(|| {
                let base = base.clone();
                let bridge = bridge.clone();
                async move {
                    for i in 0..batch {
                        let url =
                            format!("{base}bridgeMessage?target=game&method=m{i}&valueNum=1");
                        reqwest::get(&url).await.unwrap();
                    }
                    let mut targets = TargetRegistry::new();
                    targets.register("game", |_: &str, _: Option<&RelayPayload>| {});
                    bridge.tick(&mut targets)
                }
            });
        });
    }

    group.finish();

    rt.block_on(bridge.stop());
}

// ============================================================================
// Helper Types
// ============================================================================

struct NullSession;

#[async_trait::async_trait]
impl AutomationSession for NullSession {
    async fn evaluate(&self, _script: &str) -> Result<serde_json::Value> {
        Ok(serde_json::Value::Null)
    }

    async fn navigate(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Criterion Setup
// ============================================================================

criterion_group!(
    benches,
    bench_enqueue_drain,
    bench_dispatch,
    bench_http_round_trip
);
criterion_main!(benches);
