use network_fee_sdk::{formatter, FeeTracker, StaticPreferences};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Network Fee Snapshot Example");
    println!("============================");

    let tracker = Arc::new(FeeTracker::from_env(Arc::new(StaticPreferences::default()))?);
    let handle = tracker.clone().spawn();
    let mut snapshots = handle.subscribe();

    // Wait for two resolved cycles (the second one is usually minutes away,
    // so Ctrl-C is fine)
    let mut resolved = 0;
    while resolved < 2 {
        let snapshot = snapshots.recv().await?;
        if snapshot.is_loading() {
            println!("\nRefreshing...");
            continue;
        }

        println!("\n{}", snapshot);
        if let Some(sample) = snapshot.sample() {
            for (label, text) in formatter::format_sample(sample, snapshot.unit) {
                println!("  {:<16} {}", label, text);
            }
        }
        resolved += 1;
    }

    println!("\n{:-<50}", "");
    for metrics in tracker.source_metrics().await {
        println!(
            "{:<4} p50={:.0}ms p99={:.0}ms success={:.0}%",
            metrics.kind.label(),
            metrics.latency_p50_ms,
            metrics.latency_p99_ms,
            metrics.success_rate * 100.0
        );
    }

    handle.shutdown().await;
    Ok(())
}
