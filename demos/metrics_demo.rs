use anyhow::Result;
use resup::metrics::{MetricsServer, MetricsStore};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("=== Metrics Endpoint Demo ===\n");

    let store = MetricsStore::new();
    let addr: SocketAddr = "127.0.0.1:3535".parse()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(MetricsServer::new(addr, store.clone()).serve(shutdown_rx));

    println!("Serving counters at http://{}/metrics for 30 seconds", addr);
    println!("Try: curl http://{}/metrics\n", addr);

    // Simulate a supervision loop feeding the counters
    for tick in 0..30u32 {
        if tick % 3 == 0 {
            store.record_failure();
        } else {
            store.record_success();
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    let _ = shutdown_tx.send(());
    handle.await?;

    let snapshot = store.snapshot();
    println!(
        "Done. Final counters: {} succeeded, {} failed",
        snapshot.success_total, snapshot.failure_total
    );

    Ok(())
}
