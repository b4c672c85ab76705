use anyhow::Result;
use resup::metrics::MetricsStore;
use resup::process::{RepeatLimit, RetryBudget, Supervisor};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("=== Supervision Loop Demo ===\n");

    let store = MetricsStore::new();

    // A command that always fails; the budget allows two retries, so it
    // runs three times before the loop gives up
    let command = vec![
        "/bin/sh".to_string(),
        "-c".to_string(),
        "echo 'doing some work...'; exit 1".to_string(),
    ];

    let mut supervisor = Supervisor::new(
        command,
        RepeatLimit::Unbounded,
        RetryBudget::new(2),
        store.clone(),
    );

    let code = supervisor.run().await;

    let snapshot = store.snapshot();
    println!("\nExit code: {}", code);
    println!("Successes: {}", snapshot.success_total);
    println!("Failures:  {}", snapshot.failure_total);

    Ok(())
}
