// Output formatting and display for CLI

use crate::metrics::MetricsSnapshot;
use colored::*;

/// Print the end-of-run summary
pub fn print_summary(exit_code: i32, snapshot: &MetricsSnapshot) {
    let counts = format!(
        "{} succeeded, {} failed",
        snapshot.success_total, snapshot.failure_total
    );

    if exit_code == 0 {
        println!(
            "{}",
            format!("✓ Supervision finished: {}", counts).green().bold()
        );
    } else {
        eprintln!(
            "{}",
            format!("✗ Supervision gave up (exit code {}): {}", exit_code, counts)
                .red()
                .bold()
        );
    }
}

/// Print an error message to stderr
pub fn print_error(error: &str) {
    eprintln!("{} {}", "✗ Error:".red().bold(), error);
}
