// CLI module - Flag parsing, configuration resolution and orchestration

mod output;

use crate::config::SupervisorConfig;
use crate::error::Result;
use crate::metrics::{MetricsServer, MetricsStore};
use crate::process::{RepeatLimit, RetryBudget, Supervisor};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Resup - run a command under supervision, with bounded retries and live counters
#[derive(Debug, Parser)]
#[command(name = "resup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Total number of times to run the command (negative for unbounded)
    #[arg(short, long, allow_negative_numbers = true)]
    repeat: Option<i64>,

    /// Additional failing runs to tolerate before giving up
    #[arg(long, value_name = "COUNT")]
    retries_on_failure: Option<u64>,

    /// Host to serve metrics on (metrics stay disabled when omitted)
    #[arg(long, value_name = "HOST")]
    metrics_host: Option<String>,

    /// Port for the metrics endpoint
    #[arg(long, value_name = "PORT")]
    metrics_port: Option<u16>,

    /// Load supervisor settings from a TOML or JSON file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show per-run progress lines
    #[arg(short, long)]
    verbose: bool,

    /// Command to supervise
    #[arg(last = true, required = true, value_name = "COMMAND")]
    command: Vec<String>,
}

impl Cli {
    /// Parse arguments, run the supervisor and return the process exit code
    pub async fn run() -> i32 {
        let cli = Cli::parse();
        match cli.execute().await {
            Ok(code) => code,
            Err(e) => {
                output::print_error(&e.to_string());
                1
            }
        }
    }

    /// Execute one supervised run with the resolved configuration
    async fn execute(self) -> Result<i32> {
        let config = self.resolve_config()?;
        init_logging(config.verbose);

        let store = MetricsStore::new();

        // The metrics server lives on its own task; the shutdown sender
        // stays here so the end of the loop can stop it
        let server = match config.metrics_addr()? {
            Some(addr) => {
                let (shutdown_tx, shutdown_rx) = oneshot::channel();
                let handle =
                    tokio::spawn(MetricsServer::new(addr, store.clone()).serve(shutdown_rx));
                Some((shutdown_tx, handle))
            }
            None => None,
        };

        let mut supervisor = Supervisor::new(
            self.command,
            RepeatLimit::from_flag(config.repeat),
            RetryBudget::new(config.retries_on_failure),
            store.clone(),
        );
        let exit_code = supervisor.run().await;

        // Fired exactly once, after the loop's final retry decision.
        // Joining the task guarantees the listening socket is released
        // before the process exits.
        if let Some((shutdown_tx, handle)) = server {
            let _ = shutdown_tx.send(());
            if let Err(e) = handle.await {
                error!("Metrics server task failed: {}", e);
            }
        }

        output::print_summary(exit_code, &store.snapshot());
        Ok(exit_code)
    }

    /// Merge the config file (if any) with command-line overrides
    fn resolve_config(&self) -> Result<SupervisorConfig> {
        let mut config = match &self.config {
            Some(path) => SupervisorConfig::from_file(path)?,
            None => SupervisorConfig::default(),
        };

        if let Some(repeat) = self.repeat {
            config.repeat = repeat;
        }
        if let Some(retries) = self.retries_on_failure {
            config.retries_on_failure = retries;
        }
        if let Some(host) = &self.metrics_host {
            config.metrics_host = Some(host.clone());
        }
        if let Some(port) = self.metrics_port {
            config.metrics_port = port;
        }
        if self.verbose {
            config.verbose = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Send tracing output to stderr, gated by verbosity unless RUST_LOG is set
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "resup=debug" } else { "resup=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trailing_command() {
        let cli = Cli::try_parse_from(["resup", "--repeat", "3", "--", "echo", "hello"]).unwrap();
        assert_eq!(cli.repeat, Some(3));
        assert_eq!(cli.command, vec!["echo", "hello"]);
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["resup", "--repeat", "3"]).is_err());
    }

    #[test]
    fn test_negative_repeat_parses() {
        let cli = Cli::try_parse_from(["resup", "--repeat", "-1", "--", "true"]).unwrap();
        assert_eq!(cli.repeat, Some(-1));
    }

    #[test]
    fn test_resolved_defaults() {
        let cli = Cli::try_parse_from(["resup", "--", "true"]).unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.repeat, -1);
        assert_eq!(config.retries_on_failure, 0);
        assert!(config.metrics_host.is_none());
        assert_eq!(config.metrics_port, 3535);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "resup",
            "--retries-on-failure",
            "4",
            "--metrics-host",
            "0.0.0.0",
            "--metrics-port",
            "9100",
            "--verbose",
            "--",
            "true",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.retries_on_failure, 4);
        assert_eq!(config.metrics_host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.metrics_port, 9100);
        assert!(config.verbose);
    }
}
