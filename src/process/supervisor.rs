use crate::error::{ResupError, Result};
use crate::metrics::MetricsStore;
use crate::process::outcome::ChildOutcome;
use crate::process::retry::{RepeatLimit, RetryBudget};
use crate::process::spawner::spawn_child;
use tracing::{debug, error, info, warn};

/// Exit code reported when the child executable cannot be launched
const LAUNCH_FAULT_EXIT_CODE: i32 = 127;

/// Exit code reported for supervisor-internal faults
const INTERNAL_FAULT_EXIT_CODE: i32 = 1;

/// The supervision loop
///
/// Repeatedly launches the configured command, waits for it to
/// terminate, classifies the outcome, updates the shared counters and
/// applies the retry policy to decide whether to relaunch. Owns the
/// overall process lifetime: its return value is the supervisor's exit
/// code.
pub struct Supervisor {
    /// Command and arguments of the supervised child
    command: Vec<String>,
    /// Total launches permitted
    repeat: RepeatLimit,
    /// Failing runs tolerated before giving up
    retry_budget: RetryBudget,
    /// Shared counters, also read by the metrics server
    store: MetricsStore,
}

impl Supervisor {
    /// Create a supervision loop for the given command and policy
    pub fn new(
        command: Vec<String>,
        repeat: RepeatLimit,
        retry_budget: RetryBudget,
        store: MetricsStore,
    ) -> Self {
        Self {
            command,
            repeat,
            retry_budget,
            store,
        }
    }

    /// Run the loop to completion
    ///
    /// Returns the supervisor's exit code: 0 when a bounded repeat count
    /// is exhausted, the child's own failing code (or 1 after abnormal
    /// termination) when the retry budget runs out, 127 when the child
    /// cannot be launched, 1 when its exit status cannot be retrieved.
    pub async fn run(&mut self) -> i32 {
        let mut launches: u64 = 0;

        let code = loop {
            if !self.repeat.consume() {
                debug!("Repeat count exhausted after {} run(s)", launches);
                break 0;
            }

            let outcome = match self.launch_once().await {
                Ok(outcome) => outcome,
                Err(e @ ResupError::LaunchError(_)) => {
                    error!("{}", e);
                    break LAUNCH_FAULT_EXIT_CODE;
                }
                Err(e) => {
                    // Without the exit status the loop cannot safely
                    // decide anything; treat it like a launch fault
                    error!("{}", e);
                    break INTERNAL_FAULT_EXIT_CODE;
                }
            };
            launches += 1;

            if outcome.is_success() {
                self.store.record_success();
                info!("Run #{}: child {}", launches, outcome);
                continue;
            }

            self.store.record_failure();
            warn!("Run #{}: child {}", launches, outcome);

            if !self.retry_budget.try_consume() {
                info!("Retry budget exhausted, giving up");
                break outcome.exit_code();
            }
            info!(
                "Retrying ({} more failure(s) allowed)",
                self.retry_budget.remaining()
            );
        };

        let snapshot = self.store.snapshot();
        info!(
            "Supervision finished: {} run(s), {} succeeded, {} failed, exit code {}",
            launches, snapshot.success_total, snapshot.failure_total, code
        );
        code
    }

    /// Launch the child once and wait for its termination
    async fn launch_once(&self) -> Result<ChildOutcome> {
        let mut child = spawn_child(&self.command)?;
        debug!("Launched child process (pid {:?})", child.id());

        let status = child
            .wait()
            .await
            .map_err(|e| ResupError::WaitError(e.to_string()))?;

        Ok(ChildOutcome::from_status(status))
    }
}
