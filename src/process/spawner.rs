use crate::error::{ResupError, Result};
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Launch the supervised command
///
/// The child inherits the supervisor's standard streams, so its output
/// goes wherever the supervisor's does. A spawn failure (executable not
/// found, permission denied, resource exhaustion) is a launch fault:
/// fatal to the supervision loop and distinct from a child that starts
/// but exits non-zero.
///
/// # Arguments
/// * `argv` - Command and arguments; the first element is the executable
///
/// # Returns
/// * `Ok(Child)` - Handle to the running child
/// * `Err(ResupError::LaunchError)` - The child could not be created
pub fn spawn_child(argv: &[String]) -> Result<Child> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| ResupError::LaunchError("empty command".to_string()))?;

    let mut command = Command::new(program);
    command.args(args);

    // Supervision mirrors the child's lifetime; its I/O stays attached
    // to the operator's terminal rather than being captured
    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    command
        .spawn()
        .map_err(|e| ResupError::LaunchError(format!("Failed to launch '{}': {}", program, e)))
}
