//! External command execution with a timeout.

use crate::error::{HardwareError, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace};

/// Run `program` with `args` and return its trimmed stdout.
///
/// A program that is not installed is [`HardwareError::Unavailable`]; a
/// non-zero exit status is [`HardwareError::CommandFailed`] carrying the
/// command's stderr. The child is killed when the timeout
/// elapses.
pub(crate) async fn run(program: &str, args: &[&str], timeout: Duration) -> Result<String> {
    debug!("Executing: {} {:?}", program, args);

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(timeout, child)
        .await
        .map_err(|_| HardwareError::timeout(timeout.as_millis() as u64))?
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HardwareError::unavailable(program),
            _ => HardwareError::from(e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HardwareError::command_failed(program, stderr.trim()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    trace!("{} output: {}", program, stdout);
    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_echo() {
        let output = run("echo", &["hello"], Duration::from_secs(5)).await.unwrap();
        assert_eq!(output, "hello");
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let result = run(
            "definitely-not-a-real-command-xyz",
            &[],
            Duration::from_secs(5),
        )
        .await;
        assert!(
            matches!(result, Err(HardwareError::Unavailable { device }) if device == "definitely-not-a-real-command-xyz")
        );
    }

    #[tokio::test]
    async fn test_run_non_zero_exit() {
        let result = run("false", &[], Duration::from_secs(5)).await;
        assert!(matches!(result, Err(HardwareError::CommandFailed { .. })));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let result = run("sleep", &["5"], Duration::from_millis(50)).await;
        assert!(matches!(result, Err(HardwareError::Timeout { .. })));
    }
}
