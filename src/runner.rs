use tokio::process::Command;
use tracing::{error, info};

use crate::error::{ClipforgeError, Result};

/// Outcome of launching an external tool. Callers pick their own
/// strictness: transcoder-style call sites treat `Failed`/`ToolMissing` as
/// a recoverable result, download-style call sites raise them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Tool ran and exited with status zero (or dry run)
    Completed,
    /// Tool ran and exited non-zero
    Failed,
    /// Tool binary could not be located
    ToolMissing,
}

impl RunOutcome {
    pub fn succeeded(self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Execute an argument list (`argv[0]` is the binary), or print it without
/// executing when `dry_run` is set. Blocks until the child exits; output
/// streams straight to the terminal, nothing is captured. Unexpected spawn
/// failures other than a missing binary propagate as errors.
pub async fn run(argv: &[String], dry_run: bool) -> Result<RunOutcome> {
    let (binary, args) = argv
        .split_first()
        .ok_or_else(|| ClipforgeError::Media("Cannot run an empty command".to_string()))?;

    if dry_run {
        println!("Dry run: {}", argv.join(" "));
        return Ok(RunOutcome::Completed);
    }

    info!("Running command: {}", argv.join(" "));

    match Command::new(binary).args(args).status().await {
        Ok(status) if status.success() => Ok(RunOutcome::Completed),
        Ok(status) => {
            error!("'{}' failed with {}", binary, status);
            Ok(RunOutcome::Failed)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("'{}' not found. Please ensure it is in your PATH", binary);
            Ok(RunOutcome::ToolMissing)
        }
        Err(e) => Err(e.into()),
    }
}

/// Check that an external tool is available by asking it for its version.
pub async fn check_tool(binary: &str, version_arg: &str) -> Result<()> {
    let output = Command::new(binary)
        .arg(version_arg)
        .output()
        .await
        .map_err(|e| ClipforgeError::Media(format!("'{}' not found: {}", binary, e)))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ClipforgeError::Media(format!(
            "'{}' version check failed",
            binary
        )))
    }
}
