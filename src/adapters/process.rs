//! Subprocess execution with a hard timeout.

use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::ToolError;

/// Run a prepared command to completion, killing it after `limit`
///
/// stdin is closed and both output streams are captured. A non-zero exit
/// is returned as `ToolError::Failed` carrying the trimmed stderr.
pub async fn run_tool(
    tool: &str,
    mut command: Command,
    limit: Duration,
) -> Result<Output, ToolError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(tool, command = ?command.as_std(), "Running external tool");

    let child = command.spawn().map_err(|source| ToolError::Spawn {
        tool: tool.to_string(),
        source,
    })?;

    // Dropping the wait future on timeout kills the child
    let output = timeout(limit, child.wait_with_output())
        .await
        .map_err(|_| ToolError::Timeout {
            tool: tool.to_string(),
            timeout: limit,
        })?
        .map_err(|source| ToolError::Io {
            tool: tool.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ToolError::Failed {
            tool: tool.to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(output)
}
