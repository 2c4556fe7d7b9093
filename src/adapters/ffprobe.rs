//! ffprobe adapter for media durations.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::process::run_tool;
use super::{DurationProbe, ToolError};
use crate::config::ProbeConfig;

/// ffprobe adapter using subprocess mode
pub struct FfprobeAdapter {
    binary_path: String,
    timeout: Duration,
}

impl Default for FfprobeAdapter {
    fn default() -> Self {
        Self::from_config(&ProbeConfig::default())
    }
}

impl FfprobeAdapter {
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            binary_path: config.binary.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// Parse the first line of `format=duration` output as seconds
pub fn parse_duration(stdout: &str) -> Option<f64> {
    let first = stdout.lines().next()?.trim();
    let secs: f64 = first.parse().ok()?;
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}

#[async_trait]
impl DurationProbe for FfprobeAdapter {
    fn name(&self) -> &str {
        "ffprobe"
    }

    async fn probe_duration(&self, media: &Path) -> Result<f64, ToolError> {
        let mut command = Command::new(&self.binary_path);
        command
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(media);

        let output = run_tool(self.name(), command, self.timeout).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        parse_duration(&stdout).ok_or_else(|| ToolError::Parse {
            tool: self.name().to_string(),
            output: stdout.trim().to_string(),
        })
    }
}
