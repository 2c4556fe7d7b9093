//! VDR adapter for rebuilding a recording's index.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::process::run_tool;
use super::{IndexRebuilder, ToolError};
use crate::config::IndexerConfig;

/// Runs `vdr --genindex <dir>`
pub struct VdrIndexAdapter {
    binary_path: String,
    timeout: Duration,
}

impl Default for VdrIndexAdapter {
    fn default() -> Self {
        Self::from_config(&IndexerConfig::default())
    }
}

impl VdrIndexAdapter {
    pub fn from_config(config: &IndexerConfig) -> Self {
        Self {
            binary_path: config.binary.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

#[async_trait]
impl IndexRebuilder for VdrIndexAdapter {
    fn name(&self) -> &str {
        "vdr"
    }

    async fn rebuild_index(&self, recording: &Path) -> Result<(), ToolError> {
        let mut command = Command::new(&self.binary_path);
        command.arg("--genindex").arg(recording);

        let output = run_tool(self.name(), command, self.timeout).await?;
        debug!(
            recording = %recording.display(),
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            "Index rebuilt"
        );
        Ok(())
    }
}
