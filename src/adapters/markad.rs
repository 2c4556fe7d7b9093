//! markad adapter for commercial detection.
//!
//! Runs the standalone `markad` binary in "nice" cut mode: the cut
//! recording is written next to the originals as `<episode>.ts` and the
//! originals are left alone.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::process::run_tool;
use super::{CutDetector, ToolError};
use crate::config::MarkadConfig;

/// markad adapter using subprocess mode
pub struct MarkadAdapter {
    binary_path: String,
    loglevel: u8,
    logocache_dir: PathBuf,
    timeout: Duration,
}

impl Default for MarkadAdapter {
    fn default() -> Self {
        Self::from_config(&MarkadConfig::default())
    }
}

impl MarkadAdapter {
    pub fn from_config(config: &MarkadConfig) -> Self {
        Self {
            binary_path: config.binary.clone(),
            loglevel: config.loglevel,
            logocache_dir: config.logocachedir.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    /// Arguments for one recording, the directory always goes last
    ///
    /// Paths are passed as raw OS strings, VDR trees may hold Latin-1 names.
    fn args(&self, recording: &Path) -> Vec<OsString> {
        let mut logocachedir = OsString::from("--logocachedir=");
        logocachedir.push(&self.logocache_dir);

        vec![
            OsString::from("--log2rec"),
            OsString::from(format!("--loglevel={}", self.loglevel)),
            logocachedir,
            OsString::from("--cut"),
            OsString::from("nice"),
            recording.as_os_str().to_os_string(),
        ]
    }
}

#[async_trait]
impl CutDetector for MarkadAdapter {
    fn name(&self) -> &str {
        "markad"
    }

    async fn detect_cuts(&self, recording: &Path) -> Result<(), ToolError> {
        let mut command = Command::new(&self.binary_path);
        command.args(self.args(recording));
        run_tool(self.name(), command, self.timeout).await?;
        Ok(())
    }
}
