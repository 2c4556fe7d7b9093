//! Adapter interfaces for external tools.
//!
//! Every program autocut shells out to sits behind a trait so the pipeline
//! can be driven by fakes in tests:
//! - `CutDetector`: markad
//! - `DurationProbe`: ffprobe
//! - `IndexRebuilder`: vdr --genindex

pub mod ffprobe;
pub mod markad;
pub mod process;
pub mod vdr;

use std::io;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ToolsConfig;

// Re-export the concrete adapters
pub use ffprobe::FfprobeAdapter;
pub use markad::MarkadAdapter;
pub use vdr::VdrIndexAdapter;

/// Errors from running an external tool
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to spawn {tool}: {source}")]
    Spawn { tool: String, source: io::Error },

    #[error("{tool} failed with exit code {exit_code}: {stderr}")]
    Failed {
        tool: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("{tool} timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    #[error("{tool} produced unparseable output: {output:?}")]
    Parse { tool: String, output: String },

    #[error("IO error while running {tool}: {source}")]
    Io { tool: String, source: io::Error },
}

/// Commercial detection, writes `marks` and the cut recording
#[async_trait]
pub trait CutDetector: Send + Sync {
    /// Human-readable tool name
    fn name(&self) -> &str;

    /// Run detection and cutting for one recording directory
    async fn detect_cuts(&self, recording: &Path) -> Result<(), ToolError>;
}

/// Media duration lookup
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Human-readable tool name
    fn name(&self) -> &str;

    /// Duration of a media file in seconds
    async fn probe_duration(&self, media: &Path) -> Result<f64, ToolError>;
}

/// Playback index regeneration
#[async_trait]
pub trait IndexRebuilder: Send + Sync {
    /// Human-readable tool name
    fn name(&self) -> &str;

    /// Rebuild the index of one recording directory
    async fn rebuild_index(&self, recording: &Path) -> Result<(), ToolError>;
}

/// The three tools a run needs
pub struct Toolset {
    pub cutter: Box<dyn CutDetector>,
    pub probe: Box<dyn DurationProbe>,
    pub indexer: Box<dyn IndexRebuilder>,
}

impl Toolset {
    /// Build the real subprocess adapters from configuration
    pub fn from_config(config: &ToolsConfig) -> Self {
        Self {
            cutter: Box::new(MarkadAdapter::from_config(&config.markad)),
            probe: Box::new(FfprobeAdapter::from_config(&config.ffprobe)),
            indexer: Box::new(VdrIndexAdapter::from_config(&config.vdr)),
        }
    }
}

impl Default for Toolset {
    fn default() -> Self {
        Self::from_config(&ToolsConfig::default())
    }
}
