//! Configuration for autocut.
//!
//! Configuration sources (highest priority first):
//! 1. `--config <file>` or the AUTOCUT_CONFIG environment variable
//! 2. Config file in the user config dir (`~/.config/autocut/config.yaml`)
//! 3. Built-in defaults
//!
//! Every field is optional; missing ones take the defaults below.
//!
//! ```yaml
//! policy:
//!   min_index_age_seconds: 7200
//!   min_cut_ratio: 0.55
//!   provenance_marker: epgsearch
//! tools:
//!   markad:
//!     binary: /usr/local/bin/markad
//!     logocachedir: /var/cache/markad
//!   vdr:
//!     timeout_seconds: 1800
//! lock_file: /run/autocut.lock
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    /// Lock file preventing overlapping runs
    #[serde(default)]
    pub lock_file: Option<PathBuf>,
}

/// Thresholds and markers deciding what gets cut
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Minimum age of the `index` file before a recording is touched (default: 7200 = 2 hours)
    #[serde(default = "default_min_index_age")]
    pub min_index_age_seconds: u64,

    /// Minimum cut/original duration ratio to accept a cut (default: 0.55)
    #[serde(default = "default_min_cut_ratio")]
    pub min_cut_ratio: f64,

    /// Minimum lines in `marks` for markad to have found anything (default: 3)
    #[serde(default = "default_min_marks_lines")]
    pub min_marks_lines: usize,

    /// Substring of `info` identifying scheduler-made recordings (default: epgsearch)
    #[serde(default = "default_provenance_marker")]
    pub provenance_marker: String,

    /// Episode name prefix of recordings cut in VDR by hand (default: %)
    #[serde(default = "default_vdr_cut_prefix")]
    pub vdr_cut_prefix: String,

    /// Episode name suffix of recordings VDR has deleted (default: .del)
    #[serde(default = "default_deleted_suffix")]
    pub deleted_suffix: String,
}

fn default_min_index_age() -> u64 {
    7200
} // 2 hours
fn default_min_cut_ratio() -> f64 {
    0.55
}
fn default_min_marks_lines() -> usize {
    3
}
fn default_provenance_marker() -> String {
    "epgsearch".to_string()
}
fn default_vdr_cut_prefix() -> String {
    "%".to_string()
}
fn default_deleted_suffix() -> String {
    ".del".to_string()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_index_age_seconds: default_min_index_age(),
            min_cut_ratio: default_min_cut_ratio(),
            min_marks_lines: default_min_marks_lines(),
            provenance_marker: default_provenance_marker(),
            vdr_cut_prefix: default_vdr_cut_prefix(),
            deleted_suffix: default_deleted_suffix(),
        }
    }
}

/// External tool locations and timeouts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub markad: MarkadConfig,

    #[serde(default)]
    pub ffprobe: ProbeConfig,

    #[serde(default)]
    pub vdr: IndexerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkadConfig {
    #[serde(default = "default_markad_binary")]
    pub binary: String,

    #[serde(default = "default_markad_loglevel")]
    pub loglevel: u8,

    /// Shared logo cache for all recordings
    #[serde(default = "default_logocachedir")]
    pub logocachedir: PathBuf,

    /// Detection on a long HD recording can take hours (default: 21600 = 6 hours)
    #[serde(default = "default_markad_timeout")]
    pub timeout_seconds: u64,
}

fn default_markad_binary() -> String {
    "markad".to_string()
}
fn default_markad_loglevel() -> u8 {
    3
}
fn default_logocachedir() -> PathBuf {
    PathBuf::from("/tmp")
}
fn default_markad_timeout() -> u64 {
    6 * 3600
}

impl Default for MarkadConfig {
    fn default() -> Self {
        Self {
            binary: default_markad_binary(),
            loglevel: default_markad_loglevel(),
            logocachedir: default_logocachedir(),
            timeout_seconds: default_markad_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_binary")]
    pub binary: String,

    #[serde(default = "default_probe_timeout")]
    pub timeout_seconds: u64,
}

fn default_probe_binary() -> String {
    "ffprobe".to_string()
}
fn default_probe_timeout() -> u64 {
    120
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            binary: default_probe_binary(),
            timeout_seconds: default_probe_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    #[serde(default = "default_indexer_binary")]
    pub binary: String,

    #[serde(default = "default_indexer_timeout")]
    pub timeout_seconds: u64,
}

fn default_indexer_binary() -> String {
    "vdr".to_string()
}
fn default_indexer_timeout() -> u64 {
    3600
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            binary: default_indexer_binary(),
            timeout_seconds: default_indexer_timeout(),
        }
    }
}

impl Config {
    /// Load configuration, see the module docs for the lookup order
    ///
    /// An explicitly given file must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(config_file = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file deserializes to unit, not to an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Lock file location: configured, else the runtime dir, else the temp dir
    pub fn lock_path(&self) -> PathBuf {
        self.lock_file.clone().unwrap_or_else(|| {
            dirs::runtime_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("autocut.lock")
        })
    }
}

/// `<config dir>/autocut/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("autocut").join("config.yaml"))
}
