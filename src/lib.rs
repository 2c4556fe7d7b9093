//! autocut - Automatic commercial cutting for VDR recordings
//!
//! Finds finished VDR recordings, runs markad on them, sanity checks the
//! cut against the original running time and replaces the original
//! segments with the cut recording.
//!
//! # Architecture
//!
//! Each recording goes through the same pipeline:
//! - Discovery: `.rec` directories under the given path
//! - Eligibility: done, hand-cut, deleted, foreign and still-recording
//!   recordings are skipped
//! - Cut: markad writes `marks` and `<episode>.ts`
//! - Validate: the cut must keep at least 55% of the original duration
//! - Commit: the cut replaces `00001.ts`, the other segments are removed,
//!   the index is rebuilt and `info.autocut` is written
//!
//! # Modules
//!
//! - `adapters`: External tools (markad, ffprobe, vdr)
//! - `core`: Orchestration logic (Discovery, Eligibility, Commit)
//! - `domain`: Data structures (Recording, Outcome)
//! - `config`: Config file and defaults
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # One recording
//! autocut /video/Wheeler_Dealers/Some_episode/2021-07-26.20.03.6-0.rec
//!
//! # Every recording of a series
//! autocut /video/Wheeler_Dealers
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::adapters::{CutDetector, DurationProbe, IndexRebuilder, ToolError, Toolset};
pub use crate::config::{Config, PolicyConfig};
pub use crate::core::Orchestrator;
pub use crate::domain::{Disposition, Outcome, Recording, RecordingState, RunSummary, SkipReason};
