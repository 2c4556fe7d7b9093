//! Domain types for autocut.
//!
//! This module contains the core data structures:
//! - Recording: One VDR recording directory and its derived file names
//! - Outcome: What happened to a candidate and why

pub mod outcome;
pub mod recording;

// Re-export commonly used types
pub use outcome::{
    CandidateError, CandidateReport, CutReport, Disposition, DurationCheck, Outcome, RunSummary,
    SkipReason,
};
pub use recording::{Recording, RecordingState};
