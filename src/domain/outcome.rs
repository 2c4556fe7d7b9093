//! Per-candidate results and the run summary.

use std::fmt;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::adapters::ToolError;

/// Why a candidate was left alone. Expected, never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Done sentinel already present
    AlreadyDone,

    /// Episode name starts with `%`, a cut VDR made by hand
    VdrCut,

    /// Episode name ends with `.del`
    Deleted,

    /// `info` lacks the provenance marker
    NotScheduled,

    /// Index modified too recently, VDR may still be writing
    TooFresh { age_secs: u64 },

    /// markad left too few marks to have cut anything
    NothingToCut { marks: usize },

    /// Cut recording is implausibly short compared to the original
    CutTooShort { ratio: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyDone => write!(f, "already processed"),
            SkipReason::VdrCut => write!(f, "already a VDR cut"),
            SkipReason::Deleted => write!(f, "marked as deleted"),
            SkipReason::NotScheduled => write!(f, "not recorded by the scheduler"),
            SkipReason::TooFresh { age_secs } => write!(f, "index only {}s old", age_secs),
            SkipReason::NothingToCut { marks } => {
                write!(f, "markad could not do the cuts ({} marks)", marks)
            }
            SkipReason::CutTooShort { ratio } => {
                write!(f, "cut length too short ({:.3} of original)", ratio)
            }
        }
    }
}

/// Something went wrong with one candidate
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Original segments have zero total duration ({segments} segments)")]
    ZeroDuration { segments: usize },

    #[error("Cut output not found: {0}")]
    MissingCutOutput(PathBuf),

    #[error("Recording path has no episode directory: {0}")]
    NoEpisodeName(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CandidateError {
    /// Errors that would hit every other candidate the same way
    pub fn is_fatal(&self) -> bool {
        matches!(self, CandidateError::Tool(ToolError::Spawn { .. }))
    }
}

/// How the pipeline for one candidate ended, when it did not commit
#[derive(Debug)]
pub enum Disposition {
    /// Expected rejection, move on
    Skip(SkipReason),

    /// This candidate failed, the next run will try it again
    Retryable(CandidateError),

    /// Stop the whole run
    Fatal(anyhow::Error),
}

impl From<SkipReason> for Disposition {
    fn from(reason: SkipReason) -> Self {
        Disposition::Skip(reason)
    }
}

impl From<CandidateError> for Disposition {
    fn from(error: CandidateError) -> Self {
        if error.is_fatal() {
            Disposition::Fatal(error.into())
        } else {
            Disposition::Retryable(error)
        }
    }
}

impl From<ToolError> for Disposition {
    fn from(error: ToolError) -> Self {
        CandidateError::from(error).into()
    }
}

impl From<io::Error> for Disposition {
    fn from(error: io::Error) -> Self {
        CandidateError::from(error).into()
    }
}

/// What markad left behind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutReport {
    /// Lines in the marks file
    pub marks: usize,

    /// Where markad wrote the cut recording
    pub cut_output: PathBuf,
}

impl CutReport {
    /// markad writes a start and an end mark even when it finds nothing
    pub fn found_cuts(&self, min_marks: usize) -> bool {
        self.marks >= min_marks
    }
}

/// Durations before and after the cut
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationCheck {
    pub original_secs: f64,
    pub cut_secs: f64,
    pub ratio: f64,
    pub min_ratio: f64,
}

impl DurationCheck {
    /// Returns `None` when there is no original duration to compare against
    pub fn new(original_secs: f64, cut_secs: f64, min_ratio: f64) -> Option<Self> {
        if original_secs <= 0.0 {
            return None;
        }
        Some(Self {
            original_secs,
            cut_secs,
            ratio: cut_secs / original_secs,
            min_ratio,
        })
    }

    pub fn accepted(&self) -> bool {
        self.ratio >= self.min_ratio
    }
}

/// Final result for one candidate
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Committed {
        #[serde(skip_serializing_if = "Option::is_none")]
        check: Option<DurationCheck>,
        resumed: bool,
    },
    Skipped {
        #[serde(flatten)]
        reason: SkipReason,
    },
    Failed {
        error: String,
    },
    /// Dry run: eligible, nothing was run
    Eligible,
}

/// One line of the run summary
#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub recording: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Everything that happened in one invocation
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub candidates: Vec<CandidateReport>,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            candidates: Vec::new(),
        }
    }

    pub fn record(&mut self, recording: PathBuf, outcome: Outcome) {
        self.candidates.push(CandidateReport { recording, outcome });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn committed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Committed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    pub fn eligible(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Eligible))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.candidates.iter().filter(|c| pred(&c.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_check_threshold() {
        let ok = DurationCheck::new(3600.0, 2200.0, 0.55).unwrap();
        assert!(ok.accepted());
        assert!((ok.ratio - 0.6111).abs() < 0.001);

        let short = DurationCheck::new(3600.0, 1800.0, 0.55).unwrap();
        assert!(!short.accepted());

        let exact = DurationCheck::new(100.0, 55.0, 0.55).unwrap();
        assert!(exact.accepted());
    }

    #[test]
    fn test_duration_check_zero_original() {
        assert!(DurationCheck::new(0.0, 1200.0, 0.55).is_none());
    }

    #[test]
    fn test_cut_report_threshold() {
        let report = CutReport {
            marks: 2,
            cut_output: PathBuf::from("Episode.ts"),
        };
        assert!(!report.found_cuts(3));

        let report = CutReport { marks: 5, ..report };
        assert!(report.found_cuts(3));
    }

    #[test]
    fn test_spawn_failure_is_fatal() {
        let spawn = ToolError::Spawn {
            tool: "markad".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(matches!(Disposition::from(spawn), Disposition::Fatal(_)));

        let failed = ToolError::Failed {
            tool: "markad".to_string(),
            exit_code: 1,
            stderr: String::new(),
        };
        assert!(matches!(Disposition::from(failed), Disposition::Retryable(_)));
    }

    #[test]
    fn test_outcome_json_shape() {
        let mut summary = RunSummary::new();
        summary.record(
            PathBuf::from("/video/a.rec"),
            Outcome::Skipped {
                reason: SkipReason::TooFresh { age_secs: 60 },
            },
        );
        summary.finish();

        let json = serde_json::to_value(&summary).unwrap();
        let first = &json["candidates"][0];
        assert_eq!(first["status"], "skipped");
        assert_eq!(first["reason"], "too_fresh");
        assert_eq!(first["age_secs"], 60);
        assert_eq!(summary.skipped(), 1);
    }
}
