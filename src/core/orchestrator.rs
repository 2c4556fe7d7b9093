//! Main orchestrator for recording processing.
//!
//! Walks the discovered recordings one at a time and drives each through
//! eligibility, cut detection, validation and commit. A failing recording
//! is reported and left for the next run; only fatal errors stop the loop.

use std::path::Path;
use std::time::SystemTime;

use anyhow::Result;
use tracing::{error, info, instrument};

use crate::adapters::Toolset;
use crate::config::PolicyConfig;
use crate::domain::{Disposition, Outcome, Recording, RecordingState, RunSummary, SkipReason};

use super::discovery::discover;
use super::eligibility::EligibilityFilter;
use super::{commit, cutter, validator};

/// Main recording orchestrator
pub struct Orchestrator {
    tools: Toolset,
    policy: PolicyConfig,
    filter: EligibilityFilter,
    dry_run: bool,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(tools: Toolset, policy: PolicyConfig) -> Self {
        Self {
            tools,
            filter: EligibilityFilter::new(policy.clone()),
            policy,
            dry_run: false,
        }
    }

    /// Only run the eligibility guards, never invoke a tool
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process every recording under `root`
    #[instrument(skip(self, root), fields(root = %root.display()))]
    pub async fn run(&self, root: &Path) -> Result<RunSummary> {
        let mut summary = RunSummary::new();

        for recording in discover(root)? {
            let outcome = match self.process(&recording, SystemTime::now()).await {
                Ok(outcome) => outcome,
                Err(Disposition::Skip(reason)) => {
                    info!(recording = %recording.path().display(), %reason, "Skipping");
                    Outcome::Skipped { reason }
                }
                Err(Disposition::Retryable(e)) => {
                    error!(
                        recording = %recording.path().display(),
                        error = %e,
                        "Recording failed, leaving it for the next run"
                    );
                    Outcome::Failed {
                        error: e.to_string(),
                    }
                }
                Err(Disposition::Fatal(e)) => {
                    error!(
                        recording = %recording.path().display(),
                        error = %e,
                        "Fatal error, aborting run"
                    );
                    return Err(e.context(format!(
                        "Run aborted at {}",
                        recording.path().display()
                    )));
                }
            };
            summary.record(recording.path().to_path_buf(), outcome);
        }

        summary.finish();
        info!(
            committed = summary.committed(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "Done"
        );
        Ok(summary)
    }

    /// Drive one recording through the pipeline
    ///
    /// `now` is the reference time for the index age guard.
    #[instrument(skip(self, recording, now), fields(recording = %recording.path().display()))]
    pub async fn process(
        &self,
        recording: &Recording,
        now: SystemTime,
    ) -> Result<Outcome, Disposition> {
        match recording.state() {
            RecordingState::Committed => return Err(SkipReason::AlreadyDone.into()),
            RecordingState::Committing => return self.resume(recording).await,
            RecordingState::Unseen | RecordingState::Cut => {}
        }

        self.filter.check(recording, now)?;

        if self.dry_run {
            info!("Would process");
            return Ok(Outcome::Eligible);
        }

        info!("Processing");
        let report = cutter::invoke(self.tools.cutter.as_ref(), recording).await?;
        if !report.found_cuts(self.policy.min_marks_lines) {
            return Err(SkipReason::NothingToCut {
                marks: report.marks,
            }
            .into());
        }

        let check = validator::measure(
            self.tools.probe.as_ref(),
            recording,
            &report.cut_output,
            self.policy.min_cut_ratio,
        )
        .await?;
        if !check.accepted() {
            return Err(SkipReason::CutTooShort { ratio: check.ratio }.into());
        }

        info!(ratio = check.ratio, "The cut length seems ok, replacing originals");
        commit::commit(self.tools.indexer.as_ref(), recording, &report.cut_output).await?;

        Ok(Outcome::Committed {
            check: Some(check),
            resumed: false,
        })
    }

    /// Finish an interrupted commit; the originals may already be gone,
    /// so eligibility and validation no longer apply
    async fn resume(&self, recording: &Recording) -> Result<Outcome, Disposition> {
        if self.filter.is_deleted(recording) {
            return Err(SkipReason::Deleted.into());
        }
        if self.dry_run {
            info!("Would resume interrupted commit");
            return Ok(Outcome::Eligible);
        }

        commit::resume(self.tools.indexer.as_ref(), recording).await?;
        Ok(Outcome::Committed {
            check: None,
            resumed: true,
        })
    }
}
