//! Eligibility guards.
//!
//! A candidate is only processed when every guard passes. All guards are
//! plain reads; the cheap name checks run before any file is opened.

use std::time::{Duration, SystemTime};

use tracing::debug;

use crate::config::PolicyConfig;
use crate::domain::{Recording, SkipReason};

/// Chain of guards configured from the policy section
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    policy: PolicyConfig,
}

impl EligibilityFilter {
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    /// Check every guard, returning the first that rejects
    pub fn check(&self, recording: &Recording, now: SystemTime) -> Result<(), SkipReason> {
        if recording.done_path().exists() {
            return Err(SkipReason::AlreadyDone);
        }
        if self.is_vdr_cut(recording) {
            return Err(SkipReason::VdrCut);
        }
        if self.is_deleted(recording) {
            return Err(SkipReason::Deleted);
        }
        if !self.is_scheduled(recording) {
            return Err(SkipReason::NotScheduled);
        }
        self.check_age(recording, now)
    }

    /// Episode name carries VDR's edited-recording prefix
    pub fn is_vdr_cut(&self, recording: &Recording) -> bool {
        recording
            .episode_name()
            .map(|name| name.to_string_lossy().starts_with(&self.policy.vdr_cut_prefix))
            .unwrap_or(false)
    }

    /// Episode name carries VDR's deletion suffix
    pub fn is_deleted(&self, recording: &Recording) -> bool {
        recording
            .episode_name()
            .map(|name| name.to_string_lossy().ends_with(&self.policy.deleted_suffix))
            .unwrap_or(false)
    }

    /// `info` mentions the scheduler that created the timer
    pub fn is_scheduled(&self, recording: &Recording) -> bool {
        match std::fs::read(recording.info_path()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).contains(&self.policy.provenance_marker),
            Err(e) => {
                debug!(recording = %recording.path().display(), error = %e, "Cannot read info");
                false
            }
        }
    }

    /// The index must not have been written to within the age threshold
    ///
    /// A missing index or one modified in the future counts as brand new.
    pub fn check_age(&self, recording: &Recording, now: SystemTime) -> Result<(), SkipReason> {
        let age = index_age(recording, now);
        debug!(recording = %recording.path().display(), age_secs = age.as_secs(), "Index age");

        if age > Duration::from_secs(self.policy.min_index_age_seconds) {
            Ok(())
        } else {
            Err(SkipReason::TooFresh {
                age_secs: age.as_secs(),
            })
        }
    }
}

fn index_age(recording: &Recording, now: SystemTime) -> Duration {
    std::fs::metadata(recording.index_path())
        .and_then(|m| m.modified())
        .ok()
        .and_then(|mtime| now.duration_since(mtime).ok())
        .unwrap_or(Duration::ZERO)
}
