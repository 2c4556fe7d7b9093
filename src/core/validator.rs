//! Duration plausibility check.
//!
//! markad occasionally cuts away most of a programme. A cut that keeps less
//! than `min_cut_ratio` of the original running time is not trusted.

use std::path::Path;

use tracing::{debug, info};

use crate::adapters::DurationProbe;
use crate::domain::{CandidateError, DurationCheck, Recording};

/// Probe the originals and the cut output and compute their ratio
///
/// Fails with `ZeroDuration` instead of dividing when there is nothing to
/// compare against.
pub async fn measure(
    probe: &dyn DurationProbe,
    recording: &Recording,
    cut_output: &Path,
    min_ratio: f64,
) -> Result<DurationCheck, CandidateError> {
    if !cut_output.exists() {
        return Err(CandidateError::MissingCutOutput(cut_output.to_path_buf()));
    }

    let segments = recording.segments()?;
    let mut original_secs = 0.0;
    for segment in &segments {
        let secs = probe.probe_duration(segment).await?;
        debug!(segment = %segment.display(), secs, "Probed segment");
        original_secs += secs;
    }

    let cut_secs = probe.probe_duration(cut_output).await?;

    let check = DurationCheck::new(original_secs, cut_secs, min_ratio).ok_or(
        CandidateError::ZeroDuration {
            segments: segments.len(),
        },
    )?;

    info!(
        original_secs = check.original_secs,
        cut_secs = check.cut_secs,
        ratio = check.ratio,
        "Compared cut length to original"
    );
    Ok(check)
}
