//! Cut invocation.

use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::adapters::CutDetector;
use crate::domain::{CandidateError, CutReport, Recording};

/// Run the cut detector on a recording and read back what it left
///
/// The caller decides whether the mark count is enough; this only reports.
pub async fn invoke(
    detector: &dyn CutDetector,
    recording: &Recording,
) -> Result<CutReport, CandidateError> {
    let cut_output = recording
        .cut_output()
        .ok_or_else(|| CandidateError::NoEpisodeName(recording.path().to_path_buf()))?;

    info!(tool = detector.name(), "Running cut detection");
    detector.detect_cuts(recording.path()).await?;

    let marks = count_lines(&recording.marks_path()).await?;
    debug!(marks, "Read marks");

    Ok(CutReport { marks, cut_output })
}

/// Lines in a text file, zero when the file does not exist
async fn count_lines(path: &Path) -> io::Result<usize> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).lines().count()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e),
    }
}
