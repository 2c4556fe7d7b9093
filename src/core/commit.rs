//! Replacing the original recording with the cut.
//!
//! Commit is destructive, so it runs in two phases. The commit marker is
//! written before the first original is touched and removed only after the
//! done sentinel exists. A recording found with the marker but without the
//! sentinel was interrupted mid-commit and is finished by [`resume`].

use std::io;
use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use crate::adapters::IndexRebuilder;
use crate::domain::{CandidateError, Recording};

/// How far a commit got, recorded in the commit marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitPhase {
    /// Marker written, originals untouched
    Started,

    /// Cut moved into `00001.ts`, the remaining segments are expendable
    Renamed,
}

impl CommitPhase {
    fn as_str(&self) -> &'static str {
        match self {
            CommitPhase::Started => "started",
            CommitPhase::Renamed => "renamed",
        }
    }
}

/// Replace the originals with `cut_output` and mark the recording done
pub async fn commit(
    indexer: &dyn IndexRebuilder,
    recording: &Recording,
    cut_output: &Path,
) -> Result<(), CandidateError> {
    write_marker(recording, cut_output, CommitPhase::Started).await?;
    move_into_place(recording, cut_output).await?;
    finish(indexer, recording).await
}

/// Finish a commit that was interrupted
///
/// Safe to repeat: each step is skipped or redone depending on what the
/// previous attempt left behind.
pub async fn resume(
    indexer: &dyn IndexRebuilder,
    recording: &Recording,
) -> Result<(), CandidateError> {
    warn!("Resuming interrupted commit");
    let cut_output = recording
        .cut_output()
        .ok_or_else(|| CandidateError::NoEpisodeName(recording.path().to_path_buf()))?;

    if cut_output.exists() {
        move_into_place(recording, &cut_output).await?;
    } else if read_phase(recording).await? != CommitPhase::Renamed {
        // 00001.ts is still an original
        return Err(CandidateError::MissingCutOutput(cut_output));
    }

    finish(indexer, recording).await
}

async fn move_into_place(recording: &Recording, cut_output: &Path) -> Result<(), CandidateError> {
    let canonical = recording.canonical_segment();
    info!(from = %cut_output.display(), to = %canonical.display(), "Moving cut into place");
    tokio::fs::rename(cut_output, &canonical).await?;
    write_marker(recording, cut_output, CommitPhase::Renamed).await?;
    Ok(())
}

async fn finish(indexer: &dyn IndexRebuilder, recording: &Recording) -> Result<(), CandidateError> {
    let canonical = recording.canonical_segment();

    // Never delete the rest without the cut in place
    if !canonical.exists() {
        return Err(CandidateError::MissingCutOutput(canonical));
    }

    for media in recording.media_files()? {
        if media != canonical {
            info!(file = %media.display(), "Removing original segment");
            remove_if_exists(&media).await?;
        }
    }

    info!(tool = indexer.name(), "Rebuilding index");
    indexer.rebuild_index(recording.path()).await?;

    remove_if_exists(&recording.marks_path()).await?;
    tokio::fs::write(recording.done_path(), b"").await?;
    remove_if_exists(&recording.committing_path()).await?;

    Ok(())
}

/// Marker contents: timestamp, cut file name, phase
async fn write_marker(
    recording: &Recording,
    cut_output: &Path,
    phase: CommitPhase,
) -> io::Result<()> {
    let marker = format!(
        "{}\n{}\n{}\n",
        Utc::now().to_rfc3339(),
        cut_output.file_name().unwrap_or_default().to_string_lossy(),
        phase.as_str()
    );
    tokio::fs::write(recording.committing_path(), marker).await
}

/// Phase recorded in the marker, `Started` unless it says otherwise
async fn read_phase(recording: &Recording) -> io::Result<CommitPhase> {
    let bytes = match tokio::fs::read(recording.committing_path()).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(CommitPhase::Started),
        Err(e) => return Err(e),
    };

    let renamed = String::from_utf8_lossy(&bytes)
        .lines()
        .any(|line| line.trim() == CommitPhase::Renamed.as_str());
    Ok(if renamed {
        CommitPhase::Renamed
    } else {
        CommitPhase::Started
    })
}

async fn remove_if_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
