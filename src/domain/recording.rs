//! VDR recording directory layout.
//!
//! A recording is a `*.rec` directory created by VDR. Everything autocut
//! knows about it is derived from the files inside that directory.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Serialize;

/// VDR playback index, its mtime tells how long ago recording stopped
pub const INDEX_FILE: &str = "index";

/// Recording metadata written by VDR
pub const INFO_FILE: &str = "info";

/// Cut plan written by markad
pub const MARKS_FILE: &str = "marks";

/// Sentinel written after a successful commit
pub const DONE_FILE: &str = "info.autocut";

/// Written before the original media is touched, removed after the sentinel
pub const COMMITTING_FILE: &str = "info.autocut.committing";

/// Segment slot the cut recording is moved into
pub const CANONICAL_SEGMENT: &str = "00001.ts";

/// Original VDR segments: 00001.ts, 00002.ts, ...
pub const SEGMENT_PATTERN: &str = "[0-9][0-9][0-9][0-9][0-9].ts";

const MEDIA_EXTENSION: &str = "ts";

/// Lifecycle state of a recording, derived from marker files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    /// Nothing autocut related in the directory yet
    Unseen,

    /// markad has left a marks file but nothing was committed
    Cut,

    /// A commit started and did not finish
    Committing,

    /// Sentinel present, never touch again
    Committed,
}

/// One VDR recording directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    path: PathBuf,
}

impl Recording {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Episode directory name, the second-to-last path component
    ///
    /// For `/video/Show/Episode/2021-07-26.20.03.6-0.rec` this is `Episode`.
    pub fn episode_name(&self) -> Option<&OsStr> {
        self.path.parent().and_then(|p| p.file_name())
    }

    pub fn index_path(&self) -> PathBuf {
        self.path.join(INDEX_FILE)
    }

    pub fn info_path(&self) -> PathBuf {
        self.path.join(INFO_FILE)
    }

    pub fn marks_path(&self) -> PathBuf {
        self.path.join(MARKS_FILE)
    }

    pub fn done_path(&self) -> PathBuf {
        self.path.join(DONE_FILE)
    }

    pub fn committing_path(&self) -> PathBuf {
        self.path.join(COMMITTING_FILE)
    }

    pub fn canonical_segment(&self) -> PathBuf {
        self.path.join(CANONICAL_SEGMENT)
    }

    /// File markad writes the cut recording to: `<episode>.ts`
    pub fn cut_output(&self) -> Option<PathBuf> {
        self.episode_name().map(|name| {
            let mut file_name = OsString::from(name);
            file_name.push(".");
            file_name.push(MEDIA_EXTENSION);
            self.path.join(file_name)
        })
    }

    /// Read the lifecycle state from the marker files
    pub fn state(&self) -> RecordingState {
        if self.done_path().exists() {
            RecordingState::Committed
        } else if self.committing_path().exists() {
            RecordingState::Committing
        } else if self.marks_path().exists() {
            RecordingState::Cut
        } else {
            RecordingState::Unseen
        }
    }

    /// Original numbered segments, sorted by name
    pub fn segments(&self) -> io::Result<Vec<PathBuf>> {
        let pattern = Pattern::new(SEGMENT_PATTERN)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

        self.files_matching(|name| pattern.matches(name))
    }

    /// Every `.ts` file in the directory, segments and cut output alike
    pub fn media_files(&self) -> io::Result<Vec<PathBuf>> {
        self.files_matching(|name| {
            Path::new(name)
                .extension()
                .map(|ext| ext == MEDIA_EXTENSION)
                .unwrap_or(false)
        })
    }

    fn files_matching(&self, matches: impl Fn(&str) -> bool) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if matches(&name.to_string_lossy()) {
                files.push(entry.path());
            }
        }

        files.sort();
        Ok(files)
    }
}
