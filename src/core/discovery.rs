//! Candidate discovery.
//!
//! The given path is either one `.rec` directory or a series directory laid
//! out the way VDR stores recordings: `<series>/<episode>/<date>.rec/`.

use std::path::Path;

use anyhow::{Context, Result};
use glob::Pattern;
use tracing::{debug, warn};

use crate::domain::recording::{Recording, INDEX_FILE};

/// Enumerate recordings below `root`
///
/// Lazy over a snapshot of the filesystem taken by the glob walk; entries
/// that cannot be read are logged and skipped.
pub fn discover(root: &Path) -> Result<Box<dyn Iterator<Item = Recording>>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Recording path not found: {}", root.display()))?;

    if root.join(INDEX_FILE).exists() {
        debug!(recording = %root.display(), "Path is a single recording");
        return Ok(Box::new(std::iter::once(Recording::new(root))));
    }

    let pattern = format!(
        "{}/*/*.rec/{}",
        Pattern::escape(&root.to_string_lossy()),
        INDEX_FILE
    );
    debug!(%pattern, "Searching for recordings");

    let entries = glob::glob(&pattern)
        .with_context(|| format!("Invalid discovery pattern: {}", pattern))?;

    Ok(Box::new(entries.filter_map(|entry| match entry {
        Ok(index) => index.parent().map(Recording::new),
        Err(e) => {
            warn!(path = %e.path().display(), error = %e.error(), "Unreadable path, skipping");
            None
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn make_rec(root: &Path, episode: &str, rec: &str) -> PathBuf {
        let dir = root.join(episode).join(rec);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(INDEX_FILE), b"").unwrap();
        dir
    }

    #[test]
    fn test_single_recording_root() {
        let temp = TempDir::new().unwrap();
        let dir = make_rec(temp.path(), "Episode", "2021-07-26.20.03.6-0.rec");

        let found: Vec<Recording> = discover(&dir).unwrap().collect();
        assert_eq!(found, vec![Recording::new(dir.canonicalize().unwrap())]);
    }

    #[test]
    fn test_series_root() {
        let temp = TempDir::new().unwrap();
        let a = make_rec(temp.path(), "Episode_A", "2021-07-26.20.03.6-0.rec");
        let b = make_rec(temp.path(), "Episode_B", "2021-08-02.20.03.6-0.rec");

        // Not a recording: wrong suffix, missing index, too deep
        std::fs::create_dir_all(temp.path().join("Episode_C").join("notes")).unwrap();
        std::fs::write(temp.path().join("Episode_C").join("notes").join(INDEX_FILE), b"").unwrap();
        std::fs::create_dir_all(temp.path().join("Episode_D").join("2021.rec")).unwrap();
        make_rec(&temp.path().join("Deeper"), "Episode_E", "2021.rec");

        let found: Vec<PathBuf> = discover(temp.path())
            .unwrap()
            .map(|r| r.path().to_path_buf())
            .collect();
        assert_eq!(
            found,
            vec![a.canonicalize().unwrap(), b.canonicalize().unwrap()]
        );
    }

    #[test]
    fn test_root_with_glob_characters() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Show [HD]");
        let dir = make_rec(&root, "Episode", "2021.rec");

        let found: Vec<Recording> = discover(&root).unwrap().collect();
        assert_eq!(found, vec![Recording::new(dir.canonicalize().unwrap())]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(discover(&temp.path().join("missing")).is_err());
    }
}
