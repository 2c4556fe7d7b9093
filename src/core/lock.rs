//! Single-instance run lock.
//!
//! Runs are usually started from cron; a slow markad must not let the next
//! run start working on the same recordings.

use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use fs2::FileExt;
use tracing::debug;

/// Exclusive advisory lock, held until dropped
#[derive(Debug)]
pub struct RunLock {
    _file: File,
}

impl RunLock {
    /// Take the lock without waiting, failing if another run holds it
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create lock directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .with_context(|| format!("Failed to open lock file: {}", path.display()))?;

        file.try_lock_exclusive()
            .with_context(|| format!("Another autocut run holds {}", path.display()))?;

        debug!(lock = %path.display(), "Acquired run lock");

        // Lock is released when file is dropped
        Ok(Self { _file: file })
    }
}
