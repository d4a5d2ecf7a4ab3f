//! Folder survey and change detection.
//!
//! Each survey pass fingerprints every regular file directly inside the
//! configured folders and diffs the result against the previous pass.
//! Exactly two generations are retained, so the work set is always
//! "what changed since last time":
//!
//! ```text
//! previous ────┐
//!              ├──▶ to_add    = current − previous
//! current  ────┘    to_remove = previous − current
//! ```
//!
//! A content edit or a rename both show up as one removal plus one addition,
//! because the fingerprint hash covers content bytes and the path string.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::error;
use walkdir::WalkDir;

use crate::models::{ChangeSet, FileFingerprint};

/// All fingerprints observed in one pass, keyed by content hash.
pub type SurveySnapshot = HashMap<String, FileFingerprint>;

/// The two most recent survey generations. Older generations are gone for
/// good; nothing here is ever persisted.
#[derive(Debug, Default)]
struct SnapshotHistory {
    previous: SurveySnapshot,
    current: SurveySnapshot,
}

impl SnapshotHistory {
    fn advance(&mut self, snapshot: SurveySnapshot) {
        self.previous = std::mem::replace(&mut self.current, snapshot);
    }

    fn diff(&self) -> ChangeSet {
        let to_add = self
            .current
            .iter()
            .filter(|(hash, _)| !self.previous.contains_key(*hash))
            .map(|(_, fp)| fp.clone())
            .collect();
        let to_remove = self
            .previous
            .iter()
            .filter(|(hash, _)| !self.current.contains_key(*hash))
            .map(|(_, fp)| fp.clone())
            .collect();
        ChangeSet { to_add, to_remove }
    }
}

/// Owns the snapshot history across survey passes.
///
/// A fresh surveyor holds two empty generations, so the first pass reports
/// every file as added. The history advances on every [`survey`](Self::survey)
/// call, whether or not the caller manages to persist the results; after a
/// persistence failure, [`reset`](Self::reset) makes the next pass re-report
/// everything.
#[derive(Debug, Default)]
pub struct Surveyor {
    history: SnapshotHistory,
}

impl Surveyor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint every file in `folders` and return what changed since the
    /// previous pass.
    ///
    /// Missing folders and unreadable files are reported and skipped; an
    /// unreadable file is simply absent from the new generation.
    pub fn survey(&mut self, folders: &[PathBuf]) -> ChangeSet {
        let snapshot = take_snapshot(folders);
        self.history.advance(snapshot);
        self.history.diff()
    }

    /// Drop both retained generations.
    pub fn reset(&mut self) {
        self.history = SnapshotHistory::default();
    }

    /// Number of files in the current generation.
    pub fn tracked(&self) -> usize {
        self.history.current.len()
    }
}

fn take_snapshot(folders: &[PathBuf]) -> SurveySnapshot {
    let mut snapshot = SurveySnapshot::new();

    for folder in folders {
        if !folder.is_dir() {
            error!(folder = %folder.display(), "survey folder missing, skipping");
            continue;
        }

        // min_depth(1) skips the folder itself; max_depth(1) keeps the
        // listing non-recursive.
        for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    error!(folder = %folder.display(), error = %err, "unreadable directory entry, skipping");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match fingerprint_file(entry.path()) {
                Ok(fp) => {
                    snapshot.insert(fp.hash.clone(), fp);
                }
                Err(err) => {
                    error!(path = %entry.path().display(), error = %format!("{err:#}"), "unreadable file, omitting from snapshot");
                }
            }
        }
    }

    snapshot
}

/// Compute a file's fingerprint: SHA-256 over its content bytes followed by
/// the bytes of its path string.
pub fn fingerprint_file(path: &Path) -> Result<FileFingerprint> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hasher.update(path.to_string_lossy().as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    Ok(FileFingerprint {
        path: path.to_path_buf(),
        hash,
    })
}
