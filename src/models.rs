//! Core data models used throughout refwatch.
//!
//! These types represent the fingerprints, records, and summaries that flow
//! through the survey and extraction pipeline. None of them are persisted by
//! the engine itself; the [`Store`](crate::store::Store) boundary decides
//! what outlives a cycle.

use serde::Deserialize;
use std::path::PathBuf;

/// Identity of one file at one survey instant.
///
/// The hash covers the file's content bytes followed by its path string, so
/// identical content at two locations yields two distinct fingerprints and a
/// renamed file shows up as one removal plus one addition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFingerprint {
    pub path: PathBuf,
    pub hash: String,
}

/// Work set produced by one survey pass.
///
/// `to_add` holds owned fingerprints from the current generation (callers
/// re-open content by path); `to_remove` holds fingerprints from the previous
/// generation, whose hashes key the deletions downstream.
#[derive(Debug, Default)]
pub struct ChangeSet {
    pub to_add: Vec<FileFingerprint>,
    pub to_remove: Vec<FileFingerprint>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// One PubMed identifier pulled out of a reference block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationRecord {
    pub pmid: String,
    /// Content hash of the file the identifier came from.
    pub source_hash: String,
    /// False when the identifier was already in the known set.
    pub is_new: bool,
}

/// Metadata recorded for every file the survey picks up.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub filename: String,
    /// Extension without the leading dot; empty when the file has none.
    pub filetype: String,
    pub hash: String,
    /// Initials of the resolved curator, or the fallback sentinel.
    pub curator: String,
    pub folder: PathBuf,
    /// Number of database entries, counted by their `//` terminators.
    pub entry_count: u64,
    pub resubmission: bool,
}

/// A curation team member from the configured roster.
#[derive(Debug, Clone, Deserialize)]
pub struct Curator {
    pub surname: String,
    #[serde(default)]
    pub given_name: String,
    pub initials: String,
    #[serde(default)]
    pub checker: bool,
}

/// Counts reported after one survey-and-extract cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct CycleSummary {
    /// Files present in the current generation, changed or not.
    pub files_seen: usize,
    pub added: usize,
    pub removed: usize,
    pub citations: usize,
    pub new_citations: usize,
}
