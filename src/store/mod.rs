//! Persistence boundary for survey results.
//!
//! The [`Store`] trait covers everything a cycle needs to persist: file
//! records keyed by content hash, the cycle's citation batch, and deletions.
//! It also exposes the summary queries the reporting side asks for. The
//! engine itself is single-threaded, but implementations must be
//! `Send + Sync` so embedders can share one store across threads.

pub mod memory;

pub use memory::InMemoryStore;

use anyhow::Result;
use std::collections::HashMap;

use crate::models::{CitationRecord, FileRecord};

/// Abstract persistence backend.
///
/// A store failure is the only error that aborts a cycle, so implementations
/// should return errors rather than degrade silently. Implementations are
/// expected to keep a file record and its citations consistent: deleting a
/// file removes its citations too.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert_file`](Store::insert_file) | Record one surveyed file |
/// | [`insert_citations`](Store::insert_citations) | Append the cycle's citation batch |
/// | [`delete_file`](Store::delete_file) | Drop a file and its citations by content hash |
/// | [`entry_counts_by_folder`](Store::entry_counts_by_folder) | Entries per folder, resubmissions excluded |
/// | [`new_citations_by_curator`](Store::new_citations_by_curator) | New citations attributed per curator |
/// | [`new_citation_count`](Store::new_citation_count) | Distinct new identifiers, resubmissions excluded |
pub trait Store: Send + Sync {
    /// Record one surveyed file, keyed by its content hash.
    fn insert_file(&self, record: &FileRecord) -> Result<()>;

    /// Append the cycle-wide citation batch. Implementations should treat one
    /// call as one atomic unit.
    fn insert_citations(&self, batch: &[CitationRecord]) -> Result<()>;

    /// Remove a file record and every citation that references it. Removing
    /// an unknown hash is not an error.
    fn delete_file(&self, hash: &str) -> Result<()>;

    /// Sum of entry counts per folder, with resubmission files excluded.
    fn entry_counts_by_folder(&self) -> Result<HashMap<String, u64>>;

    /// Count of new citations per curator initials.
    fn new_citations_by_curator(&self) -> Result<HashMap<String, u64>>;

    /// Distinct new identifiers, not counting those from resubmission files.
    fn new_citation_count(&self) -> Result<u64>;
}
