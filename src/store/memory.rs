//! In-memory [`Store`] implementation.
//!
//! Uses `HashMap` and `Vec` behind `std::sync::RwLock` for thread safety.
//! Backs the CLI's one-shot scans and the test suite; embedders that bring a
//! real database implement [`Store`] themselves.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use anyhow::Result;

use crate::models::{CitationRecord, FileRecord};

use super::Store;

/// In-memory store for one-shot runs and tests.
#[derive(Default)]
pub struct InMemoryStore {
    files: RwLock<HashMap<String, FileRecord>>,
    citations: RwLock<Vec<CitationRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of file records currently held.
    pub fn file_count(&self) -> usize {
        self.files.read().unwrap().len()
    }

    /// Whether a file with this content hash is recorded.
    pub fn contains_file(&self, hash: &str) -> bool {
        self.files.read().unwrap().contains_key(hash)
    }

    /// Snapshot of all file records, in no particular order.
    pub fn files(&self) -> Vec<FileRecord> {
        self.files.read().unwrap().values().cloned().collect()
    }

    /// Snapshot of all citation records, in insertion order.
    pub fn citations(&self) -> Vec<CitationRecord> {
        self.citations.read().unwrap().clone()
    }
}

impl Store for InMemoryStore {
    fn insert_file(&self, record: &FileRecord) -> Result<()> {
        let mut files = self.files.write().unwrap();
        files.insert(record.hash.clone(), record.clone());
        Ok(())
    }

    fn insert_citations(&self, batch: &[CitationRecord]) -> Result<()> {
        let mut citations = self.citations.write().unwrap();
        citations.extend_from_slice(batch);
        Ok(())
    }

    fn delete_file(&self, hash: &str) -> Result<()> {
        let mut files = self.files.write().unwrap();
        files.remove(hash);
        let mut citations = self.citations.write().unwrap();
        citations.retain(|citation| citation.source_hash != hash);
        Ok(())
    }

    fn entry_counts_by_folder(&self) -> Result<HashMap<String, u64>> {
        let files = self.files.read().unwrap();
        let mut counts = HashMap::new();
        for record in files.values().filter(|record| !record.resubmission) {
            *counts
                .entry(record.folder.to_string_lossy().to_string())
                .or_insert(0) += record.entry_count;
        }
        Ok(counts)
    }

    fn new_citations_by_curator(&self) -> Result<HashMap<String, u64>> {
        let files = self.files.read().unwrap();
        let citations = self.citations.read().unwrap();
        let mut counts = HashMap::new();
        for citation in citations.iter().filter(|citation| citation.is_new) {
            if let Some(record) = files.get(&citation.source_hash) {
                *counts.entry(record.curator.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    fn new_citation_count(&self) -> Result<u64> {
        let files = self.files.read().unwrap();
        let citations = self.citations.read().unwrap();
        let mut pmids = HashSet::new();
        for citation in citations.iter().filter(|citation| citation.is_new) {
            if let Some(record) = files.get(&citation.source_hash) {
                if !record.resubmission {
                    pmids.insert(citation.pmid.as_str());
                }
            }
        }
        Ok(pmids.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(hash: &str, folder: &str, curator: &str, entries: u64, resub: bool) -> FileRecord {
        FileRecord {
            filename: format!("{hash}.txt"),
            filetype: "txt".to_string(),
            hash: hash.to_string(),
            curator: curator.to_string(),
            folder: PathBuf::from(folder),
            entry_count: entries,
            resubmission: resub,
        }
    }

    fn citation(pmid: &str, hash: &str, is_new: bool) -> CitationRecord {
        CitationRecord {
            pmid: pmid.to_string(),
            source_hash: hash.to_string(),
            is_new,
        }
    }

    #[test]
    fn delete_cascades_to_citations() {
        let store = InMemoryStore::new();
        store.insert_file(&record("h1", "/qa/new", "LJB", 2, false)).unwrap();
        store
            .insert_citations(&[citation("11111", "h1", true), citation("22222", "h1", false)])
            .unwrap();

        store.delete_file("h1").unwrap();
        assert_eq!(store.file_count(), 0);
        assert!(store.citations().is_empty());
    }

    #[test]
    fn deleting_unknown_hash_is_fine() {
        let store = InMemoryStore::new();
        store.delete_file("missing").unwrap();
    }

    #[test]
    fn folder_summary_skips_resubmissions() {
        let store = InMemoryStore::new();
        store.insert_file(&record("h1", "/qa/new", "LJB", 3, false)).unwrap();
        store.insert_file(&record("h2", "/qa/new", "CNO", 2, false)).unwrap();
        store.insert_file(&record("h3", "/qa/resub", "LJB", 9, true)).unwrap();

        let counts = store.entry_counts_by_folder().unwrap();
        assert_eq!(counts.get("/qa/new"), Some(&5));
        assert!(!counts.contains_key("/qa/resub"));
    }

    #[test]
    fn curator_summary_counts_new_citations_only() {
        let store = InMemoryStore::new();
        store.insert_file(&record("h1", "/qa/new", "LJB", 1, false)).unwrap();
        store
            .insert_citations(&[
                citation("11111", "h1", true),
                citation("22222", "h1", true),
                citation("33333", "h1", false),
            ])
            .unwrap();

        let counts = store.new_citations_by_curator().unwrap();
        assert_eq!(counts.get("LJB"), Some(&2));
    }

    #[test]
    fn new_citation_count_is_distinct_and_skips_resubmissions() {
        let store = InMemoryStore::new();
        store.insert_file(&record("h1", "/qa/new", "LJB", 1, false)).unwrap();
        store.insert_file(&record("h2", "/qa/resub", "CNO", 1, true)).unwrap();
        store
            .insert_citations(&[
                citation("11111", "h1", true),
                citation("11111", "h2", true),
                citation("22222", "h2", true),
            ])
            .unwrap();

        assert_eq!(store.new_citation_count().unwrap(), 1);
    }
}
