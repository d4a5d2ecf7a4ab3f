//! Known-identifier set backed by a periodically exported file.
//!
//! The main database exports the list of PubMed identifiers it already
//! holds, one per line. The extractor consults this set to decide which
//! citations are new. The file is large and changes rarely, so it is kept in
//! memory and reloaded only when a freshness window expires.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::KnownPmidsConfig;

/// PubMed identifiers already present in the main database.
pub struct KnownPmids {
    path: PathBuf,
    max_age: Duration,
    ids: HashSet<String>,
    loaded_at: Option<DateTime<Utc>>,
}

impl KnownPmids {
    pub fn new(path: PathBuf, max_age: Duration) -> Self {
        Self {
            path,
            max_age,
            ids: HashSet::new(),
            loaded_at: None,
        }
    }

    pub fn from_config(config: &KnownPmidsConfig) -> Self {
        Self::new(config.path.clone(), Duration::hours(config.max_age_hours))
    }

    /// Reload the set when it has never been loaded or the last load is older
    /// than the freshness window; otherwise a no-op.
    ///
    /// A missing or unreadable backing file is reported and leaves the set
    /// empty, so every extracted identifier will look new until the next
    /// window. The load instant is recorded either way; a broken file does
    /// not trigger a retry on every cycle.
    pub fn ensure_fresh(&mut self) {
        let stale = match self.loaded_at {
            None => true,
            Some(at) => Utc::now() - at > self.max_age,
        };
        if !stale {
            return;
        }

        match load_id_file(&self.path) {
            Ok((ids, modified)) => {
                info!(
                    count = ids.len(),
                    path = %self.path.display(),
                    exported = %modified.format("%Y-%m-%d %H:%M"),
                    "loaded known identifiers"
                );
                self.ids = ids;
            }
            Err(err) => {
                error!(
                    path = %self.path.display(),
                    error = %format!("{err:#}"),
                    "failed to load known identifiers, treating every citation as new"
                );
                self.ids = HashSet::new();
            }
        }
        self.loaded_at = Some(Utc::now());
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }
}

fn load_id_file(path: &Path) -> Result<(HashSet<String>, DateTime<Utc>)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read known-identifier file: {}", path.display()))?;
    let ids = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    Ok((ids, modified))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_one_id_per_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pmids.txt");
        fs::write(&path, "11111\n22222\n\n  33333  \n").unwrap();

        let mut known = KnownPmids::new(path, Duration::hours(24));
        known.ensure_fresh();
        assert_eq!(known.ids().len(), 3);
        assert!(known.ids().contains("33333"));
    }

    #[test]
    fn missing_file_yields_empty_set() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.txt");

        let mut known = KnownPmids::new(path, Duration::hours(24));
        known.ensure_fresh();
        assert!(known.ids().is_empty());
    }

    #[test]
    fn fresh_set_is_not_reloaded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pmids.txt");
        fs::write(&path, "11111\n").unwrap();

        let mut known = KnownPmids::new(path.clone(), Duration::hours(24));
        known.ensure_fresh();
        assert_eq!(known.ids().len(), 1);

        // Within the freshness window the file is not consulted again.
        fs::write(&path, "11111\n22222\n").unwrap();
        known.ensure_fresh();
        assert_eq!(known.ids().len(), 1);
    }

    #[test]
    fn stale_set_is_reloaded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pmids.txt");
        fs::write(&path, "11111\n").unwrap();

        let mut known = KnownPmids::new(path.clone(), Duration::hours(24));
        known.ensure_fresh();

        fs::write(&path, "11111\n22222\n").unwrap();
        // Age the last load past the window instead of sleeping.
        known.loaded_at = Some(Utc::now() - Duration::hours(25));
        known.ensure_fresh();
        assert_eq!(known.ids().len(), 2);
    }

    #[test]
    fn failed_load_still_counts_as_a_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.txt");

        let mut known = KnownPmids::new(path.clone(), Duration::hours(24));
        known.ensure_fresh();
        assert!(known.loaded_at.is_some());

        // The file appearing later is ignored until the window expires.
        fs::write(&path, "11111\n").unwrap();
        known.ensure_fresh();
        assert!(known.ids().is_empty());
    }
}
