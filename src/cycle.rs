//! Survey-and-extract cycle orchestration.
//!
//! Coordinates the full flow: refresh the known-identifier set → survey the
//! folders → forward deletions → record added files and collect their
//! citations → bulk-insert the citation batch. Per-file problems are
//! reported and skipped; only a store failure aborts the cycle.

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::curators::CuratorDirectory;
use crate::extract;
use crate::models::{CitationRecord, CycleSummary};
use crate::pmids::KnownPmids;
use crate::store::{InMemoryStore, Store};
use crate::survey::Surveyor;

/// State carried across cycles: the snapshot history, the known-identifier
/// cache, and the curator roster.
pub struct EngineState {
    pub surveyor: Surveyor,
    pub known: KnownPmids,
    pub curators: CuratorDirectory,
}

impl EngineState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            surveyor: Surveyor::new(),
            known: KnownPmids::from_config(&config.known_pmids),
            curators: CuratorDirectory::new(config.curators.clone()),
        }
    }
}

/// Run one full cycle and return its summary.
///
/// A dry run performs the survey and extraction but skips every store call.
/// The snapshot history advances either way; callers that need a failed or
/// dry cycle replayed use [`Surveyor::reset`].
pub fn run_cycle(
    config: &Config,
    state: &mut EngineState,
    store: &dyn Store,
    dry_run: bool,
) -> Result<CycleSummary> {
    state.known.ensure_fresh();

    let changes = state.surveyor.survey(&config.survey.folders);

    for gone in &changes.to_remove {
        info!(path = %gone.path.display(), hash = %gone.hash, "file gone, deleting record");
        if !dry_run {
            store.delete_file(&gone.hash)?;
        }
    }

    let mut batch: Vec<CitationRecord> = Vec::new();
    for fp in &changes.to_add {
        let content = match std::fs::read(&fp.path) {
            Ok(bytes) => extract::decode_latin1(&bytes),
            Err(err) => {
                error!(path = %fp.path.display(), error = %err, "cannot re-read file, recording it without content");
                String::new()
            }
        };

        let record = extract::extract_file_record(
            fp,
            &content,
            &state.curators,
            &config.survey.resubmission_marker,
        );
        info!(
            path = %fp.path.display(),
            curator = %record.curator,
            entries = record.entry_count,
            "new file"
        );
        if !dry_run {
            store.insert_file(&record)?;
        }

        batch.extend(extract::extract_citations(&content, fp, state.known.ids()));
    }

    if batch.is_empty() {
        warn!("no references collected this cycle");
    } else if !dry_run {
        store.insert_citations(&batch)?;
    }

    Ok(CycleSummary {
        files_seen: state.surveyor.tracked(),
        added: changes.to_add.len(),
        removed: changes.to_remove.len(),
        citations: batch.len(),
        new_citations: batch.iter().filter(|citation| citation.is_new).count(),
    })
}

/// Run a single cycle against a fresh in-memory store and print the summary.
///
/// This is what `rfw scan` does: with nothing persisted from earlier runs,
/// every file in the folders comes back as added, which makes it an operator
/// preview of the current state of the submission folders.
pub fn run_scan(config: &Config, dry_run: bool) -> Result<()> {
    let mut state = EngineState::from_config(config);
    let store = InMemoryStore::new();
    let summary = run_cycle(config, &mut state, &store, dry_run)?;

    if dry_run {
        println!("scan (dry-run)");
    } else {
        println!("scan");
    }
    println!("  files seen: {}", summary.files_seen);
    println!("  added: {}", summary.added);
    println!("  removed: {}", summary.removed);
    println!("  citations: {}", summary.citations);
    println!("  new citations: {}", summary.new_citations);

    if !dry_run {
        let mut folders: Vec<(String, u64)> =
            store.entry_counts_by_folder()?.into_iter().collect();
        folders.sort();
        for (folder, entries) in folders {
            println!("  entries in {}: {}", folder, entries);
        }

        let mut curators: Vec<(String, u64)> =
            store.new_citations_by_curator()?.into_iter().collect();
        curators.sort();
        for (initials, count) in curators {
            println!("  new citations for {}: {}", initials, count);
        }
    }
    println!("ok");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use crate::config::{KnownPmidsConfig, SurveyConfig};

    fn test_config(tmp: &TempDir) -> Config {
        Config {
            survey: SurveyConfig {
                folders: vec![tmp.path().join("new")],
                resubmission_marker: "resub".to_string(),
            },
            known_pmids: KnownPmidsConfig {
                path: tmp.path().join("pmids.txt"),
                max_age_hours: 24,
            },
            curators: Vec::new(),
        }
    }

    #[test]
    fn dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("new")).unwrap();
        fs::write(
            tmp.path().join("new").join("a.txt"),
            "RX   PubMed=11111;\n//\n",
        )
        .unwrap();

        let config = test_config(&tmp);
        let mut state = EngineState::from_config(&config);
        let store = InMemoryStore::new();

        let summary = run_cycle(&config, &mut state, &store, true).unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(summary.citations, 1);
        assert_eq!(store.file_count(), 0);
        assert!(store.citations().is_empty());
    }

    #[test]
    fn empty_cycle_reports_zeroes() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("new")).unwrap();

        let config = test_config(&tmp);
        let mut state = EngineState::from_config(&config);
        let store = InMemoryStore::new();

        let summary = run_cycle(&config, &mut state, &store, false).unwrap();
        assert_eq!(summary.files_seen, 0);
        assert_eq!(summary.added, 0);
        assert_eq!(summary.citations, 0);
    }
}
