//! Reference-block parsing: citation extraction and per-file metadata.
//!
//! Submission files are flat text in the classic UniProtKB layout. Each line
//! starts with a two-character tag; payload text begins at column 5:
//!
//! ```text
//! RP   NUCLEOTIDE SEQUENCE.
//! RC   STRAIN=cv. Niedersachsen;
//! RX   PubMed=15461460; DOI=10.1104/pp.104.052423;
//! ```
//!
//! The tag drives a small state machine. `RP` lines accumulate the reference
//! position text, `RC` lines are skipped outright, and an `RX` line emits a
//! PubMed identifier unless the accumulated position text marks the reference
//! as a large-scale experiment. Any other tag flushes the accumulator, which
//! keeps one reference block from bleeding into the next.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::config::Config;
use crate::curators::{self, CuratorDirectory};
use crate::models::{CitationRecord, FileFingerprint, FileRecord};
use crate::pmids::KnownPmids;
use crate::survey::fingerprint_file;

/// Width of the line tag, in characters.
const TAG_WIDTH: usize = 2;
/// Column (character offset) where line content begins.
const CONTENT_COLUMN: usize = 5;
/// Case-sensitive marker flagging large-scale experiment references.
const LARGE_SCALE_MARKER: &str = "LARGE SCALE";

fn pmid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"PubMed=([0-9]+)").unwrap())
}

/// Decode file bytes from the fixed legacy single-byte encoding (ISO-8859-1).
/// Every byte maps straight to the code point of the same value, so decoding
/// cannot fail.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Split a line into its tag and the content at [`CONTENT_COLUMN`].
///
/// Offsets are in characters; legacy files may carry non-ASCII bytes in any
/// column. Lines shorter than the tag width keep their full text as the tag
/// (they never match a known tag), and lines shorter than the content column
/// have empty content.
fn split_line(line: &str) -> (&str, &str) {
    let tag = match char_offset(line, TAG_WIDTH) {
        Some(end) => &line[..end],
        None => line,
    };
    let content = match char_offset(line, CONTENT_COLUMN) {
        Some(start) => line[start..].trim_end(),
        None => "",
    };
    (tag, content)
}

fn char_offset(line: &str, n: usize) -> Option<usize> {
    line.char_indices().nth(n).map(|(idx, _)| idx)
}

/// Scan `content` for citation lines and return one record per unique PubMed
/// identifier, partitioned against the known set.
///
/// References whose accumulated `RP` text contains [`LARGE_SCALE_MARKER`]
/// are reported and skipped: they are never offered for curation. Records
/// come back sorted by identifier so output is deterministic.
pub fn extract_citations(
    content: &str,
    source: &FileFingerprint,
    known: &HashSet<String>,
) -> Vec<CitationRecord> {
    let mut position_block: Vec<&str> = Vec::new();
    let mut pmids: HashSet<String> = HashSet::new();

    for line in content.lines() {
        let (tag, rest) = split_line(line);
        match tag {
            "RP" => position_block.push(rest),
            "RC" => {}
            "RX" => {
                let position = position_block.join(" ");
                if position.contains(LARGE_SCALE_MARKER) {
                    warn!(path = %source.path.display(), line = rest, "ignored large scale reference");
                    info!(position = %position, "reference position for the citation above");
                    continue;
                }
                if let Some(caps) = pmid_regex().captures(rest) {
                    pmids.insert(caps[1].to_string());
                }
            }
            _ => position_block.clear(),
        }
    }

    let mut records: Vec<CitationRecord> = pmids
        .into_iter()
        .map(|pmid| {
            let is_new = !known.contains(&pmid);
            CitationRecord {
                pmid,
                source_hash: source.hash.clone(),
                is_new,
            }
        })
        .collect();
    records.sort_by(|a, b| a.pmid.cmp(&b.pmid));
    records
}

/// Build the metadata record for one surveyed file.
///
/// `content` is the file's decoded text; pass an empty string when the file
/// could not be re-read, which yields a zero entry count and the fallback
/// curator.
pub fn extract_file_record(
    fp: &FileFingerprint,
    content: &str,
    directory: &CuratorDirectory,
    resubmission_marker: &str,
) -> FileRecord {
    let filename = fp
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let filetype = fp
        .path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let folder = fp
        .path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    let initials = curators::find_curator_initials(content);
    let curator = directory.resolve(initials, &fp.path);

    FileRecord {
        filename,
        filetype,
        hash: fp.hash.clone(),
        curator: curator.initials.clone(),
        folder,
        entry_count: count_entries(content),
        resubmission: fp.path.to_string_lossy().contains(resubmission_marker),
    }
}

/// Count database entries by their `//` terminator lines.
pub fn count_entries(content: &str) -> u64 {
    content.matches("\n//").count() as u64
}

/// Run the extractor against a single file and print what it finds.
///
/// Debugging aid: fingerprints the file, loads the known-identifier set, and
/// prints the metadata record plus every citation with its partition.
pub fn run_extract(config: &Config, path: &std::path::Path) -> Result<()> {
    let fp = fingerprint_file(path)?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let content = decode_latin1(&bytes);

    let directory = CuratorDirectory::new(config.curators.clone());
    let mut known = KnownPmids::from_config(&config.known_pmids);
    known.ensure_fresh();

    let record = extract_file_record(&fp, &content, &directory, &config.survey.resubmission_marker);
    let citations = extract_citations(&content, &fp, known.ids());

    println!("extract {}", path.display());
    println!("  hash: {}", record.hash);
    println!("  curator: {}", record.curator);
    println!("  entries: {}", record.entry_count);
    println!("  resubmission: {}", record.resubmission);
    println!("  citations: {}", citations.len());
    for citation in &citations {
        let marker = if citation.is_new { "new" } else { "known" };
        println!("    {:<10} {}", citation.pmid, marker);
    }
    println!("ok");

    Ok(())
}
