//! Bulk PubMed-identifier extraction from reference-database dumps.
//!
//! Stateless companion to the survey cycle: point it at a folder of dump
//! files and it collects every identifier it can find. The usual use is
//! seeding the known-identifier file consumed by [`crate::pmids`]. Dumps
//! come in three flavors, each with its own citation syntax:
//!
//! ```text
//! txt   RX   PubMed=15461460; DOI=...;
//! xml   <dbReference type="PubMed" id="15461460"/>
//! rdf   <citation rdf:resource="http://purl.uniprot.org/citations/15461460"/>
//! ```

use anyhow::{bail, Context, Result};
use globset::Glob;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{error, info};
use walkdir::WalkDir;

use crate::extract::decode_latin1;

/// Dump flavors the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Txt,
    Xml,
    Rdf,
}

impl FromStr for DumpFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "xml" => Ok(Self::Xml),
            "rdf" => Ok(Self::Rdf),
            other => bail!("Unknown dump format: '{}'. Must be txt, xml, or rdf.", other),
        }
    }
}

fn txt_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Only RX lines carry citations; PubMed= can show up in free text.
    RE.get_or_init(|| Regex::new(r"(?m)^RX\s.*?PubMed=([0-9]+)").unwrap())
}

fn xml_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<dbReference type="PubMed" id="([0-9]+)"/>"#).unwrap())
}

fn rdf_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<citation rdf:resource="http://purl\.uniprot\.org/citations/([0-9]+)"#)
            .unwrap()
    })
}

/// Collect every identifier in `content` for the given dump flavor.
pub fn scan_dump(content: &str, format: DumpFormat) -> Vec<String> {
    let regex = match format {
        DumpFormat::Txt => txt_regex(),
        DumpFormat::Xml => xml_regex(),
        DumpFormat::Rdf => rdf_regex(),
    };
    regex
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Extract the unique identifier set from every dump file in `dir` whose
/// name matches `pattern`, and write it sorted, one per line.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes to
/// stdout for piping. Per-file read errors are reported and skipped.
pub fn run_dump(
    dir: &Path,
    pattern: &str,
    format: DumpFormat,
    output: Option<&Path>,
) -> Result<()> {
    if !dir.is_dir() {
        bail!("Dump folder does not exist: {}", dir.display());
    }
    let matcher = Glob::new(pattern)
        .with_context(|| format!("Invalid glob pattern: '{}'", pattern))?
        .compile_matcher();

    let mut pmids: BTreeSet<String> = BTreeSet::new();
    let mut files_read = 0usize;

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                error!(folder = %dir.display(), error = %err, "unreadable directory entry, skipping");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !matcher.is_match(entry.file_name()) {
            continue;
        }

        match std::fs::read(entry.path()) {
            Ok(bytes) => {
                let content = decode_latin1(&bytes);
                let found = scan_dump(&content, format);
                info!(path = %entry.path().display(), count = found.len(), "scanned dump file");
                pmids.extend(found);
                files_read += 1;
            }
            Err(err) => {
                error!(path = %entry.path().display(), error = %err, "cannot read dump file, skipping");
            }
        }
    }

    let mut body = pmids.iter().cloned().collect::<Vec<_>>().join("\n");
    if !body.is_empty() {
        body.push('\n');
    }

    match output {
        Some(path) => {
            std::fs::write(path, &body)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            eprintln!(
                "Extracted {} identifiers from {} files to {}",
                pmids.len(),
                files_read,
                path.display()
            );
        }
        None => {
            print!("{}", body);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_format_names() {
        assert_eq!(DumpFormat::from_str("txt").unwrap(), DumpFormat::Txt);
        assert_eq!(DumpFormat::from_str("XML").unwrap(), DumpFormat::Xml);
        assert!(DumpFormat::from_str("csv").is_err());
    }

    #[test]
    fn scans_txt_dump() {
        let content = "\
ID   A
RX   MEDLINE=95001; PubMed=11111; DOI=10.1/a;
RX   PubMed=22222;
CC   see PubMed=99999 for details
//
";
        let found = scan_dump(content, DumpFormat::Txt);
        assert_eq!(found, vec!["11111", "22222"]);
    }

    #[test]
    fn scans_xml_dump() {
        let content = r#"
<entry><dbReference type="PubMed" id="33333"/></entry>
<entry><dbReference type="EMBL" id="X01234"/></entry>
<entry><dbReference type="PubMed" id="44444"/></entry>
"#;
        let found = scan_dump(content, DumpFormat::Xml);
        assert_eq!(found, vec!["33333", "44444"]);
    }

    #[test]
    fn scans_rdf_dump() {
        let content = r#"
<citation rdf:resource="http://purl.uniprot.org/citations/55555"/>
<citation rdf:resource="http://purl.uniprot.org/taxonomy/9606"/>
<citation rdf:resource="http://purl.uniprot.org/citations/66666"/>
"#;
        let found = scan_dump(content, DumpFormat::Rdf);
        assert_eq!(found, vec!["55555", "66666"]);
    }

    #[test]
    fn dump_output_is_sorted_and_unique() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("a.sp"),
            "RX   PubMed=99999;\nRX   PubMed=11111;\n",
        )
        .unwrap();
        fs::write(tmp.path().join("b.sp"), "RX   PubMed=11111;\n").unwrap();
        fs::write(tmp.path().join("skip.xml"), "RX   PubMed=77777;\n").unwrap();

        let out = tmp.path().join("pmids.txt");
        run_dump(tmp.path(), "*.sp", DumpFormat::Txt, Some(&out)).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(written, "11111\n99999\n");
    }

    #[test]
    fn missing_dump_folder_is_an_error() {
        let err = run_dump(
            Path::new("/nonexistent/dumps"),
            "*.sp",
            DumpFormat::Txt,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
