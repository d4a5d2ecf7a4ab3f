//! Curator roster and initials resolution.
//!
//! Submission files carry an internal annotation line naming the curator who
//! touched the entry, e.g. `**ZB   LJB`. The marker format is fixed: `**Z`
//! followed by the section letter, whitespace, and three uppercase initials.
//! Files without a marker, or with initials nobody on the roster owns, are
//! attributed to the unknown-curator sentinel so they still land somewhere
//! visible.

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

use crate::models::Curator;

/// Initials of the unknown-curator sentinel.
pub const FALLBACK_INITIALS: &str = "XYZ";

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*Z[ABC] +([A-Z]{3})").unwrap())
}

/// Find the first curator marker in file content and return its initials.
pub fn find_curator_initials(content: &str) -> Option<&str> {
    marker_regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Roster of known curators keyed by initials.
///
/// The fallback entry always exists: when the configured roster does not
/// define [`FALLBACK_INITIALS`], a sentinel is synthesized at construction.
/// Lookup failures never escalate past a warning; a roster that fails to
/// load at all is a configuration error handled long before this point.
pub struct CuratorDirectory {
    by_initials: HashMap<String, Curator>,
    fallback: Curator,
}

impl CuratorDirectory {
    pub fn new(roster: Vec<Curator>) -> Self {
        let mut by_initials: HashMap<String, Curator> = roster
            .into_iter()
            .map(|curator| (curator.initials.clone(), curator))
            .collect();
        let fallback = by_initials
            .get(FALLBACK_INITIALS)
            .cloned()
            .unwrap_or_else(|| Curator {
                surname: "unknown curator".to_string(),
                given_name: String::new(),
                initials: FALLBACK_INITIALS.to_string(),
                checker: false,
            });
        by_initials.insert(FALLBACK_INITIALS.to_string(), fallback.clone());
        Self {
            by_initials,
            fallback,
        }
    }

    /// Resolve initials found in the file at `path` to a roster entry.
    ///
    /// `None` or unknown initials resolve to the fallback, with a warning
    /// naming the file.
    pub fn resolve(&self, initials: Option<&str>, path: &Path) -> &Curator {
        match initials {
            Some(found) => match self.by_initials.get(found) {
                Some(curator) => curator,
                None => {
                    warn!(path = %path.display(), initials = found, "unknown curator initials, assigning fallback");
                    &self.fallback
                }
            },
            None => {
                warn!(path = %path.display(), "no curator marker found, assigning fallback");
                &self.fallback
            }
        }
    }

    pub fn fallback(&self) -> &Curator {
        &self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn roster() -> Vec<Curator> {
        vec![
            Curator {
                surname: "Bauer".to_string(),
                given_name: "Lisa".to_string(),
                initials: "LJB".to_string(),
                checker: true,
            },
            Curator {
                surname: "Okafor".to_string(),
                given_name: "Chidi".to_string(),
                initials: "CNO".to_string(),
                checker: false,
            },
        ]
    }

    #[test]
    fn finds_marker_initials() {
        let content = "ID   TEST\n**ZB   LJB\nSQ   SEQUENCE\n";
        assert_eq!(find_curator_initials(content), Some("LJB"));
    }

    #[test]
    fn accepts_all_section_letters() {
        assert_eq!(find_curator_initials("**ZA CNO"), Some("CNO"));
        assert_eq!(find_curator_initials("**ZC CNO"), Some("CNO"));
        assert_eq!(find_curator_initials("**ZD CNO"), None);
    }

    #[test]
    fn ignores_lowercase_or_short_initials() {
        assert_eq!(find_curator_initials("**ZB   ljb"), None);
        assert_eq!(find_curator_initials("**ZB   LJ"), None);
    }

    #[test]
    fn resolves_known_initials() {
        let directory = CuratorDirectory::new(roster());
        let path = PathBuf::from("/qa/new/a.txt");
        let curator = directory.resolve(Some("LJB"), &path);
        assert_eq!(curator.surname, "Bauer");
    }

    #[test]
    fn unknown_initials_fall_back() {
        let directory = CuratorDirectory::new(roster());
        let path = PathBuf::from("/qa/new/a.txt");
        let curator = directory.resolve(Some("ZZZ"), &path);
        assert_eq!(curator.initials, FALLBACK_INITIALS);
    }

    #[test]
    fn missing_marker_falls_back() {
        let directory = CuratorDirectory::new(roster());
        let path = PathBuf::from("/qa/new/a.txt");
        let curator = directory.resolve(None, &path);
        assert_eq!(curator.initials, FALLBACK_INITIALS);
        assert_eq!(curator.surname, "unknown curator");
    }

    #[test]
    fn configured_fallback_entry_is_kept() {
        let mut entries = roster();
        entries.push(Curator {
            surname: "Poubelle".to_string(),
            given_name: String::new(),
            initials: FALLBACK_INITIALS.to_string(),
            checker: false,
        });
        let directory = CuratorDirectory::new(entries);
        assert_eq!(directory.fallback().surname, "Poubelle");
        let path = PathBuf::from("/qa/new/a.txt");
        assert_eq!(
            directory.resolve(Some(FALLBACK_INITIALS), &path).surname,
            "Poubelle"
        );
    }
}
