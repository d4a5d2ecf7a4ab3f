use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::models::Curator;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub survey: SurveyConfig,
    pub known_pmids: KnownPmidsConfig,
    #[serde(default)]
    pub curators: Vec<Curator>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SurveyConfig {
    /// Folders surveyed each cycle, in order. Listing is non-recursive.
    pub folders: Vec<PathBuf>,
    #[serde(default = "default_resubmission_marker")]
    pub resubmission_marker: String,
}

fn default_resubmission_marker() -> String {
    "resub".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnownPmidsConfig {
    /// File with one already-known PubMed identifier per line.
    pub path: PathBuf,
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: i64,
}

fn default_max_age_hours() -> i64 {
    24
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Relative paths in the file are resolved against its own directory.
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for folder in &mut config.survey.folders {
        if folder.is_relative() {
            *folder = base.join(&*folder);
        }
    }
    if config.known_pmids.path.is_relative() {
        config.known_pmids.path = base.join(&config.known_pmids.path);
    }

    // Validate survey
    if config.survey.folders.is_empty() {
        anyhow::bail!("survey.folders must list at least one folder");
    }
    if config.survey.resubmission_marker.is_empty() {
        anyhow::bail!("survey.resubmission_marker must not be empty");
    }

    // Validate known_pmids
    if config.known_pmids.max_age_hours < 1 {
        anyhow::bail!("known_pmids.max_age_hours must be >= 1");
    }

    // Validate curators
    let mut seen = HashSet::new();
    for curator in &config.curators {
        if curator.initials.len() != 3 || !curator.initials.chars().all(|c| c.is_ascii_uppercase())
        {
            anyhow::bail!(
                "Curator initials must be three uppercase letters: '{}'",
                curator.initials
            );
        }
        if !seen.insert(curator.initials.as_str()) {
            anyhow::bail!("Duplicate curator initials: '{}'", curator.initials);
        }
    }

    Ok(config)
}
