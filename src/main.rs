//! # refwatch CLI (`rfw`)
//!
//! The `rfw` binary is the operator interface for refwatch. It provides
//! commands for inspecting the configured submission folders, running a
//! survey-and-extract cycle, debugging the extractor on a single file, and
//! mining reference-database dumps for identifiers.
//!
//! ## Usage
//!
//! ```bash
//! rfw --config ./config/refwatch.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rfw folders` | List configured survey folders and their status |
//! | `rfw scan` | Run one survey-and-extract cycle and print a summary |
//! | `rfw extract <file>` | Run the extractor on one file (debugging aid) |
//! | `rfw pmids <dir>` | Bulk-extract PubMed identifiers from dump files |
//!
//! ## Examples
//!
//! ```bash
//! # Verify the configuration before anything else
//! rfw folders --config ./config/refwatch.toml
//!
//! # Preview what a cycle would pick up
//! rfw scan --dry-run
//!
//! # Inspect a single submission file
//! rfw extract /nfs/qa/new/P0DTC2.txt
//!
//! # Seed the known-identifier file from a Swiss-Prot dump
//! rfw pmids /nfs/dumps --glob "*.sp" --format txt -o pmids_in_swissprot.txt
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use refwatch::{config, cycle, dump, extract, folders};

/// refwatch CLI — folder watcher and PubMed citation extractor for curated
/// submission pipelines.
///
/// All commands except `pmids` read a `--config` flag pointing to a TOML
/// configuration file. See `config/refwatch.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "rfw",
    about = "refwatch — folder watcher and PubMed citation extractor for curated submission pipelines",
    version,
    long_about = "refwatch surveys submission folders for added and removed files, parses the \
    reference blocks of everything new, and partitions the PubMed identifiers it finds into new \
    versus already-known citations, filtering out large-scale experiment references along the way."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/refwatch.toml`. Survey folders, the
    /// known-identifier file, and the curator roster are read from this file.
    #[arg(long, global = true, default_value = "./config/refwatch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Run one survey-and-extract cycle.
    ///
    /// Surveys the configured folders, records every added file with its
    /// curator, entry count, and citations, forwards deletions, and prints a
    /// summary. The cycle runs against an in-memory store, so each invocation
    /// reports the folders' full current contents as added.
    Scan {
        /// Survey and extract without writing anything to the store.
        #[arg(long)]
        dry_run: bool,
    },

    /// List configured survey folders and their status.
    ///
    /// Shows each folder from the configuration and whether it currently
    /// exists. Useful for verifying configuration before running a scan.
    Folders,

    /// Run the extractor on a single file.
    ///
    /// Prints the file's metadata record (curator, entry count, resubmission
    /// flag) plus every citation with its new/known partition. Debugging aid.
    Extract {
        /// Path to a submission file.
        file: PathBuf,
    },

    /// Bulk-extract PubMed identifiers from reference-database dumps.
    ///
    /// Scans every file in the folder whose name matches the glob, collects
    /// the unique identifier set, and writes it sorted, one per line. This is
    /// how the known-identifier file consumed by `scan` gets seeded.
    Pmids {
        /// Folder holding the dump files (searched non-recursively).
        dir: PathBuf,

        /// Filename pattern selecting dump files within the folder.
        #[arg(long, default_value = "*.txt")]
        glob: String,

        /// Dump format: `txt`, `xml`, or `rdf`.
        #[arg(long, short = 'f', default_value = "txt")]
        format: String,

        /// Output file; prints to stdout when omitted.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "refwatch=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Pmids {
        dir,
        glob,
        format,
        output,
    } = &cli.command
    {
        let format = dump::DumpFormat::from_str(format)?;
        dump::run_dump(dir, glob, format, output.as_deref())?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Scan { dry_run } => {
            cycle::run_scan(&cfg, dry_run)?;
        }
        Commands::Folders => {
            folders::list_folders(&cfg)?;
        }
        Commands::Extract { file } => {
            extract::run_extract(&cfg, &file)?;
        }
        Commands::Pmids { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
