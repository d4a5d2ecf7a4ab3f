//! # refwatch
//!
//! Folder watcher and PubMed citation extractor for curated submission
//! pipelines.
//!
//! refwatch surveys a configured set of submission folders, fingerprints
//! every file by content and path, and works out what appeared or vanished
//! since the previous pass. Added files are parsed for their reference
//! blocks: each citation's PubMed identifier is collected, large-scale
//! experiment references are filtered out, and the remainder is partitioned
//! into new versus already-known identifiers. Results go to a pluggable
//! persistence store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Folders │──▶│ Survey        │──▶│ Extract       │
//! │ (flat)  │   │ 2 generations │   │ PMIDs + meta  │
//! └─────────┘   └───────────────┘   └──────┬────────┘
//!                                          │
//!                      ┌───────────────────┤
//!                      ▼                   ▼
//!                 ┌──────────┐       ┌──────────┐
//!                 │   CLI    │       │  Store   │
//!                 │  (rfw)   │       │  trait   │
//!                 └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! rfw folders                   # check the configured folders
//! rfw scan                      # one survey-and-extract cycle
//! rfw scan --dry-run            # same, but never touches the store
//! rfw extract path/to/file.txt  # debug one file
//! rfw pmids dumps/ --glob "*.sp" -o known.txt
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`survey`] | Two-generation folder survey |
//! | [`extract`] | Citation and metadata extraction |
//! | [`curators`] | Curator roster and marker resolution |
//! | [`pmids`] | Known-identifier loader |
//! | [`cycle`] | Cycle orchestration |
//! | [`folders`] | Folder status listing |
//! | [`store`] | Persistence trait and in-memory store |
//! | [`dump`] | Bulk identifier extraction from dumps |

pub mod config;
pub mod curators;
pub mod cycle;
pub mod dump;
pub mod extract;
pub mod folders;
pub mod models;
pub mod pmids;
pub mod store;
pub mod survey;
