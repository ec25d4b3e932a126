//! # Validation Report Module
//!
//! The structured, machine-readable snapshot of a run, written once per run to
//! `validation_results.json` for downstream tooling.
//!
//! ## JSON Output Example
//!
//! ```json
//! {
//!   "total": 2,
//!   "true_positives": 1,
//!   "true_negatives": 0,
//!   "false_positives": 0,
//!   "false_negatives": 0,
//!   "errors": 1,
//!   "results": [
//!     {
//!       "filename": "null_deref_01.c",
//!       "expected_bug": true,
//!       "found_bug": true,
//!       "vuln_count": 1,
//!       "category": "TP",
//!       "error": ""
//!     },
//!     {
//!       "filename": "broken.c",
//!       "expected_bug": true,
//!       "found_bug": false,
//!       "vuln_count": 0,
//!       "category": "ERROR",
//!       "error": "Compilation failed: ..."
//!     }
//!   ]
//! }
//! ```
//!
//! Field names, order and nesting are consumed by other tools and must not
//! change. The snapshot carries no timestamps, so rerunning against an
//! unchanged corpus reproduces it byte for byte.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::MarkerError;
use crate::scorer::CategoryCounts;
use crate::types::{Category, OutcomeRecord};

/// Per-program entry of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEntry {
    pub filename: String,
    pub expected_bug: bool,
    pub found_bug: bool,
    pub vuln_count: usize,
    pub category: Category,
    pub error: String,
}

impl From<&OutcomeRecord> for ResultEntry {
    fn from(record: &OutcomeRecord) -> Self {
        ResultEntry {
            filename: record.filename().to_string(),
            expected_bug: record.expected_bug(),
            found_bug: record.found_bug(),
            vuln_count: record.vuln_count(),
            category: record.category(),
            error: record.error().to_string(),
        }
    }
}

/// Snapshot of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub total: usize,
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub errors: usize,
    pub results: Vec<ResultEntry>,
}

impl ValidationReport {
    /// Builds the snapshot; `results` keeps the order of `records`.
    pub fn build(records: &[OutcomeRecord]) -> Self {
        let counts = CategoryCounts::tally(records);
        ValidationReport {
            total: records.len(),
            true_positives: counts.true_positives,
            true_negatives: counts.true_negatives,
            false_positives: counts.false_positives,
            false_negatives: counts.false_negatives,
            errors: counts.errors,
            results: records.iter().map(ResultEntry::from).collect(),
        }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, MarkerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the snapshot to `path`, replacing any previous run's file.
    pub fn save(&self, path: &Path) -> Result<(), MarkerError> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| MarkerError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(path, json).map_err(|source| MarkerError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("validation report written to {}", path.display());
        Ok(())
    }
}
