//! # Types Module
//!
//! Core data structures of a validation run: the five-way [`Category`] an
//! analyzer verdict falls into, and the per-program [`OutcomeRecord`].

use serde::Serialize;
use std::fmt;

/// How one analyzer verdict compares to ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "TP")]
    TruePositive,
    #[serde(rename = "TN")]
    TrueNegative,
    #[serde(rename = "FP")]
    FalsePositive,
    #[serde(rename = "FN")]
    FalseNegative,
    #[serde(rename = "ERROR")]
    Error,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::TruePositive,
        Category::TrueNegative,
        Category::FalsePositive,
        Category::FalseNegative,
        Category::Error,
    ];

    /// Total classification. A non-empty `error` wins over everything else.
    pub fn classify(expected_bug: bool, found_bug: bool, error: &str) -> Self {
        if !error.is_empty() {
            return Category::Error;
        }
        match (expected_bug, found_bug) {
            (true, true) => Category::TruePositive,
            (false, false) => Category::TrueNegative,
            (false, true) => Category::FalsePositive,
            (true, false) => Category::FalseNegative,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::TruePositive => "TP",
            Category::TrueNegative => "TN",
            Category::FalsePositive => "FP",
            Category::FalseNegative => "FN",
            Category::Error => "ERROR",
        }
    }

    /// TP and TN are the only outcomes that count as a pass.
    pub fn is_correct(&self) -> bool {
        matches!(self, Category::TruePositive | Category::TrueNegative)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of running one test program through the pipeline.
///
/// Records are immutable: they can only be built through [`OutcomeRecord::verdict`]
/// or [`OutcomeRecord::failed`], and the category is always derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    filename: String,
    expected_bug: bool,
    vuln_count: usize,
    error: String,
}

impl OutcomeRecord {
    /// A program the analyzer produced a verdict for.
    pub fn verdict(filename: impl Into<String>, expected_bug: bool, vuln_count: usize) -> Self {
        Self {
            filename: filename.into(),
            expected_bug,
            vuln_count,
            error: String::new(),
        }
    }

    /// A program whose pipeline stopped at a failed stage. An empty message is
    /// replaced so the record still classifies as an error.
    pub fn failed(filename: impl Into<String>, expected_bug: bool, error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.is_empty() {
            error.push_str("unknown error");
        }
        Self {
            filename: filename.into(),
            expected_bug,
            vuln_count: 0,
            error,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn expected_bug(&self) -> bool {
        self.expected_bug
    }

    pub fn found_bug(&self) -> bool {
        self.vuln_count > 0
    }

    pub fn vuln_count(&self) -> usize {
        self.vuln_count
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn category(&self) -> Category {
        Category::classify(self.expected_bug, self.found_bug(), &self.error)
    }
}
