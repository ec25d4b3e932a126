//! # Marker Library
//!
//! Marks an analyzer's verdicts against ground truth.
//!
//! ## Key Concepts
//! - **Ground truth** ([`ground_truth`]): whether a test program is expected to contain the defect.
//! - **Outcome records** ([`types`]): one per program, classified as TP, TN, FP, FN or ERROR.
//! - **Scorecard** ([`scorer`]): category counts plus precision, recall and F1.
//! - **Reports**: a console summary ([`console`]) and a JSON snapshot ([`report`]).

pub mod console;
pub mod error;
pub mod ground_truth;
pub mod report;
pub mod scorer;
pub mod types;

pub use error::MarkerError;
pub use ground_truth::{Expectation, Rule, classify_expectation, infer_expectation};
pub use report::ValidationReport;
pub use scorer::{CategoryCounts, Scorecard, compute_scorecard};
pub use types::{Category, OutcomeRecord};
