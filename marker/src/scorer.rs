//! # Scorer Module
//!
//! Reduces a run's outcome records into a [`Scorecard`]: per-category counts
//! plus precision, recall and F1.
//!
//! Ratios whose denominator is zero are reported as `None` ("not computable")
//! instead of being forced to 0 or NaN. An empty record set yields a
//! scorecard whose [`Scorecard::is_empty`] is true, which reporters render as
//! "no data".

use crate::types::{Category, OutcomeRecord};

/// Category counts over a set of outcome records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub errors: usize,
}

impl CategoryCounts {
    pub fn tally(records: &[OutcomeRecord]) -> Self {
        records.iter().fold(Self::default(), |mut counts, record| {
            counts.add(record.category());
            counts
        })
    }

    fn add(&mut self, category: Category) {
        match category {
            Category::TruePositive => self.true_positives += 1,
            Category::TrueNegative => self.true_negatives += 1,
            Category::FalsePositive => self.false_positives += 1,
            Category::FalseNegative => self.false_negatives += 1,
            Category::Error => self.errors += 1,
        }
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::TruePositive => self.true_positives,
            Category::TrueNegative => self.true_negatives,
            Category::FalsePositive => self.false_positives,
            Category::FalseNegative => self.false_negatives,
            Category::Error => self.errors,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives
            + self.true_negatives
            + self.false_positives
            + self.false_negatives
            + self.errors
    }

    pub fn correct(&self) -> usize {
        self.true_positives + self.true_negatives
    }
}

/// Aggregate detection quality for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorecard {
    pub counts: CategoryCounts,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1: Option<f64>,
}

impl Scorecard {
    pub fn total(&self) -> usize {
        self.counts.total()
    }

    pub fn correct(&self) -> usize {
        self.counts.correct()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Share of records classified TP or TN, in `[0, 1]`.
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.correct(), self.total())
    }

    /// True iff there is data and every record is TP or TN.
    pub fn all_correct(&self) -> bool {
        !self.is_empty() && self.correct() == self.total()
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

/// F1 is undefined when either input is, or when both are zero.
pub fn f1_score(precision: Option<f64>, recall: Option<f64>) -> Option<f64> {
    let (p, r) = (precision?, recall?);
    (p + r > 0.0).then(|| 2.0 * p * r / (p + r))
}

/// Computes the scorecard for a run.
///
/// # Example
///
/// ```
/// use marker::scorer::compute_scorecard;
/// use marker::types::OutcomeRecord;
///
/// let records = vec![
///     OutcomeRecord::verdict("unsafe_a.c", true, 1),
///     OutcomeRecord::verdict("safe_b.c", false, 2),
/// ];
/// let card = compute_scorecard(&records);
/// assert_eq!(card.precision, Some(0.5));
/// assert_eq!(card.recall, Some(1.0));
///
/// assert!(compute_scorecard(&[]).is_empty());
/// ```
pub fn compute_scorecard(records: &[OutcomeRecord]) -> Scorecard {
    let counts = CategoryCounts::tally(records);
    let tp = counts.true_positives;
    let precision = ratio(tp, tp + counts.false_positives);
    let recall = ratio(tp, tp + counts.false_negatives);

    Scorecard {
        counts,
        precision,
        recall,
        f1: f1_score(precision, recall),
    }
}
