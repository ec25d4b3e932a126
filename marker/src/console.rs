//! Human-readable rendering of a run: per-file progress lines and the final
//! summary block. Everything here only reads records.

use std::io::{self, Write};

use crate::scorer::Scorecard;
use crate::types::{Category, OutcomeRecord};

pub const SEPARATOR: &str =
    "================================================================================";

const ERROR_EXCERPT_CHARS: usize = 60;
const FILENAME_WIDTH: usize = 50;

/// `Testing <name>... <status>`.
///
/// `failed_stage` names the stage that stopped the pipeline (e.g. `COMPILE`),
/// if any.
pub fn progress_line(record: &OutcomeRecord, failed_stage: Option<&str>) -> String {
    let status = match failed_stage {
        Some(stage) => format!("{} ERROR", stage),
        None if record.is_error() => "ERROR".to_string(),
        None => format!(
            "{} (expected={}, found={}, count={})",
            record.category(),
            record.expected_bug(),
            record.found_bug(),
            record.vuln_count()
        ),
    };
    format!("Testing {}... {}", record.filename(), status)
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

fn one_line_excerpt(text: &str) -> String {
    text.chars()
        .take(ERROR_EXCERPT_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Writes the summary block: totals, breakdown, metrics and the itemized
/// false positives, false negatives and errors.
pub fn write_summary<W: Write>(
    out: &mut W,
    records: &[OutcomeRecord],
    card: &Scorecard,
) -> io::Result<()> {
    writeln!(out, "\n{SEPARATOR}\nVALIDATION SUMMARY\n{SEPARATOR}")?;

    if card.is_empty() {
        writeln!(out, "\nNo data: no test programs were processed.")?;
        writeln!(out, "\n{SEPARATOR}")?;
        return Ok(());
    }

    let counts = &card.counts;
    writeln!(
        out,
        "\nTotal: {} | Correct: {} ({}) | Errors: {}",
        card.total(),
        card.correct(),
        card.accuracy()
            .map(|a| format!("{:.1}%", a * 100.0))
            .unwrap_or_else(|| "n/a".to_string()),
        counts.errors
    )?;
    writeln!(out, "\nBreakdown:")?;
    writeln!(
        out,
        "  TP: {:3}  TN: {:3}  FP: {:3}  FN: {:3}",
        counts.true_positives, counts.true_negatives, counts.false_positives, counts.false_negatives
    )?;
    writeln!(
        out,
        "\nPrecision: {}  Recall: {}  F1: {}",
        percent(card.precision),
        percent(card.recall),
        percent(card.f1)
    )?;

    for (title, category) in [
        ("FALSE POSITIVES", Category::FalsePositive),
        ("FALSE NEGATIVES", Category::FalseNegative),
        ("ERRORS", Category::Error),
    ] {
        let items: Vec<&OutcomeRecord> =
            records.iter().filter(|r| r.category() == category).collect();
        if items.is_empty() {
            continue;
        }
        writeln!(out, "\n{SEPARATOR}\n{title} ({}):\n{SEPARATOR}", items.len())?;
        for record in items {
            let extra = match category {
                Category::FalsePositive => format!(" (count={})", record.vuln_count()),
                Category::Error => format!(" - {}", one_line_excerpt(record.error())),
                _ => String::new(),
            };
            writeln!(
                out,
                "  {:width$}{}",
                record.filename(),
                extra,
                width = FILENAME_WIDTH
            )?;
        }
    }

    writeln!(out, "\n{SEPARATOR}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::compute_scorecard;

    fn render(records: &[OutcomeRecord]) -> String {
        let card = compute_scorecard(records);
        let mut buf = Vec::new();
        write_summary(&mut buf, records, &card).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_progress_lines() {
        let tp = OutcomeRecord::verdict("unsafe_a.c", true, 2);
        assert_eq!(
            progress_line(&tp, None),
            "Testing unsafe_a.c... TP (expected=true, found=true, count=2)"
        );

        let failed = OutcomeRecord::failed("b.c", true, "Compilation timeout");
        assert_eq!(progress_line(&failed, Some("COMPILE")), "Testing b.c... COMPILE ERROR");
        assert_eq!(progress_line(&failed, None), "Testing b.c... ERROR");
    }

    #[test]
    fn test_summary_with_metrics() {
        let mut records = Vec::new();
        records.extend((0..2).map(|i| OutcomeRecord::verdict(format!("tp{i}.c"), true, 1)));
        records.extend((0..3).map(|i| OutcomeRecord::verdict(format!("tn{i}.c"), false, 0)));
        records.push(OutcomeRecord::verdict("fp.c", false, 4));
        records.push(OutcomeRecord::verdict("fn.c", true, 0));

        let text = render(&records);
        assert!(text.contains("VALIDATION SUMMARY"));
        assert!(text.contains("Total: 7 | Correct: 5 (71.4%) | Errors: 0"));
        assert!(text.contains("  TP:   2  TN:   3  FP:   1  FN:   1"));
        assert!(text.contains("Precision: 66.67%  Recall: 66.67%  F1: 66.67%"));
        assert!(text.contains("FALSE POSITIVES (1):"));
        assert!(text.contains("fp.c"));
        assert!(text.contains(" (count=4)"));
        assert!(text.contains("FALSE NEGATIVES (1):"));
        assert!(!text.contains("ERRORS ("));
    }

    #[test]
    fn test_summary_lists_errors_truncated() {
        let long_error = format!("Compilation failed: {}\nmore", "x".repeat(100));
        let records = vec![OutcomeRecord::failed("broken.c", true, long_error)];

        let text = render(&records);
        assert!(text.contains("Total: 1 | Correct: 0 (0.0%) | Errors: 1"));
        assert!(text.contains("Precision: n/a  Recall: n/a  F1: n/a"));
        assert!(text.contains("ERRORS (1):"));
        let line = text.lines().find(|l| l.contains("broken.c")).unwrap();
        let excerpt = line.split(" - ").nth(1).unwrap();
        assert_eq!(excerpt.chars().count(), 60);
        assert!(excerpt.starts_with("Compilation failed: "));
    }

    #[test]
    fn test_summary_no_data() {
        let text = render(&[]);
        assert!(text.contains("No data"));
        assert!(!text.contains("Precision"));
    }
}
