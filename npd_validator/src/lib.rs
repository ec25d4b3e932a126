//! # NPD Validator
//!
//! Validation harness for the `lotus-gvfa` null-pointer-dereference detector.
//! Every `*.c` program of the micro-benchmark corpus is compiled to bitcode,
//! analyzed, and its verdict compared with ground truth inferred from the
//! program's name and source. The run ends with a console summary and a JSON
//! snapshot at `<output_dir>/validation_results.json`.
//!
//! The exit code is 0 only when every program was classified TP or TN.

pub mod corpus;
pub mod error;
pub mod pipeline;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use code_runner::ExecutionConfig;
use common::HarnessConfig;
use log::{error, info};
use marker::console::{SEPARATOR, write_summary};
use marker::{OutcomeRecord, Scorecard, ValidationReport, compute_scorecard};

pub use corpus::{CorpusEntry, discover};
pub use error::HarnessError;
pub use pipeline::Validator;

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub records: Vec<OutcomeRecord>,
    pub scorecard: Scorecard,
    pub report_path: PathBuf,
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        if self.scorecard.all_correct() { 0 } else { 1 }
    }
}

/// Process exit code for a run's result.
pub fn exit_code(result: &Result<RunOutcome, HarnessError>) -> u8 {
    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(_) => 1,
    }
}

/// Stage settings for a run: the optional `EXECUTION_CONFIG` file, with the
/// harness' compiler, analyzer and output directory applied on top.
pub fn execution_config(config: &HarnessConfig) -> Result<ExecutionConfig, HarnessError> {
    let base = match &config.execution_config {
        Some(path) => ExecutionConfig::load(path)?,
        None => ExecutionConfig::default(),
    };
    Ok(base
        .with_compiler(config.compiler.clone())
        .with_analyzer(&config.analyzer_path)
        .with_output_dir(&config.output_dir))
}

/// Runs the whole validation and writes the console report to `out`.
pub async fn run<W: Write>(config: &HarnessConfig, out: &mut W) -> Result<RunOutcome, HarnessError> {
    if !config.corpus_dir.is_dir() {
        return Err(HarnessError::CorpusNotFound(config.corpus_dir.clone()));
    }
    if !config.analyzer_path.exists() {
        return Err(HarnessError::AnalyzerNotFound(config.analyzer_path.clone()));
    }

    let exec = execution_config(config)?;
    fs::create_dir_all(&config.output_dir).map_err(|source| HarnessError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;

    writeln!(out, "Running NPD validation on {}", config.corpus_dir.display())?;
    writeln!(out, "Using compiler: {}", config.compiler)?;
    writeln!(out, "Using analyzer: {}", config.analyzer_path.display())?;
    writeln!(out, "Output directory: {}", config.output_dir.display())?;

    let entries = discover(&config.corpus_dir)?;
    writeln!(out, "Found {} test files\n{SEPARATOR}", entries.len())?;
    info!(
        "validating {} programs with up to {} in parallel",
        entries.len(),
        config.max_concurrent
    );

    let validator = Validator::from_config(exec, config.max_concurrent);
    let records = validator.validate_all(&entries, out).await?;

    let scorecard = compute_scorecard(&records);
    write_summary(out, &records, &scorecard)?;

    let report_path = config.results_path();
    ValidationReport::build(&records).save(&report_path)?;
    writeln!(out, "\nResults saved to: {}", report_path.display())?;

    Ok(RunOutcome {
        records,
        scorecard,
        report_path,
    })
}

/// Console rendering of a run-level failure.
pub fn report_failure<W: Write>(err: &HarnessError, out: &mut W) -> std::io::Result<()> {
    error!("{err}");
    writeln!(out, "Error: {err}")?;
    match err {
        HarnessError::AnalyzerNotFound(_) => writeln!(out, "Please build the project first.")?,
        HarnessError::EmptyCorpus(_) => {
            writeln!(out, "No results to report.")?;
            write_summary(out, &[], &compute_scorecard(&[]))?;
        }
        _ => {}
    }
    Ok(())
}
