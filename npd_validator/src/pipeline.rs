//! Per-program pipeline: ground truth, compile, analyze, record.
//!
//! Programs are independent, so up to `max_concurrent` of them run at once.
//! Results always come back in corpus order regardless of which finishes
//! first.

use std::io::{self, Write};
use std::pin::pin;
use std::sync::Arc;

use code_runner::{Analyze, Compile, ExecutionConfig, ExternalAnalyzer, ExternalCompiler, StageError};
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use marker::console::progress_line;
use marker::{OutcomeRecord, infer_expectation};

use crate::corpus::CorpusEntry;

const COMPILE_STAGE: &str = "COMPILE";
const ANALYSIS_STAGE: &str = "ANALYSIS";

/// A finished program together with the stage that stopped it, if any.
struct ProgramRun {
    record: OutcomeRecord,
    failed_stage: Option<&'static str>,
}

impl ProgramRun {
    fn failed(entry: &CorpusEntry, expected_bug: bool, stage: &'static str, err: StageError) -> Self {
        warn!("{}: {} stage failed: {}", entry.filename(), stage.to_lowercase(), err);
        Self {
            record: OutcomeRecord::failed(entry.filename(), expected_bug, err.to_string()),
            failed_stage: Some(stage),
        }
    }
}

pub struct Validator {
    compiler: Arc<dyn Compile>,
    analyzer: Arc<dyn Analyze>,
    max_concurrent: usize,
}

impl Validator {
    pub fn new(compiler: Arc<dyn Compile>, analyzer: Arc<dyn Analyze>, max_concurrent: usize) -> Self {
        Self {
            compiler,
            analyzer,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Validator backed by the real compiler and analyzer binaries.
    pub fn from_config(config: ExecutionConfig, max_concurrent: usize) -> Self {
        Self::new(
            Arc::new(ExternalCompiler::new(config.clone())),
            Arc::new(ExternalAnalyzer::new(config)),
            max_concurrent,
        )
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    async fn run_program(&self, entry: &CorpusEntry) -> ProgramRun {
        let expectation = infer_expectation(entry.filename(), entry.source());
        debug!(
            "{}: expected_bug={} ({})",
            entry.filename(),
            expectation.expected_bug,
            expectation.rule
        );
        let expected_bug = expectation.expected_bug;

        let artifact = match self.compiler.compile(entry.path()).await {
            Ok(artifact) => artifact,
            Err(err) => return ProgramRun::failed(entry, expected_bug, COMPILE_STAGE, err),
        };

        let vuln_count = match self.analyzer.analyze(&artifact).await {
            Ok(count) => count,
            Err(err) => return ProgramRun::failed(entry, expected_bug, ANALYSIS_STAGE, err),
        };

        ProgramRun {
            record: OutcomeRecord::verdict(entry.filename(), expected_bug, vuln_count),
            failed_stage: None,
        }
    }

    /// Runs one program through the pipeline. Never fails: stage failures
    /// become an ERROR record.
    pub async fn validate_single(&self, entry: &CorpusEntry) -> OutcomeRecord {
        self.run_program(entry).await.record
    }

    /// Runs every program and writes one progress line per program to
    /// `progress`, in corpus order.
    pub async fn validate_all<W: Write>(
        &self,
        entries: &[CorpusEntry],
        progress: &mut W,
    ) -> io::Result<Vec<OutcomeRecord>> {
        let mut runs = pin!(
            stream::iter(entries)
                .map(|entry| self.run_program(entry))
                .buffered(self.max_concurrent)
        );

        let mut records = Vec::with_capacity(entries.len());
        while let Some(run) = runs.next().await {
            writeln!(progress, "{}", progress_line(&run.record, run.failed_stage))?;
            progress.flush()?;
            records.push(run.record);
        }
        Ok(records)
    }
}
