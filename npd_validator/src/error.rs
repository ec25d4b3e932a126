//! Run-level failures. Anything here ends the run with exit code 1; failures
//! of a single program never surface as a [`HarnessError`].

use code_runner::ConfigError;
use marker::MarkerError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Benchmark directory not found: {}", .0.display())]
    CorpusNotFound(PathBuf),

    #[error("lotus-gvfa not found: {}", .0.display())]
    AnalyzerNotFound(PathBuf),

    #[error("No .c files found in {}", .0.display())]
    EmptyCorpus(PathBuf),

    #[error("failed to read corpus {}: {source}", path.display())]
    Corpus {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] MarkerError),

    #[error("failed to write console report: {0}")]
    Console(#[from] io::Error),
}
