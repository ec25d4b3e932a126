//! Error types for tool invocation and the two pipeline stages.
//!
//! [`StageError`] is what a stage hands back to the orchestrator. Its
//! `Display` text is exactly what ends up in an outcome record's `error`
//! field, so the messages are part of the output format.

use std::path::PathBuf;
use std::time::Duration;

/// Failure to obtain a finished process from an external tool.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("process exceeded {0:?} and was killed")]
    Timeout(Duration),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to collect output from {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Terminal failure of the compilation or analysis stage for one program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    /// Compiler exited non-zero. The artifact path is kept even though the
    /// file may be partial or absent.
    #[error("Compilation failed: {diagnostics}")]
    CompilationFailed {
        artifact: PathBuf,
        diagnostics: String,
    },

    #[error("Compilation timeout")]
    CompilationTimeout,

    #[error("Compilation error: {0}")]
    CompilationFault(String),

    /// Analyzer exited non-zero without reporting a finding count.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Analysis timeout")]
    AnalysisTimeout,

    #[error("Analysis error: {0}")]
    AnalysisFault(String),
}

impl StageError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::CompilationTimeout | Self::AnalysisTimeout)
    }

    pub fn is_compilation(&self) -> bool {
        matches!(
            self,
            Self::CompilationFailed { .. } | Self::CompilationTimeout | Self::CompilationFault(_)
        )
    }
}

/// Problems reading an execution override file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read execution config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid execution config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
