//! Stage traits.
//!
//! The orchestrator talks to the compiler and analyzer only through these
//! traits, so tests can substitute in-process stubs for the real tools.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::StageError;

/// Turns a source program into the analyzer's input artifact.
#[async_trait]
pub trait Compile: Send + Sync {
    /// Returns the artifact path, or a compilation-class [`StageError`].
    async fn compile(&self, source: &Path) -> Result<PathBuf, StageError>;
}

/// Runs the detector over a compiled artifact.
#[async_trait]
pub trait Analyze: Send + Sync {
    /// Returns the number of findings, or an analysis-class [`StageError`].
    async fn analyze(&self, artifact: &Path) -> Result<usize, StageError>;
}
