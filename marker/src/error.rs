//! Marker Error Types
//!
//! Failures that can occur while persisting a validation report.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    /// The report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The report file (or its directory) could not be written.
    #[error("failed to write report to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
