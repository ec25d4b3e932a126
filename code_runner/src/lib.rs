//! # Code Runner
//!
//! Drives the two external tools of a validation run: the compiler that turns
//! a test program into bitcode, and the analyzer that reports findings on it.
//! Each invocation is bounded by its own timeout and every failure is
//! returned as a [`StageError`]; nothing panics or escapes past a stage.

pub mod analysis;
pub mod compile;
pub mod error;
pub mod execution_config;
pub mod invocation;
pub mod stage;

pub use analysis::ExternalAnalyzer;
pub use compile::ExternalCompiler;
pub use error::{ConfigError, InvocationError, StageError};
pub use execution_config::{ExecutionConfig, VulnType};
pub use invocation::{ToolOutput, run_with_timeout};
pub use stage::{Analyze, Compile};
