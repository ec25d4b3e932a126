use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, path::PathBuf, time::Duration};

use crate::error::ConfigError;

/// Defect classes understood by the analyzer's `--vuln-type` switch.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VulnType {
    #[default]
    NullPointer,
    UseAfterFree,
    Uninitialized,
    FreeNonHeap,
    StackAddress,
}

impl VulnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VulnType::NullPointer => "nullpointer",
            VulnType::UseAfterFree => "useafterfree",
            VulnType::Uninitialized => "uninitialized",
            VulnType::FreeNonHeap => "freenonheap",
            VulnType::StackAddress => "stackaddress",
        }
    }
}

impl fmt::Display for VulnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the external compiler and analyzer are invoked.
///
/// Every field has a default, so a JSON override file only needs to name the
/// values it changes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExecutionConfig {
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Flags placed before `<source> -o <artifact>`.
    #[serde(default = "default_compiler_flags")]
    pub compiler_flags: Vec<String>,

    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,

    #[serde(default = "default_analyzer")]
    pub analyzer: PathBuf,

    #[serde(default)]
    pub vuln_type: VulnType,

    /// Extra analyzer switches (e.g. `--use-npa`, `--ctx`), placed before the artifact.
    #[serde(default)]
    pub analyzer_args: Vec<String>,

    #[serde(default = "default_compile_timeout_secs")]
    pub compile_timeout_secs: u64,

    #[serde(default = "default_analysis_timeout_secs")]
    pub analysis_timeout_secs: u64,

    /// Run-wide directory for intermediate artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            compiler: default_compiler(),
            compiler_flags: default_compiler_flags(),
            artifact_extension: default_artifact_extension(),
            analyzer: default_analyzer(),
            vuln_type: VulnType::default(),
            analyzer_args: Vec::new(),
            compile_timeout_secs: default_compile_timeout_secs(),
            analysis_timeout_secs: default_analysis_timeout_secs(),
            output_dir: default_output_dir(),
        }
    }
}

impl ExecutionConfig {
    /// Reads overrides from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    pub fn with_analyzer(mut self, analyzer: impl Into<PathBuf>) -> Self {
        self.analyzer = analyzer.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn compile_timeout(&self) -> Duration {
        Duration::from_secs(self.compile_timeout_secs)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    /// Deterministic artifact location: `<output_dir>/<stem>.<ext>`.
    pub fn artifact_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "program".to_string());
        self.output_dir
            .join(format!("{}.{}", stem, self.artifact_extension))
    }
}

fn default_compiler() -> String {
    "clang".to_string()
}

fn default_compiler_flags() -> Vec<String> {
    ["-emit-llvm", "-c", "-g", "-O0"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_artifact_extension() -> String {
    "bc".to_string()
}

fn default_analyzer() -> PathBuf {
    PathBuf::from("build/bin/lotus-gvfa")
}

fn default_compile_timeout_secs() -> u64 {
    30
}

fn default_analysis_timeout_secs() -> u64 {
    60
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("npd_validation_results")
}
