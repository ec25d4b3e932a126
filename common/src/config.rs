//! Harness configuration.
//!
//! [`HarnessConfig`] collects every path and knob the validation run needs.
//! Values come from `.env` (via `dotenvy`) and the process environment; every
//! path falls back to a fixed offset from the harness root, so a checkout with
//! the usual `benchmarks/` and `build/` layout needs no configuration at all.
//!
//! | Variable           | Default                                |
//! |--------------------|----------------------------------------|
//! | `HARNESS_ROOT`     | workspace root                         |
//! | `BENCHMARK_DIR`    | `<root>/benchmarks/micro/npd`          |
//! | `LOTUS_GVFA`       | `<root>/build/bin/lotus-gvfa`          |
//! | `OUTPUT_DIR`       | `<root>/npd_validation_results`        |
//! | `CLANG`            | `clang`                                |
//! | `MAX_CONCURRENT`   | `1`                                    |
//! | `LOG_LEVEL`        | `info`                                 |
//! | `LOG_FILE`         | unset                                  |
//! | `EXECUTION_CONFIG` | unset                                  |

use std::env;
use std::path::{Path, PathBuf};

pub const CORPUS_OFFSET: &str = "benchmarks/micro/npd";
pub const ANALYZER_OFFSET: &str = "build/bin/lotus-gvfa";
pub const OUTPUT_OFFSET: &str = "npd_validation_results";
pub const RESULTS_FILE: &str = "validation_results.json";

/// Runtime configuration for one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub project_name: String,
    pub root: PathBuf,
    pub corpus_dir: PathBuf,
    pub analyzer_path: PathBuf,
    pub output_dir: PathBuf,
    pub compiler: String,
    pub max_concurrent: usize,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Optional JSON file with execution overrides (timeouts, flags, defect class).
    pub execution_config: Option<PathBuf>,
}

impl HarnessConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Unparseable `MAX_CONCURRENT` falls
    /// back to sequential processing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let root = var("HARNESS_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(default_root);

        let mut config = Self::for_root(root);

        if let Some(dir) = var("BENCHMARK_DIR") {
            config.corpus_dir = PathBuf::from(dir);
        }
        if let Some(path) = var("LOTUS_GVFA") {
            config.analyzer_path = PathBuf::from(path);
        }
        if let Some(dir) = var("OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(clang) = var("CLANG") {
            config.compiler = clang;
        }
        if let Some(level) = var("LOG_LEVEL") {
            config.log_level = level;
        }
        config.max_concurrent = var("MAX_CONCURRENT")
            .and_then(|n| n.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1);
        config.log_file = var("LOG_FILE").map(PathBuf::from);
        config.execution_config = var("EXECUTION_CONFIG").map(PathBuf::from);

        config
    }

    /// Default configuration with every path anchored at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            project_name: "npd-validator".into(),
            corpus_dir: root.join(CORPUS_OFFSET),
            analyzer_path: root.join(ANALYZER_OFFSET),
            output_dir: root.join(OUTPUT_OFFSET),
            root,
            compiler: "clang".into(),
            max_concurrent: 1,
            log_level: "info".into(),
            log_file: None,
            execution_config: None,
        }
    }

    /// Where the structured snapshot is written.
    pub fn results_path(&self) -> PathBuf {
        self.output_dir.join(RESULTS_FILE)
    }
}

/// The workspace root this harness was built from.
fn default_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
