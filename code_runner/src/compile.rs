use async_trait::async_trait;
use log::{debug, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{InvocationError, StageError};
use crate::execution_config::ExecutionConfig;
use crate::invocation::run_with_timeout;
use crate::stage::Compile;

/// Compiles programs with the configured external compiler into
/// debug-annotated, unoptimized bitcode under the run's output directory.
#[derive(Debug, Clone)]
pub struct ExternalCompiler {
    config: ExecutionConfig,
}

impl ExternalCompiler {
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    /// Full argument list for one program: `<flags> <source> -o <artifact>`.
    pub fn command_args(&self, source: &Path, artifact: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self
            .config
            .compiler_flags
            .iter()
            .map(OsString::from)
            .collect();
        args.push(source.as_os_str().to_owned());
        args.push(OsString::from("-o"));
        args.push(artifact.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl Compile for ExternalCompiler {
    async fn compile(&self, source: &Path) -> Result<PathBuf, StageError> {
        let artifact = self.config.artifact_path(source);
        let args = self.command_args(source, &artifact);
        debug!("compiling {} -> {}", source.display(), artifact.display());

        match run_with_timeout(&self.config.compiler, &args, self.config.compile_timeout()).await {
            Ok(output) if output.success() => Ok(artifact),
            Ok(output) => {
                warn!(
                    "{} exited with code {} for {}",
                    self.config.compiler,
                    output.exit_code(),
                    source.display()
                );
                Err(StageError::CompilationFailed {
                    artifact,
                    diagnostics: output.stderr,
                })
            }
            Err(InvocationError::Timeout(limit)) => {
                warn!("compilation of {} timed out after {:?}", source.display(), limit);
                Err(StageError::CompilationTimeout)
            }
            Err(err) => {
                warn!("could not run compiler for {}: {}", source.display(), err);
                Err(StageError::CompilationFault(err.to_string()))
            }
        }
    }
}
