use async_trait::async_trait;
use log::{debug, warn};
use std::ffi::OsString;
use std::path::Path;

use crate::error::{InvocationError, StageError};
use crate::execution_config::ExecutionConfig;
use crate::invocation::run_with_timeout;
use crate::stage::Analyze;

const COUNT_KEYWORD: &str = "Found";
const COUNT_PHRASE: &str = "potential vulnerabilities";
const STDERR_EXCERPT_CHARS: usize = 200;

/// Parses the count out of one report line, e.g.
/// `Found 3 potential vulnerabilities.` → `Some(3)`.
///
/// Returns `None` for lines that are not count lines or whose count does not
/// parse.
pub fn parse_count_line(line: &str) -> Option<usize> {
    if !line.contains(COUNT_PHRASE) {
        return None;
    }
    let (_, rest) = line.split_once(COUNT_KEYWORD)?;
    rest.split_whitespace().next()?.parse().ok()
}

/// Scans analyzer output for count lines. The last parseable one wins;
/// malformed count lines leave the running value untouched.
pub fn scan_finding_count(output: &str) -> usize {
    output
        .lines()
        .fold(0, |count, line| parse_count_line(line).unwrap_or(count))
}

fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Runs the external analyzer for one defect class.
#[derive(Debug, Clone)]
pub struct ExternalAnalyzer {
    config: ExecutionConfig,
}

impl ExternalAnalyzer {
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    /// `--vuln-type=<class> [extra args...] <artifact>`
    pub fn command_args(&self, artifact: &Path) -> Vec<OsString> {
        let mut args = vec![OsString::from(format!(
            "--vuln-type={}",
            self.config.vuln_type
        ))];
        args.extend(self.config.analyzer_args.iter().map(OsString::from));
        args.push(artifact.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl Analyze for ExternalAnalyzer {
    async fn analyze(&self, artifact: &Path) -> Result<usize, StageError> {
        let args = self.command_args(artifact);
        debug!("analyzing {}", artifact.display());

        match run_with_timeout(&self.config.analyzer, &args, self.config.analysis_timeout()).await {
            Ok(output) => {
                let count = scan_finding_count(&output.combined());
                if !output.success() && count == 0 {
                    warn!(
                        "analyzer exited with code {} for {} without a finding count",
                        output.exit_code(),
                        artifact.display()
                    );
                    return Err(StageError::AnalysisFailed(excerpt(
                        &output.stderr,
                        STDERR_EXCERPT_CHARS,
                    )));
                }
                if !output.success() {
                    debug!(
                        "analyzer exited with code {} but reported {} findings",
                        output.exit_code(),
                        count
                    );
                }
                Ok(count)
            }
            Err(InvocationError::Timeout(limit)) => {
                warn!("analysis of {} timed out after {:?}", artifact.display(), limit);
                Err(StageError::AnalysisTimeout)
            }
            Err(err) => {
                warn!("could not run analyzer on {}: {}", artifact.display(), err);
                Err(StageError::AnalysisFault(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution_config::VulnType;

    #[test]
    fn test_parse_count_line() {
        assert_eq!(parse_count_line("Found 3 potential vulnerabilities."), Some(3));
        assert_eq!(parse_count_line("[gvfa] Found 12 potential vulnerabilities"), Some(12));
        assert_eq!(parse_count_line("Found 0 potential vulnerabilities."), Some(0));
        assert_eq!(parse_count_line("Found many potential vulnerabilities."), None);
        assert_eq!(parse_count_line("Found 3 sources"), None);
        assert_eq!(parse_count_line("3 potential vulnerabilities"), None);
    }

    #[test]
    fn test_scan_keeps_last_valid_count() {
        let output = "\
Building value-flow graph...
Found 2 potential vulnerabilities.
Found ?? potential vulnerabilities.
done
";
        assert_eq!(scan_finding_count(output), 2);

        let output = "Found 1 potential vulnerabilities.\nFound 4 potential vulnerabilities.\n";
        assert_eq!(scan_finding_count(output), 4);
    }

    #[test]
    fn test_scan_without_count_line() {
        assert_eq!(scan_finding_count(""), 0);
        assert_eq!(scan_finding_count("no issues\n"), 0);
    }

    #[test]
    fn test_excerpt_counts_chars() {
        let long = "é".repeat(300);
        assert_eq!(excerpt(&long, 200).chars().count(), 200);
        assert_eq!(excerpt("short", 200), "short");
    }

    #[test]
    fn test_command_args() {
        let mut config = ExecutionConfig::default();
        config.vuln_type = VulnType::UseAfterFree;
        config.analyzer_args = vec!["--use-npa".into()];
        let analyzer = ExternalAnalyzer::new(config);
        let args: Vec<String> = analyzer
            .command_args(Path::new("/out/a.bc"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, vec!["--vuln-type=useafterfree", "--use-npa", "/out/a.bc"]);
    }
}
