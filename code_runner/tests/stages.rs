#![cfg(unix)]

use code_runner::{
    Analyze, Compile, ExecutionConfig, ExternalAnalyzer, ExternalCompiler, InvocationError,
    StageError, run_with_timeout,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

/// Writes an executable `#!/bin/sh` stub standing in for an external tool.
fn write_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub tool");
    let mut perms = fs::metadata(&path).expect("stat stub tool").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod stub tool");
    path
}

struct Workspace {
    _dir: TempDir,
    tools: PathBuf,
    out: PathBuf,
    source: PathBuf,
}

fn workspace() -> Workspace {
    let dir = tempdir().unwrap();
    let tools = dir.path().join("tools");
    let out = dir.path().join("out");
    fs::create_dir_all(&tools).unwrap();
    fs::create_dir_all(&out).unwrap();
    let source = dir.path().join("null_deref_01.c");
    fs::write(&source, "int main(void) { int *p = 0; return *p; }\n").unwrap();
    Workspace {
        _dir: dir,
        tools,
        out,
        source,
    }
}

const TOUCH_OUTPUT: &str = r#"while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then shift; : > "$1"; fi
  shift
done"#;

#[tokio::test]
async fn test_run_with_timeout_captures_both_streams() {
    let output = run_with_timeout(
        "sh",
        ["-c", "echo out; echo err >&2; exit 3"],
        Duration::from_secs(10),
    )
    .await
    .expect("sh should run");

    assert!(!output.success());
    assert_eq!(output.exit_code(), 3);
    assert_eq!(output.stdout, "out\n");
    assert_eq!(output.stderr, "err\n");
    assert_eq!(output.combined(), "out\nerr\n");
}

#[tokio::test]
async fn test_run_with_timeout_kills_slow_process() {
    let start = Instant::now();
    let result = run_with_timeout("sh", ["-c", "sleep 30"], Duration::from_millis(300)).await;

    assert!(matches!(result, Err(InvocationError::Timeout(_))));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_run_with_timeout_missing_binary() {
    let result = run_with_timeout(
        "/definitely/not/a/compiler",
        Vec::<String>::new(),
        Duration::from_secs(1),
    )
    .await;

    assert!(matches!(result, Err(InvocationError::Spawn { .. })));
}

#[tokio::test]
async fn test_compile_success_returns_artifact() {
    let ws = workspace();
    let cc = write_tool(&ws.tools, "cc", TOUCH_OUTPUT);
    let compiler = ExternalCompiler::new(
        ExecutionConfig::default()
            .with_compiler(cc.to_string_lossy())
            .with_output_dir(&ws.out),
    );

    let artifact = compiler.compile(&ws.source).await.expect("compile ok");
    assert_eq!(artifact, ws.out.join("null_deref_01.bc"));
    assert!(artifact.exists());
}

#[tokio::test]
async fn test_compile_failure_embeds_diagnostics() {
    let ws = workspace();
    let cc = write_tool(
        &ws.tools,
        "cc",
        "echo 'null_deref_01.c:1:1: error: unknown type name' >&2\nexit 1",
    );
    let compiler = ExternalCompiler::new(
        ExecutionConfig::default()
            .with_compiler(cc.to_string_lossy())
            .with_output_dir(&ws.out),
    );

    let err = compiler.compile(&ws.source).await.unwrap_err();
    match &err {
        StageError::CompilationFailed {
            artifact,
            diagnostics,
        } => {
            assert_eq!(artifact, &ws.out.join("null_deref_01.bc"));
            assert!(diagnostics.contains("unknown type name"));
        }
        other => panic!("expected CompilationFailed, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Compilation failed: "));
}

#[tokio::test]
async fn test_compile_timeout() {
    let ws = workspace();
    let cc = write_tool(&ws.tools, "cc", "sleep 30");
    let mut config = ExecutionConfig::default()
        .with_compiler(cc.to_string_lossy())
        .with_output_dir(&ws.out);
    config.compile_timeout_secs = 1;

    let err = ExternalCompiler::new(config)
        .compile(&ws.source)
        .await
        .unwrap_err();
    assert_eq!(err, StageError::CompilationTimeout);
    assert_eq!(err.to_string(), "Compilation timeout");
}

#[tokio::test]
async fn test_compile_missing_compiler_is_fault() {
    let ws = workspace();
    let compiler = ExternalCompiler::new(
        ExecutionConfig::default()
            .with_compiler("/definitely/not/clang")
            .with_output_dir(&ws.out),
    );

    let err = compiler.compile(&ws.source).await.unwrap_err();
    assert!(matches!(err, StageError::CompilationFault(_)));
    assert!(err.to_string().starts_with("Compilation error: "));
}

fn analyzer_with(ws: &Workspace, body: &str) -> ExternalAnalyzer {
    let tool = write_tool(&ws.tools, "lotus-gvfa", body);
    ExternalAnalyzer::new(
        ExecutionConfig::default()
            .with_analyzer(tool)
            .with_output_dir(&ws.out),
    )
}

#[tokio::test]
async fn test_analyze_reports_count() {
    let ws = workspace();
    let analyzer = analyzer_with(
        &ws,
        r#"[ "$1" = "--vuln-type=nullpointer" ] || exit 9
echo "Running GVFA on $2"
echo "Found 2 potential vulnerabilities.""#,
    );

    let count = analyzer.analyze(&ws.out.join("a.bc")).await.expect("analysis ok");
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_analyze_reads_count_from_stderr() {
    let ws = workspace();
    let analyzer = analyzer_with(&ws, "echo 'Found 1 potential vulnerabilities.' >&2");

    assert_eq!(analyzer.analyze(&ws.out.join("a.bc")).await, Ok(1));
}

#[tokio::test]
async fn test_analyze_zero_findings() {
    let ws = workspace();
    let analyzer = analyzer_with(&ws, "echo 'Found 0 potential vulnerabilities.'");

    assert_eq!(analyzer.analyze(&ws.out.join("a.bc")).await, Ok(0));
}

#[tokio::test]
async fn test_analyze_nonzero_exit_with_count_is_success() {
    let ws = workspace();
    let analyzer = analyzer_with(
        &ws,
        "echo 'Found 3 potential vulnerabilities.'\necho 'warning: stats unavailable' >&2\nexit 2",
    );

    assert_eq!(analyzer.analyze(&ws.out.join("a.bc")).await, Ok(3));
}

#[tokio::test]
async fn test_analyze_nonzero_exit_without_count_is_error() {
    let ws = workspace();
    let analyzer = analyzer_with(&ws, "head -c 300 /dev/zero | tr '\\0' 'x' >&2\nexit 1");

    let err = analyzer.analyze(&ws.out.join("a.bc")).await.unwrap_err();
    match err {
        StageError::AnalysisFailed(excerpt) => {
            assert_eq!(excerpt.len(), 200);
            assert!(excerpt.chars().all(|c| c == 'x'));
        }
        other => panic!("expected AnalysisFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_analyze_malformed_count_is_tolerated() {
    let ws = workspace();
    let analyzer = analyzer_with(
        &ws,
        "echo 'Found 4 potential vulnerabilities.'\necho 'Found lots potential vulnerabilities.'",
    );

    assert_eq!(analyzer.analyze(&ws.out.join("a.bc")).await, Ok(4));
}

#[tokio::test]
async fn test_analyze_timeout() {
    let ws = workspace();
    let tool = write_tool(&ws.tools, "lotus-gvfa", "sleep 30");
    let mut config = ExecutionConfig::default()
        .with_analyzer(tool)
        .with_output_dir(&ws.out);
    config.analysis_timeout_secs = 1;

    let err = ExternalAnalyzer::new(config)
        .analyze(&ws.out.join("a.bc"))
        .await
        .unwrap_err();
    assert_eq!(err, StageError::AnalysisTimeout);
}

#[tokio::test]
async fn test_analyze_missing_binary_is_fault() {
    let ws = workspace();
    let analyzer = ExternalAnalyzer::new(
        ExecutionConfig::default().with_analyzer(ws.tools.join("missing-gvfa")),
    );

    let err = analyzer.analyze(&ws.out.join("a.bc")).await.unwrap_err();
    assert!(matches!(err, StageError::AnalysisFault(_)));
    assert!(err.to_string().starts_with("Analysis error: "));
}
