use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::{process::Command, time::timeout};

use crate::error::InvocationError;

/// Captured result of a finished external process.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Stdout followed by stderr, the order the analyzer's report is scanned in.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }

    pub fn exit_code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }
}

/// Runs `program` with `args`, capturing both streams, and kills it if it is
/// still running after `limit`.
///
/// The child is spawned with `kill_on_drop`, so whichever way this future
/// ends (completion, timeout, or the caller dropping it) the process does not
/// outlive it.
pub async fn run_with_timeout<P, I, A>(
    program: P,
    args: I,
    limit: Duration,
) -> Result<ToolOutput, InvocationError>
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = A>,
    A: AsRef<OsStr>,
{
    let name = program.as_ref().to_string_lossy().into_owned();

    let child = Command::new(program.as_ref())
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| InvocationError::Spawn {
            program: name.clone(),
            source,
        })?;

    let output = timeout(limit, child.wait_with_output())
        .await
        .map_err(|_| InvocationError::Timeout(limit))?
        .map_err(|source| InvocationError::Wait {
            program: name,
            source,
        })?;

    Ok(ToolOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
