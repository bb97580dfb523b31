//! Builder for executing the encoder with timeout support.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use lamekit_core::config::DEFAULT_TIMEOUT;
use lamekit_core::{Error, Result};
use tokio::process::Command;

use crate::args;

/// Output captured from a finished process.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A builder for constructing and executing an external tool invocation.
///
/// Arguments go straight to the process; no shell parses them.
///
/// # Example
///
/// ```no_run
/// use lamekit_exec::ToolCommand;
/// use std::path::PathBuf;
///
/// # async fn example() -> lamekit_core::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("/tmp/lame-abc123"))
///     .arg("-V2")
///     .arg("/music/in.wav")
///     .arg("/music/out.mp3")
///     .execute()
///     .await?;
/// println!("{}", output.stderr);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<OsString>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<OsString>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    /// The program this command runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Shell-quoted single-line form of this command.
    pub fn render(&self) -> String {
        args::render(&self.program, &self.args)
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// A non-zero exit status is not an error; it is reported in
    /// [`ToolOutput::status`] for the caller to weigh.
    ///
    /// # Errors
    ///
    /// - Returns [`Error::Execution`] if spawning the process fails.
    /// - Returns [`Error::Execution`] if waiting on the process fails.
    /// - Returns [`Error::Execution`] if the process times out (message
    ///   includes the timeout duration). The process is killed.
    pub async fn execute(&self) -> Result<ToolOutput> {
        let program_name = self
            .program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string());

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // Dropping the wait future on timeout must take the child with it.
        cmd.kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| Error::execution(&program_name, format!("failed to spawn: {e}")))?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output()).await;

        match result {
            Ok(Ok(output)) => {
                let tool_output = ToolOutput {
                    status: output.status,
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };

                if !output.status.success() {
                    tracing::debug!(
                        "{program_name} exited with status {}",
                        output.status
                    );
                }

                Ok(tool_output)
            }
            Ok(Err(e)) => Err(Error::execution(
                program_name,
                format!("I/O error waiting for process: {e}"),
            )),
            Err(_elapsed) => Err(Error::execution(
                program_name,
                format!("timed out after {:?}", self.timeout),
            )),
        }
    }
}
