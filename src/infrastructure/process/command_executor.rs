//! External process spawning and output capture

use crate::domain::value_objects::command_spec::CommandSpec;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Command executor errors
#[derive(Debug, Error)]
pub enum CommandExecutorError {
    /// The external program could not be started at all
    #[error("failed to spawn '{program}': {source}")]
    SpawnFailed {
        /// Program that failed to start
        program: String,
        /// Underlying io error
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the running process failed
    #[error("process error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Captured outcome of one completed external process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code (-1 when terminated by a signal)
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Seam between the execution engine and real process spawning.
///
/// The production implementation is [`ProcessRunner`]; tests substitute
/// their own implementations to control timing and outcomes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `spec` with `cwd` as the working directory and capture its
    /// output, waiting for the process to exit. No timeout is imposed.
    async fn run(&self, spec: &CommandSpec, cwd: &Path)
        -> Result<ProcessOutput, CommandExecutorError>;
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
        cwd: &Path,
    ) -> Result<ProcessOutput, CommandExecutorError> {
        tracing::debug!(command = %spec, cwd = %cwd.display(), "spawning process");

        let output = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| CommandExecutorError::SpawnFailed {
                program: spec.program.clone(),
                source,
            })?;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
