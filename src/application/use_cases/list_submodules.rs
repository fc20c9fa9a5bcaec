//! List the linked submodules and their states

use crate::domain::value_objects::command_spec::CommandSpec;
use crate::infrastructure::filesystem::config_store::OperatemConfig;
use crate::infrastructure::git::submodule_status::{parse_status_line, SubmoduleState};
use crate::infrastructure::process::command_executor::{
    CommandExecutorError, CommandRunner, ProcessRunner,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors from listing submodules
#[derive(Debug, Error)]
pub enum ListSubmodulesError {
    /// git rejected the status query
    #[error("git submodule status failed: {0}")]
    Git(String),

    /// git could not be run at all
    #[error(transparent)]
    Executor(#[from] CommandExecutorError),
}

/// One submodule as reported by `git submodule status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleInfo {
    /// Name, relative to the configured submodules root
    pub name: String,
    /// Abbreviated commit id
    pub commit: String,
    /// Working-tree state
    pub state: SubmoduleState,
    /// Subject of the last commit inside the submodule, best effort
    pub last_commit_message: String,
}

/// Wrapper around one `git submodule status` invocation
pub struct ListSubmodulesUseCase {
    runner: Arc<dyn CommandRunner>,
}

impl Default for ListSubmodulesUseCase {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSubmodulesUseCase {
    /// Create a use case backed by real process execution
    pub fn new() -> Self {
        Self::with_runner(Arc::new(ProcessRunner::new()))
    }

    /// Create a use case with a custom command runner
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// List submodules of the repository at `base`.
    ///
    /// Status lines that do not parse are skipped; per-submodule commit
    /// lookups fall back to a placeholder message instead of failing the
    /// listing.
    pub async fn execute(
        &self,
        base: &Path,
        config: &OperatemConfig,
    ) -> Result<Vec<SubmoduleInfo>, ListSubmodulesError> {
        let spec = CommandSpec::new("git", ["submodule", "status"]);
        let output = self.runner.run(&spec, base).await?;

        if !output.success() {
            let detail = output.stderr.trim();
            let message = if detail.is_empty() {
                "Unknown error".to_string()
            } else {
                detail.to_string()
            };
            return Err(ListSubmodulesError::Git(message));
        }

        let mut submodules = Vec::new();
        for line in output.stdout.lines() {
            let Some(entry) = parse_status_line(line) else {
                continue;
            };

            let last_commit_message = self.last_commit_message(&base.join(&entry.path)).await;
            submodules.push(SubmoduleInfo {
                name: entry.name(&config.submodules),
                commit: entry.commit,
                state: entry.state,
                last_commit_message,
            });
        }

        Ok(submodules)
    }

    async fn last_commit_message(&self, submodule_path: &Path) -> String {
        let spec = CommandSpec::new("git", ["log", "-1", "--pretty=format:%s"]);
        match self.runner.run(&spec, submodule_path).await {
            Ok(output) if output.success() && !output.stdout.trim().is_empty() => {
                output.stdout.trim().to_string()
            }
            _ => "No commit message".to_string(),
        }
    }
}
