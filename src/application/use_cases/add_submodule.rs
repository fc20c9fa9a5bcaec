//! Add a linked repository as a git submodule

use crate::domain::value_objects::command_spec::CommandSpec;
use crate::infrastructure::filesystem::config_store::OperatemConfig;
use crate::infrastructure::process::command_executor::{
    CommandExecutorError, CommandRunner, ProcessRunner,
};
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors from adding a submodule
#[derive(Debug, Error)]
pub enum AddSubmoduleError {
    /// git rejected the add
    #[error("git submodule add failed: {0}")]
    Git(String),

    /// git could not be run at all
    #[error(transparent)]
    Executor(#[from] CommandExecutorError),
}

/// Configuration for adding a submodule
#[derive(Debug, Clone)]
pub struct AddSubmoduleConfig {
    /// Repository URL (SSH or HTTPS)
    pub url: String,
    /// Submodule name; defaults to the repository name from the URL
    pub name: Option<String>,
}

impl AddSubmoduleConfig {
    /// Create a config for the given repository URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
        }
    }

    /// Override the submodule name
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
}

/// Wrapper around one `git submodule add` invocation
pub struct AddSubmoduleUseCase {
    config: AddSubmoduleConfig,
    runner: Arc<dyn CommandRunner>,
}

impl AddSubmoduleUseCase {
    /// Create a use case backed by real process execution
    pub fn new(config: AddSubmoduleConfig) -> Self {
        Self::with_runner(config, Arc::new(ProcessRunner::new()))
    }

    /// Create a use case with a custom command runner
    pub fn with_runner(config: AddSubmoduleConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Add the submodule under the configured submodules root, running git
    /// in `base`. Returns the submodule name on success.
    pub async fn execute(
        &self,
        base: &Path,
        config: &OperatemConfig,
    ) -> Result<String, AddSubmoduleError> {
        let name = self
            .config
            .name
            .clone()
            .unwrap_or_else(|| extract_repo_name(&self.config.url));
        let dest = format!("{}/{}", config.submodules, name);

        let spec = CommandSpec::new(
            "git",
            vec![
                "submodule".to_string(),
                "add".to_string(),
                self.config.url.clone(),
                dest,
            ],
        );

        let output = self.runner.run(&spec, base).await?;
        if output.success() {
            Ok(name)
        } else {
            let detail = output.stderr.trim();
            let message = if detail.is_empty() {
                "Unknown error".to_string()
            } else {
                detail.to_string()
            };
            Err(AddSubmoduleError::Git(message))
        }
    }
}

/// Extract the repository name from an SSH or HTTPS git URL, stripping a
/// trailing `.git`.
pub fn extract_repo_name(url: &str) -> String {
    let re = Regex::new(r"([^/]+?)(?:\.git)?$").unwrap();
    re.captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "repo".to_string())
}
