//! The execution engine: run one logical action across N workspaces

use crate::application::services::action_map;
use crate::domain::entities::workspace::Workspace;
use crate::infrastructure::filesystem::config_store::OperatemConfig;
use crate::infrastructure::filesystem::discovery::discover;
use crate::infrastructure::process::command_executor::{CommandRunner, ProcessRunner};
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;

/// Concurrency strategy for running an action across workspaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One workspace after another, each fully completing first
    Sequential,
    /// One process per target, all at once, unbounded
    Concurrent,
}

/// Aggregate status of an execution report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    /// Every targeted workspace succeeded
    Success,
    /// At least one failure, or nothing to do
    Failure,
}

/// Outcome of running one action against one workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    /// Name of the targeted workspace
    pub workspace_name: String,
    /// Whether the underlying invocation exited with code 0
    pub succeeded: bool,
    /// Captured stdout, falling back to stderr, falling back to a
    /// synthesized success/failure message
    pub output: String,
}

impl ActionResult {
    fn success(workspace_name: impl Into<String>, output: String) -> Self {
        Self {
            workspace_name: workspace_name.into(),
            succeeded: true,
            output,
        }
    }

    fn failure(workspace_name: impl Into<String>, output: String) -> Self {
        Self {
            workspace_name: workspace_name.into(),
            succeeded: false,
            output,
        }
    }
}

/// Ordered per-workspace results plus the derived overall status.
///
/// The status is always computed from the results by the constructor;
/// there is no way to set it independently.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    results: Vec<ActionResult>,
    overall: OverallStatus,
}

impl ExecutionReport {
    /// Build a report, deriving the overall status: `Success` iff there is
    /// at least one result and every result succeeded. An empty run is a
    /// failure so callers notice misconfiguration.
    pub fn from_results(results: Vec<ActionResult>) -> Self {
        let overall = if !results.is_empty() && results.iter().all(|r| r.succeeded) {
            OverallStatus::Success
        } else {
            OverallStatus::Failure
        };
        Self { results, overall }
    }

    /// Per-workspace results, in targeting order
    pub fn results(&self) -> &[ActionResult] {
        &self.results
    }

    /// Derived aggregate status
    pub fn overall(&self) -> OverallStatus {
        self.overall
    }

    /// Whether the overall status is `Success`
    pub fn succeeded(&self) -> bool {
        self.overall == OverallStatus::Success
    }

    /// Number of failed results
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.succeeded).count()
    }
}

/// Configuration for running one logical action across workspaces
#[derive(Debug, Clone)]
pub struct RunActionConfig {
    /// Logical action name ("install", "build", ...)
    pub action: String,
    /// Restrict the run to the workspace with this name
    pub workspace: Option<String>,
    /// Concurrency strategy
    pub mode: ExecutionMode,
    /// Only target workspaces that declare the action as a script.
    /// "install" runs bypass this since install is supported per kind.
    pub require_declared_script: bool,
}

impl RunActionConfig {
    /// Create a config for the given logical action
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            workspace: None,
            mode: ExecutionMode::Sequential,
            require_declared_script: false,
        }
    }

    /// Restrict the run to a single named workspace
    pub fn with_workspace(mut self, workspace: Option<String>) -> Self {
        self.workspace = workspace;
        self
    }

    /// Select the concurrency strategy
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Require targets to declare the action as a script
    pub fn with_require_declared_script(mut self, require: bool) -> Self {
        self.require_declared_script = require;
        self
    }
}

/// The execution engine: translates a logical action per workspace and
/// runs the resulting external commands, aggregating per-workspace
/// outcomes into an [`ExecutionReport`].
pub struct RunActionUseCase {
    config: RunActionConfig,
    runner: Arc<dyn CommandRunner>,
}

impl RunActionUseCase {
    /// Create a use case backed by real process execution
    pub fn new(config: RunActionConfig) -> Self {
        Self::with_runner(config, Arc::new(ProcessRunner::new()))
    }

    /// Create a use case with a custom command runner
    pub fn with_runner(config: RunActionConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Discover workspaces under `base`, apply the configured filters, and
    /// execute the action against the remaining targets.
    ///
    /// When a filter leaves nothing to run, the report carries a single
    /// synthesized failed result describing the mismatch.
    pub async fn run(&self, base: &Path, config: &OperatemConfig) -> ExecutionReport {
        let workspaces = discover(base, config);

        let targets: Vec<Workspace> = match &self.config.workspace {
            Some(name) => workspaces.into_iter().filter(|w| &w.name == name).collect(),
            None => workspaces,
        };

        if targets.is_empty() {
            let message = match &self.config.workspace {
                Some(name) => format!("No workspaces found matching \"{name}\""),
                None => "No workspaces found".to_string(),
            };
            return self.nothing_to_run(message);
        }

        let targets: Vec<Workspace> = if self.config.require_declared_script {
            targets
                .into_iter()
                .filter(|w| w.has_script(&self.config.action))
                .collect()
        } else {
            targets
        };

        if targets.is_empty() {
            let action = &self.config.action;
            return self.nothing_to_run(format!("No workspaces have script \"{action}\""));
        }

        self.execute(targets).await
    }

    /// Run the configured action against an explicit target list.
    ///
    /// Result order always matches target order, independent of which
    /// process exits first. An empty target list yields a report with zero
    /// results and overall failure.
    pub async fn execute(&self, targets: Vec<Workspace>) -> ExecutionReport {
        if targets.is_empty() {
            return ExecutionReport::from_results(Vec::new());
        }

        tracing::debug!(
            action = %self.config.action,
            targets = targets.len(),
            mode = ?self.config.mode,
            "executing action"
        );

        let results = match self.config.mode {
            ExecutionMode::Sequential => {
                let mut results = Vec::with_capacity(targets.len());
                for workspace in targets {
                    // No short-circuit: later targets run even after a failure.
                    results.push(
                        run_in_workspace(
                            self.runner.clone(),
                            self.config.action.clone(),
                            workspace,
                        )
                        .await,
                    );
                }
                results
            }
            ExecutionMode::Concurrent => {
                let handles: Vec<_> = targets
                    .into_iter()
                    .map(|workspace| {
                        let runner = self.runner.clone();
                        let action = self.config.action.clone();
                        tokio::spawn(run_in_workspace(runner, action, workspace))
                    })
                    .collect();

                // join_all preserves spawn order regardless of completion order
                join_all(handles)
                    .await
                    .into_iter()
                    .map(|joined| match joined {
                        Ok(result) => result,
                        Err(e) => ActionResult::failure("unknown", format!("Task join error: {e}")),
                    })
                    .collect()
            }
        };

        ExecutionReport::from_results(results)
    }

    fn nothing_to_run(&self, message: String) -> ExecutionReport {
        let name = self.config.workspace.as_deref().unwrap_or("all");
        ExecutionReport::from_results(vec![ActionResult::failure(name, message)])
    }
}

/// Resolve and run the action for one workspace, mapping every failure
/// mode (unsupported action, spawn failure, non-zero exit) into a failed
/// result rather than an error.
async fn run_in_workspace(
    runner: Arc<dyn CommandRunner>,
    action: String,
    workspace: Workspace,
) -> ActionResult {
    let spec = match action_map::translate(workspace.kind, &action) {
        Ok(spec) => spec,
        Err(e) => return ActionResult::failure(workspace.name, e.to_string()),
    };

    match runner.run(&spec, &workspace.path).await {
        Ok(output) if output.success() => {
            let text = pick_output(
                &output.stdout,
                &output.stderr,
                format!("{action} completed"),
            );
            ActionResult::success(workspace.name, text)
        }
        Ok(output) => {
            let text = pick_output(
                &output.stderr,
                &output.stdout,
                format!("{action} failed with exit code {}", output.exit_code),
            );
            ActionResult::failure(workspace.name, text)
        }
        Err(e) => ActionResult::failure(workspace.name, e.to_string()),
    }
}

fn pick_output(primary: &str, secondary: &str, fallback: String) -> String {
    for candidate in [primary, secondary] {
        let trimmed = candidate.trim_end();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::workspace::WorkspaceOrigin;
    use crate::domain::value_objects::command_spec::CommandSpec;
    use crate::domain::value_objects::workspace_kind::WorkspaceKind;
    use crate::infrastructure::process::command_executor::{CommandExecutorError, ProcessOutput};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Runner that fails workspaces whose directory name contains "fail"
    /// and sleeps per-workspace so completion order differs from input
    /// order in concurrent mode.
    struct ScriptedRunner {
        calls: AtomicUsize,
        delays_ms: BTreeMap<String, u64>,
    }

    impl ScriptedRunner {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delays_ms: BTreeMap::new(),
            }
        }

        fn with_delays(delays: &[(&str, u64)]) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delays_ms: delays
                    .iter()
                    .map(|(name, ms)| (name.to_string(), *ms))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(
            &self,
            _spec: &CommandSpec,
            cwd: &std::path::Path,
        ) -> Result<ProcessOutput, CommandExecutorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let name = cwd
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if let Some(ms) = self.delays_ms.get(&name) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }

            if name.contains("fail") {
                Ok(ProcessOutput {
                    exit_code: 1,
                    stdout: String::new(),
                    stderr: format!("boom in {name}"),
                })
            } else {
                Ok(ProcessOutput {
                    exit_code: 0,
                    stdout: format!("done {name}\n"),
                    stderr: String::new(),
                })
            }
        }
    }

    fn node_workspace(name: &str) -> Workspace {
        let mut scripts = BTreeMap::new();
        scripts.insert("build".to_string(), "tsc".to_string());
        Workspace::new(
            name,
            PathBuf::from(format!("/repo/packages/{name}")),
            WorkspaceKind::Node,
            scripts,
            WorkspaceOrigin::Package,
        )
    }

    fn rust_workspace(name: &str) -> Workspace {
        let scripts = WorkspaceKind::Rust
            .builtin_scripts()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Workspace::new(
            name,
            PathBuf::from(format!("/repo/packages/{name}")),
            WorkspaceKind::Rust,
            scripts,
            WorkspaceOrigin::Package,
        )
    }

    fn use_case(
        action: &str,
        mode: ExecutionMode,
        runner: Arc<dyn CommandRunner>,
    ) -> RunActionUseCase {
        RunActionUseCase::with_runner(RunActionConfig::new(action).with_mode(mode), runner)
    }

    #[tokio::test]
    async fn test_empty_targets_is_a_failure_with_zero_results() {
        let uc = use_case("build", ExecutionMode::Sequential, Arc::new(ScriptedRunner::new()));
        let report = uc.execute(Vec::new()).await;
        assert!(report.results().is_empty());
        assert_eq!(report.overall(), OverallStatus::Failure);

        let uc = use_case("build", ExecutionMode::Concurrent, Arc::new(ScriptedRunner::new()));
        let report = uc.execute(Vec::new()).await;
        assert!(report.results().is_empty());
        assert_eq!(report.overall(), OverallStatus::Failure);
    }

    #[tokio::test]
    async fn test_overall_status_is_derived_from_results() {
        let runner = Arc::new(ScriptedRunner::new());
        let uc = use_case("build", ExecutionMode::Sequential, runner);

        let report = uc.execute(vec![node_workspace("a"), node_workspace("b")]).await;
        assert_eq!(report.overall(), OverallStatus::Success);

        let report = uc
            .execute(vec![node_workspace("a"), node_workspace("failing")])
            .await;
        assert_eq!(report.overall(), OverallStatus::Failure);
        assert_eq!(report.failure_count(), 1);
    }

    #[tokio::test]
    async fn test_sequential_does_not_short_circuit() {
        let runner = Arc::new(ScriptedRunner::new());
        let uc = use_case("build", ExecutionMode::Sequential, runner.clone());

        let report = uc
            .execute(vec![
                node_workspace("failing"),
                node_workspace("a"),
                node_workspace("b"),
            ])
            .await;

        assert_eq!(report.results().len(), 3);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 3);
        assert!(!report.results()[0].succeeded);
        assert!(report.results()[1].succeeded);
    }

    #[tokio::test]
    async fn test_concurrent_preserves_target_order() {
        // Delays invert completion order relative to input order.
        let runner = Arc::new(ScriptedRunner::with_delays(&[
            ("a", 150),
            ("b", 100),
            ("c", 50),
        ]));
        let uc = use_case("build", ExecutionMode::Concurrent, runner);

        let report = uc
            .execute(vec![
                node_workspace("a"),
                node_workspace("b"),
                node_workspace("c"),
            ])
            .await;

        let names: Vec<_> = report
            .results()
            .iter()
            .map(|r| r.workspace_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_sequential_and_concurrent_agree_on_outcomes() {
        let targets = || {
            vec![
                node_workspace("a"),
                node_workspace("failing"),
                node_workspace("c"),
            ]
        };

        let sequential = use_case(
            "build",
            ExecutionMode::Sequential,
            Arc::new(ScriptedRunner::new()),
        )
        .execute(targets())
        .await;
        let concurrent = use_case(
            "build",
            ExecutionMode::Concurrent,
            Arc::new(ScriptedRunner::with_delays(&[("a", 100), ("failing", 50)])),
        )
        .execute(targets())
        .await;

        let pairs = |report: &ExecutionReport| {
            report
                .results()
                .iter()
                .map(|r| (r.workspace_name.clone(), r.succeeded))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&sequential), pairs(&concurrent));
        assert_eq!(sequential.overall(), concurrent.overall());
    }

    #[tokio::test]
    async fn test_unsupported_action_fails_without_spawning() {
        let runner = Arc::new(ScriptedRunner::new());
        let uc = use_case("deploy", ExecutionMode::Sequential, runner.clone());

        let report = uc.execute(vec![rust_workspace("svc")]).await;
        assert_eq!(report.overall(), OverallStatus::Failure);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);

        let result = &report.results()[0];
        assert!(!result.succeeded);
        assert!(result.output.contains("rust"));
        assert!(result.output.contains("deploy"));
    }

    #[tokio::test]
    async fn test_spawn_failure_becomes_a_failed_result_and_siblings_still_run() {
        /// Cannot start the tool for the "broken" workspace; everything
        /// else succeeds.
        struct NoSuchToolRunner {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl CommandRunner for NoSuchToolRunner {
            async fn run(
                &self,
                spec: &CommandSpec,
                cwd: &std::path::Path,
            ) -> Result<ProcessOutput, CommandExecutorError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                let name = cwd
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();

                if name == "broken" {
                    Err(CommandExecutorError::SpawnFailed {
                        program: spec.program.clone(),
                        source: std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "No such file or directory",
                        ),
                    })
                } else {
                    Ok(ProcessOutput {
                        exit_code: 0,
                        stdout: format!("done {name}\n"),
                        stderr: String::new(),
                    })
                }
            }
        }

        let runner = Arc::new(NoSuchToolRunner {
            calls: AtomicUsize::new(0),
        });
        let uc = use_case("build", ExecutionMode::Sequential, runner.clone());

        let report = uc
            .execute(vec![
                node_workspace("a"),
                node_workspace("broken"),
                node_workspace("b"),
            ])
            .await;

        assert_eq!(report.overall(), OverallStatus::Failure);
        assert_eq!(report.results().len(), 3);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 3);

        let failed = &report.results()[1];
        assert!(!failed.succeeded);
        assert!(failed.output.contains("failed to spawn 'npm'"));
        assert!(failed.output.contains("No such file or directory"));

        assert!(report.results()[0].succeeded);
        assert!(report.results()[2].succeeded);
    }

    #[tokio::test]
    async fn test_output_falls_back_to_synthesized_message() {
        struct SilentRunner;

        #[async_trait]
        impl CommandRunner for SilentRunner {
            async fn run(
                &self,
                _spec: &CommandSpec,
                _cwd: &std::path::Path,
            ) -> Result<ProcessOutput, CommandExecutorError> {
                Ok(ProcessOutput {
                    exit_code: 0,
                    stdout: String::new(),
                    stderr: String::new(),
                })
            }
        }

        let uc = use_case("build", ExecutionMode::Sequential, Arc::new(SilentRunner));
        let report = uc.execute(vec![node_workspace("quiet")]).await;
        assert_eq!(report.results()[0].output, "build completed");
    }

    #[tokio::test]
    async fn test_unmatched_workspace_filter_yields_descriptive_failure() {
        let base = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(base.path().join("packages").join("foo")).unwrap();
        std::fs::write(
            base.path().join("packages").join("foo").join("package.json"),
            r#"{"scripts": {"build": "tsc"}}"#,
        )
        .unwrap();

        let config = RunActionConfig::new("build")
            .with_workspace(Some("nope".to_string()))
            .with_require_declared_script(true);
        let uc = RunActionUseCase::with_runner(config, Arc::new(ScriptedRunner::new()));

        let report = uc.run(base.path(), &OperatemConfig::default()).await;
        assert_eq!(report.overall(), OverallStatus::Failure);
        assert_eq!(report.results().len(), 1);
        assert_eq!(report.results()[0].workspace_name, "nope");
        assert!(report.results()[0].output.contains("No workspaces found matching"));
    }

    #[tokio::test]
    async fn test_undeclared_script_yields_descriptive_failure() {
        let base = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(base.path().join("packages").join("foo")).unwrap();
        std::fs::write(
            base.path().join("packages").join("foo").join("package.json"),
            r#"{"scripts": {"build": "tsc"}}"#,
        )
        .unwrap();

        let config = RunActionConfig::new("deploy").with_require_declared_script(true);
        let uc = RunActionUseCase::with_runner(config, Arc::new(ScriptedRunner::new()));

        let report = uc.run(base.path(), &OperatemConfig::default()).await;
        assert_eq!(report.overall(), OverallStatus::Failure);
        assert_eq!(report.results().len(), 1);
        assert!(report.results()[0].output.contains("No workspaces have script"));
    }
}
