//! Command-line front end: argument parsing, dispatch, and rendering

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};
use std::process::exit;

use crate::application::use_cases::{
    add_submodule::{AddSubmoduleConfig, AddSubmoduleUseCase},
    list_submodules::ListSubmodulesUseCase,
    run_action::{ExecutionMode, ExecutionReport, RunActionConfig, RunActionUseCase},
};
use crate::infrastructure::filesystem::config_store::OperatemConfig;
use crate::infrastructure::git::submodule_status::SubmoduleState;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", ",
    env!("BUILD_DATE"),
    ")"
);

/// operatem - orchestrate installs and scripts across workspaces
#[derive(Parser)]
#[command(name = "operatem")]
#[command(about = "Run installs and scripts across multi-workspace repositories")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Base directory of the aggregating repository (defaults to the
    /// current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// Install dependencies across workspaces
    Install {
        /// Install only in the named workspace
        #[arg(short, long)]
        workspace: Option<String>,

        /// Install in all workspaces concurrently
        #[arg(short, long)]
        parallel: bool,
    },

    /// Run a script across workspaces
    Run {
        /// Script name to run
        script: String,

        /// Run only in the named workspace
        #[arg(short, long)]
        workspace: Option<String>,

        /// Run in all workspaces concurrently
        #[arg(short, long)]
        parallel: bool,
    },

    /// Manage linked submodules
    #[command(subcommand, alias = "sub")]
    Submodules(SubmoduleCommands),
}

/// Submodule management commands
#[derive(Subcommand)]
pub enum SubmoduleCommands {
    /// Add a new submodule under the submodules root
    Add {
        /// Git repository URL
        #[arg(short, long)]
        url: String,

        /// Submodule name (defaults to the repository name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List all submodules
    List,
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    /// Parse arguments from the environment
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    /// Run the selected command; the process exit code reflects the
    /// overall outcome.
    pub async fn run(self) -> Result<()> {
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        // The base directory is resolved once, up front, so every layer
        // below works against the same absolute location.
        let base = match &self.cli.directory {
            Some(dir) => dir.canonicalize()?,
            None => env::current_dir()?,
        };
        let config = OperatemConfig::load(&base);

        match self.handle_command(&base, &config).await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self, base: &Path, config: &OperatemConfig) -> Result<()> {
        match &self.cli.command {
            Commands::Install {
                workspace,
                parallel,
            } => {
                println!("{} Installing dependencies...", "::".blue().bold());
                self.handle_action(base, config, "install", workspace.clone(), *parallel, false)
                    .await
            }
            Commands::Run {
                script,
                workspace,
                parallel,
            } => {
                println!(
                    "{} Running script \"{}\"...",
                    "::".blue().bold(),
                    script.cyan()
                );
                self.handle_action(base, config, script, workspace.clone(), *parallel, true)
                    .await
            }
            Commands::Submodules(SubmoduleCommands::Add { url, name }) => {
                self.handle_submodule_add(base, config, url, name.clone())
                    .await
            }
            Commands::Submodules(SubmoduleCommands::List) => {
                self.handle_submodule_list(base, config).await
            }
        }
    }

    async fn handle_action(
        &self,
        base: &Path,
        config: &OperatemConfig,
        action: &str,
        workspace: Option<String>,
        parallel: bool,
        require_declared_script: bool,
    ) -> Result<()> {
        let mode = if parallel {
            ExecutionMode::Concurrent
        } else {
            ExecutionMode::Sequential
        };
        let run_config = RunActionConfig::new(action)
            .with_workspace(workspace)
            .with_mode(mode)
            .with_require_declared_script(require_declared_script);

        let use_case = RunActionUseCase::new(run_config);
        let report = use_case.run(base, config).await;

        self.render_report(&report);

        if self.cli.verbose {
            println!(
                "  {} succeeded, {} failed",
                report.results().len() - report.failure_count(),
                report.failure_count()
            );
        }

        if report.succeeded() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "{} of {} workspaces failed",
                report.failure_count(),
                report.results().len()
            ))
        }
    }

    fn render_report(&self, report: &ExecutionReport) {
        for result in report.results() {
            if result.succeeded {
                println!("{} {}", "✓".green().bold(), result.workspace_name);
            } else {
                println!("{} {}", "✗".red().bold(), result.workspace_name);
            }
            for line in result.output.lines() {
                println!("  {}", line.dimmed());
            }
        }
    }

    async fn handle_submodule_add(
        &self,
        base: &Path,
        config: &OperatemConfig,
        url: &str,
        name: Option<String>,
    ) -> Result<()> {
        let add_config = AddSubmoduleConfig::new(url).with_name(name);
        let use_case = AddSubmoduleUseCase::new(add_config);

        let name = use_case.execute(base, config).await?;
        println!("{} Added submodule {}", "✓".green().bold(), name.bold());
        Ok(())
    }

    async fn handle_submodule_list(&self, base: &Path, config: &OperatemConfig) -> Result<()> {
        let use_case = ListSubmodulesUseCase::new();
        let submodules = use_case.execute(base, config).await?;

        if submodules.is_empty() {
            println!("{}", "No submodules found".dimmed());
            return Ok(());
        }

        for submodule in submodules {
            let mut line = format!(
                "{} {} {}",
                "•".green(),
                submodule.name,
                format!("({})", submodule.commit).dimmed()
            );
            if submodule.state != SubmoduleState::Clean {
                line.push_str(&format!(" {}", format!("[{}]", submodule.state).yellow()));
            }
            println!("{line}");
            println!("  {}", submodule.last_commit_message.dimmed());
        }
        Ok(())
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
