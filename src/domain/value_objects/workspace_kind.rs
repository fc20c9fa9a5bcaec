//! Technology kinds and their per-kind detection/tooling data

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Technology kind of a workspace, detected from its marker file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceKind {
    /// Node.js project (`package.json`)
    Node,
    /// Python project managed by uv (`pyproject.toml`)
    Python,
    /// Rust project (`Cargo.toml`)
    Rust,
}

/// Error returned when parsing an unknown workspace kind name
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported workspace kind: {0}")]
pub struct WorkspaceKindError(pub String);

impl fmt::Display for WorkspaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceKind::Node => write!(f, "node"),
            WorkspaceKind::Python => write!(f, "python"),
            WorkspaceKind::Rust => write!(f, "rust"),
        }
    }
}

impl FromStr for WorkspaceKind {
    type Err = WorkspaceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "node" | "nodejs" => Ok(WorkspaceKind::Node),
            "python" | "py" => Ok(WorkspaceKind::Python),
            "rust" => Ok(WorkspaceKind::Rust),
            _ => Err(WorkspaceKindError(s.to_string())),
        }
    }
}

impl WorkspaceKind {
    /// All kinds, in classification priority order (first match wins)
    pub fn detection_order() -> [WorkspaceKind; 3] {
        [WorkspaceKind::Node, WorkspaceKind::Python, WorkspaceKind::Rust]
    }

    /// Marker file whose presence classifies a directory as this kind
    pub fn marker_file(&self) -> &'static str {
        match self {
            WorkspaceKind::Node => "package.json",
            WorkspaceKind::Python => "pyproject.toml",
            WorkspaceKind::Rust => "Cargo.toml",
        }
    }

    /// External tool that drives this kind of workspace
    pub fn tool(&self) -> &'static str {
        match self {
            WorkspaceKind::Node => "npm",
            WorkspaceKind::Python => "uv",
            WorkspaceKind::Rust => "cargo",
        }
    }

    /// Fixed script set for kinds that do not declare scripts in their
    /// manifest. Node declares scripts in `package.json`, so it has none.
    pub fn builtin_scripts(&self) -> Option<&'static [(&'static str, &'static str)]> {
        match self {
            WorkspaceKind::Node => None,
            WorkspaceKind::Python => Some(&[
                ("build", "uv build"),
                ("test", "uv run pytest"),
                ("dev", "uv run dev"),
                ("install", "uv sync"),
            ]),
            WorkspaceKind::Rust => Some(&[
                ("build", "cargo build"),
                ("test", "cargo test"),
                ("check", "cargo check"),
                ("lint", "cargo clippy"),
                ("run", "cargo run"),
            ]),
        }
    }
}
