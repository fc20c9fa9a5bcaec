//! The workspace entity

use crate::domain::value_objects::workspace_kind::WorkspaceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Which configured root a workspace was discovered under.
///
/// Informational only; execution semantics do not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceOrigin {
    /// Found under the linked-external-repository root
    Submodule,
    /// Found under the local-package root
    Package,
}

impl fmt::Display for WorkspaceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceOrigin::Submodule => write!(f, "submodule"),
            WorkspaceOrigin::Package => write!(f, "package"),
        }
    }
}

/// A recognized sub-project.
///
/// Constructed fresh on every discovery call and read-only afterwards;
/// there is no persisted identity across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Identifier, derived from the directory name
    pub name: String,
    /// Absolute filesystem location
    pub path: PathBuf,
    /// Detected technology kind
    pub kind: WorkspaceKind,
    /// Logical script name to declared (or built-in) definition
    pub scripts: BTreeMap<String, String>,
    /// Which configured root the workspace came from
    pub origin: WorkspaceOrigin,
}

impl Workspace {
    /// Create a new workspace record
    pub fn new(
        name: impl Into<String>,
        path: PathBuf,
        kind: WorkspaceKind,
        scripts: BTreeMap<String, String>,
        origin: WorkspaceOrigin,
    ) -> Self {
        Self {
            name: name.into(),
            path,
            kind,
            scripts,
            origin,
        }
    }

    /// Whether this workspace declares the given logical script name
    pub fn has_script(&self, script: &str) -> bool {
        self.scripts.contains_key(script)
    }
}
