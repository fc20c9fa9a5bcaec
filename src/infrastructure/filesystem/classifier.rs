//! Marker-file based workspace classification

use crate::domain::value_objects::workspace_kind::WorkspaceKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Outcome of classifying a candidate directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Detected technology kind
    pub kind: WorkspaceKind,
    /// Script names the workspace supports, mapped to their definitions
    pub scripts: BTreeMap<String, String>,
}

/// The subset of `package.json` the classifier cares about
#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

/// Classify a directory by inspecting its marker files.
///
/// Detection follows [`WorkspaceKind::detection_order`], first match wins.
/// A present-but-unparseable `package.json` yields `None` rather than
/// falling through to a lower-priority kind. Pure read of the filesystem
/// state at call time; no side effects.
pub fn classify(path: &Path) -> Option<Classification> {
    for kind in WorkspaceKind::detection_order() {
        if !path.join(kind.marker_file()).is_file() {
            continue;
        }

        let scripts = match kind.builtin_scripts() {
            Some(builtin) => builtin
                .iter()
                .map(|(name, definition)| (name.to_string(), definition.to_string()))
                .collect(),
            None => declared_scripts(&path.join(kind.marker_file()))?,
        };

        return Some(Classification { kind, scripts });
    }

    None
}

/// Read the script map declared in a `package.json` manifest.
///
/// Returns `None` when the manifest cannot be read or parsed, which
/// excludes the directory from discovery entirely.
fn declared_scripts(manifest_path: &Path) -> Option<BTreeMap<String, String>> {
    let raw = match std::fs::read_to_string(manifest_path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(path = %manifest_path.display(), error = %e, "manifest unreadable");
            return None;
        }
    };

    match serde_json::from_str::<PackageManifest>(&raw) {
        Ok(manifest) => Some(manifest.scripts),
        Err(e) => {
            tracing::debug!(path = %manifest_path.display(), error = %e, "manifest unparseable");
            None
        }
    }
}
