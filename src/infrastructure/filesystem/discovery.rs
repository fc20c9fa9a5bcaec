//! Workspace discovery across the configured roots

use super::classifier::classify;
use super::config_store::OperatemConfig;
use crate::domain::entities::workspace::{Workspace, WorkspaceOrigin};
use std::path::Path;

/// Discover recognized workspaces under the configured roots.
///
/// The submodules root is walked before the packages root (sequentially,
/// never interleaved); within a root, workspaces appear in
/// directory-listing order. Roots that do not exist contribute zero
/// workspaces, and a subdirectory that fails classification is excluded
/// without aborting the rest. Discovery itself never fails.
pub fn discover(base: &Path, config: &OperatemConfig) -> Vec<Workspace> {
    let roots = [
        (config.submodules.as_str(), WorkspaceOrigin::Submodule),
        (config.packages.as_str(), WorkspaceOrigin::Package),
    ];

    let mut workspaces = Vec::new();
    for (root_name, origin) in roots {
        discover_root(&base.join(root_name), origin, &mut workspaces);
    }

    tracing::debug!(count = workspaces.len(), "workspace discovery complete");
    workspaces
}

fn discover_root(root: &Path, origin: WorkspaceOrigin, out: &mut Vec<Workspace>) {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return, // missing or unreadable root contributes nothing
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(classification) = classify(&path) else {
            continue;
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        tracing::debug!(workspace = %name, kind = %classification.kind, origin = %origin, "classified workspace");
        out.push(Workspace::new(
            name,
            path,
            classification.kind,
            classification.scripts,
            origin,
        ));
    }
}
