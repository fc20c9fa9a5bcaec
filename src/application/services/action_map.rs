//! The kind x action translation table

use crate::domain::value_objects::command_spec::CommandSpec;
use crate::domain::value_objects::workspace_kind::WorkspaceKind;
use thiserror::Error;

/// Error returned when a kind/action combination has no mapping
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("workspace kind '{kind}' has no mapping for action '{action}'")]
pub struct UnsupportedAction {
    /// Kind the action was requested for
    pub kind: WorkspaceKind,
    /// The unmapped logical action
    pub action: String,
}

/// How a kind maps logical actions other than "install" onto its tool
enum RunForm {
    /// `<tool> <prefix...> <action>` for any action name
    Script { prefix: &'static [&'static str] },
    /// Only the listed actions, each with a fixed argument vector
    Fixed(&'static [(&'static str, &'static [&'static str])]),
}

struct KindEntry {
    kind: WorkspaceKind,
    /// "install" is a reserved operation for every tool, never a named
    /// script; uv in particular treats it as a dedicated sync
    install: &'static [&'static str],
    run: RunForm,
}

/// kind x action dispatch table; adding a kind is a data addition here
/// plus a classifier rule, not a new branch at each call site
static ACTION_TABLE: &[KindEntry] = &[
    KindEntry {
        kind: WorkspaceKind::Node,
        install: &["install"],
        run: RunForm::Script { prefix: &["run"] },
    },
    KindEntry {
        kind: WorkspaceKind::Python,
        install: &["sync"],
        run: RunForm::Script { prefix: &["run"] },
    },
    KindEntry {
        kind: WorkspaceKind::Rust,
        install: &["fetch"],
        run: RunForm::Fixed(&[
            ("build", &["build"]),
            ("test", &["test"]),
            ("check", &["check"]),
            ("lint", &["clippy"]),
            ("run", &["run"]),
        ]),
    },
];

/// Translate a logical action into the concrete invocation for a kind.
///
/// Pure table lookup; the caller turns [`UnsupportedAction`] into a failed
/// per-workspace result rather than aborting the run.
pub fn translate(kind: WorkspaceKind, action: &str) -> Result<CommandSpec, UnsupportedAction> {
    let entry = ACTION_TABLE
        .iter()
        .find(|entry| entry.kind == kind)
        .ok_or_else(|| UnsupportedAction {
            kind,
            action: action.to_string(),
        })?;

    if action == "install" {
        return Ok(CommandSpec::new(kind.tool(), entry.install.iter().copied()));
    }

    match &entry.run {
        RunForm::Script { prefix } => {
            let args = prefix.iter().copied().chain(std::iter::once(action));
            Ok(CommandSpec::new(kind.tool(), args))
        }
        RunForm::Fixed(actions) => actions
            .iter()
            .find(|(name, _)| *name == action)
            .map(|(_, args)| CommandSpec::new(kind.tool(), args.iter().copied()))
            .ok_or_else(|| UnsupportedAction {
                kind,
                action: action.to_string(),
            }),
    }
}
