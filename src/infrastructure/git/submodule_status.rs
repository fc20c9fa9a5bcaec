//! Parsing of `git submodule status` output

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Working-tree state of a submodule, from the status-line prefix character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmoduleState {
    /// Checked out at the recorded commit
    Clean,
    /// Checked out at a different commit (`+` prefix)
    Modified,
    /// Any other prefix (uninitialized, merge conflicts, ...)
    Other,
}

impl fmt::Display for SubmoduleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmoduleState::Clean => write!(f, "clean"),
            SubmoduleState::Modified => write!(f, "modified"),
            SubmoduleState::Other => write!(f, "other"),
        }
    }
}

/// One parsed line of `git submodule status` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Working-tree state
    pub state: SubmoduleState,
    /// Abbreviated commit id (8 characters)
    pub commit: String,
    /// Submodule path relative to the repository root
    pub path: String,
    /// Branch or describe output, when git printed one
    pub branch: Option<String>,
}

fn status_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.)([\da-f]+)\s+(\S+)(?:\s+\((.+)\))?").unwrap())
}

/// Parse one line of `git submodule status` output.
///
/// Lines that do not match the expected shape yield `None` and are simply
/// skipped by the caller.
pub fn parse_status_line(line: &str) -> Option<StatusEntry> {
    let captures = status_line_regex().captures(line)?;

    let state = match captures.get(1)?.as_str() {
        " " => SubmoduleState::Clean,
        "+" => SubmoduleState::Modified,
        _ => SubmoduleState::Other,
    };

    let commit = captures.get(2)?.as_str();
    Some(StatusEntry {
        state,
        commit: commit.chars().take(8).collect(),
        path: captures.get(3)?.as_str().to_string(),
        branch: captures.get(4).map(|m| m.as_str().to_string()),
    })
}

impl StatusEntry {
    /// Submodule name: the path with the submodules-root prefix stripped
    pub fn name(&self, submodules_root: &str) -> String {
        self.path
            .strip_prefix(&format!("{submodules_root}/"))
            .unwrap_or(&self.path)
            .to_string()
    }
}
