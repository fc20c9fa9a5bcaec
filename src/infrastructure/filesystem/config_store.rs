//! `operatem.json` loading

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file name looked up in the base directory
pub const CONFIG_FILE: &str = "operatem.json";

fn default_submodules() -> String {
    "submodules".to_string()
}

fn default_packages() -> String {
    "packages".to_string()
}

/// Root-directory names for workspace discovery.
///
/// Loaded from `operatem.json` in the base directory; keys not present in
/// the file keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatemConfig {
    /// Root holding linked external repositories
    #[serde(default = "default_submodules")]
    pub submodules: String,
    /// Root holding local packages
    #[serde(default = "default_packages")]
    pub packages: String,
}

impl Default for OperatemConfig {
    fn default() -> Self {
        Self {
            submodules: default_submodules(),
            packages: default_packages(),
        }
    }
}

impl OperatemConfig {
    /// Load configuration from `operatem.json` under `base`.
    ///
    /// A missing or malformed file yields the defaults; configuration
    /// problems never abort a run.
    pub fn load(base: &Path) -> Self {
        let config_path = base.join(CONFIG_FILE);
        let raw = match std::fs::read_to_string(&config_path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(path = %config_path.display(), error = %e, "config unparseable, using defaults");
                Self::default()
            }
        }
    }
}
