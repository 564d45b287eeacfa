//! Configuration types and parsing for lea.yml
//!
//! The file is optional and lives at the root of the views directory, next to
//! the schema directories. A missing file means all defaults.

use crate::error::{CoreError, CoreResult};
pub use lea_sql::Dialect;
use lea_sql::ScriptCallShapes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// File names probed for configuration, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["lea.yml", "lea.yaml"];

/// Views directory configuration from lea.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// SQL dialect used to parse view queries
    #[serde(default)]
    pub dialect: Dialect,

    /// Fixed dependencies for views the parser cannot analyze.
    ///
    /// Keys are `schema.name`; values are `schema.name` or bare `name`.
    #[serde(default)]
    pub overrides: BTreeMap<String, Vec<String>>,

    /// Call shapes recognized as running SQL in Python views
    #[serde(default)]
    pub script: ScriptCallShapes,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a views directory, falling back to defaults
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.is_file() {
                log::debug!("Loading config from {}", path.display());
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
