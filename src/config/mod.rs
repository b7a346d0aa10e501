//! Configuration module for swanctl-complete
//!
//! The configuration file is optional; completion works with defaults.
//! Paths support environment variable and tilde expansion.

mod file;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use file::{
    ConfigFile, config_search_paths, find_config_file, load_config,
    load_config_from_path_or_default,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// VICI URI of the charon daemon
    /// Supports environment variable expansion (e.g., unix://$XDG_RUNTIME_DIR/charon.vici)
    #[serde(default)]
    pub uri: Option<String>,

    /// File receiving diagnostic logs
    /// Supports environment variable and tilde expansion
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Config {
    /// Expand environment variables and tilde in all paths
    pub fn expand_paths(&self) -> crate::Result<ExpandedConfig> {
        Ok(ExpandedConfig {
            uri: self.uri.as_deref().map(expand_path).transpose()?,
            log_file: self
                .log_file
                .as_deref()
                .map(expand_path)
                .transpose()?
                .map(PathBuf::from),
        })
    }
}

/// Configuration with all paths expanded
#[derive(Debug, Clone, Default)]
pub struct ExpandedConfig {
    /// Resolved VICI URI
    pub uri: Option<String>,

    /// Resolved log file path
    pub log_file: Option<PathBuf>,
}

/// Expand environment variables and tilde in a path string
pub fn expand_path(path: &str) -> crate::Result<String> {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .map_err(|e| crate::Error::Config(format!("Failed to expand path '{}': {}", path, e)))
}
