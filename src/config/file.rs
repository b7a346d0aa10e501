//! Configuration file discovery and loading

use std::path::{Path, PathBuf};

use super::Config;

/// A parsed configuration and where it came from
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Empty when no file was found and defaults are used
    pub path: PathBuf,
    pub config: Config,
}

const RELATIVE_PATH: &str = "swanctl-complete/config.toml";

/// Candidate configuration files, most specific first: the XDG config
/// directory, `~/.config`, then `/etc`
pub fn config_search_paths() -> Vec<PathBuf> {
    let user_dirs = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .into_iter()
        .chain(dirs::home_dir().map(|home| home.join(".config")));

    let mut paths: Vec<PathBuf> = Vec::new();
    for path in user_dirs
        .chain(std::iter::once(PathBuf::from("/etc")))
        .map(|dir| dir.join(RELATIVE_PATH))
    {
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

/// The first existing file of [`config_search_paths`]
pub fn find_config_file() -> Option<PathBuf> {
    let found = config_search_paths().into_iter().find(|p| p.is_file());
    tracing::debug!(path = ?found, "Configuration file lookup");
    found
}

/// Load configuration from the specified path
pub fn load_config(path: &Path) -> crate::Result<ConfigFile> {
    let failed = |what: &str, e: &dyn std::fmt::Display| {
        crate::Error::Config(format!("Failed to {} '{}': {}", what, path.display(), e))
    };

    let content = std::fs::read_to_string(path).map_err(|e| failed("read", &e))?;
    let config = toml::from_str(&content).map_err(|e| failed("parse", &e))?;

    Ok(ConfigFile {
        path: path.to_path_buf(),
        config,
    })
}

/// Load the given file, else the first one found, else defaults
pub fn load_config_from_path_or_default(path: Option<&Path>) -> crate::Result<ConfigFile> {
    match path.map(Path::to_path_buf).or_else(find_config_file) {
        Some(p) => load_config(&p),
        None => Ok(ConfigFile {
            path: PathBuf::new(),
            config: Config::default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_search_paths_end_in_etc() {
        let paths = config_search_paths();
        assert!(paths.iter().all(|p| p.is_absolute() && p.ends_with(RELATIVE_PATH)));
        assert_eq!(paths.last(), Some(&PathBuf::from("/etc/swanctl-complete/config.toml")));
    }

    #[test]
    fn test_load_config() {
        let (_dir, path) = write_config(
            "uri = \"unix:///run/charon.vici\"\nlog_file = \"/tmp/swanctl-complete.log\"\n",
        );
        let loaded = load_config_from_path_or_default(Some(&path)).unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.config.uri.as_deref(), Some("unix:///run/charon.vici"));
        assert_eq!(loaded.config.log_file.as_deref(), Some("/tmp/swanctl-complete.log"));
    }

    #[test]
    fn test_load_config_rejects_bad_files() {
        let (_dir, invalid) = write_config("invalid toml { [ }");
        assert!(matches!(load_config(&invalid), Err(crate::Error::Config(_))));

        let (_dir, unknown) = write_config("upstream = \"/tmp/socket\"\n");
        assert!(matches!(load_config(&unknown), Err(crate::Error::Config(_))));

        let missing = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(missing, Err(crate::Error::Config(_))));
    }
}
