//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents (`~/.config/mutaparc/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database and local state
    pub root_folder: Option<String>,
    /// HTTP listen port for the evaluation service
    pub port: Option<u16>,
    /// Enrichment cache validity window in hours
    pub cache_ttl_hours: Option<i64>,
    /// Per-call timeout for upstream geodata APIs, in seconds
    pub http_timeout_secs: Option<u64>,
}

/// Root folder resolution priority order:
/// 1. Environment variable (highest priority)
/// 2. TOML config file
/// 3. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(env_var_name: &str) -> PathBuf {
    // Priority 1: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return PathBuf::from(path);
    }

    // Priority 2: TOML config file
    if let Ok(config) = load_toml_config() {
        if let Some(root_folder) = config.root_folder {
            return PathBuf::from(root_folder);
        }
    }

    // Priority 3: OS-dependent compiled default
    default_root_folder()
}

/// Load the TOML configuration file, if one exists
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Get configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mutaparc").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    let system_config = PathBuf::from("/etc/mutaparc/config.toml");
    if system_config.exists() {
        return Ok(system_config);
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mutaparc"))
        .unwrap_or_else(|| PathBuf::from("./mutaparc_data"))
}

/// Create the root folder if missing and return the database path inside it
pub fn ensure_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)?;
    Ok(root.join("mutaparc.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_wins_over_defaults() {
        std::env::set_var("MUTAPARC_TEST_ROOT", "/tmp/mutaparc-test-root");
        let root = resolve_root_folder("MUTAPARC_TEST_ROOT");
        assert_eq!(root, PathBuf::from("/tmp/mutaparc-test-root"));
        std::env::remove_var("MUTAPARC_TEST_ROOT");
    }

    #[test]
    fn missing_env_var_falls_back() {
        let root = resolve_root_folder("MUTAPARC_UNSET_VAR_FOR_TEST");
        assert!(!root.as_os_str().is_empty());
    }

    #[test]
    fn ensure_root_folder_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("state");
        let db_path = ensure_root_folder(&root).unwrap();
        assert!(root.is_dir());
        assert!(db_path.ends_with("mutaparc.db"));
    }

    #[test]
    fn toml_config_roundtrip() {
        let toml = r#"
            root_folder = "/var/lib/mutaparc"
            port = 5741
            cache_ttl_hours = 24
        "#;
        let config: TomlConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.root_folder.as_deref(), Some("/var/lib/mutaparc"));
        assert_eq!(config.port, Some(5741));
        assert_eq!(config.cache_ttl_hours, Some(24));
        assert_eq!(config.http_timeout_secs, None);
    }
}
