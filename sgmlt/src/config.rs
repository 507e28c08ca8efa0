//! Configuration module for the sgmlt CLI.
//!
//! Settings are read from `sgmlt.toml`; command-line flags override them.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SgmltError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "sgmlt.toml";

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Syntax description to use; the built-in reference syntax when unset.
    #[serde(default)]
    pub syntax: Option<PathBuf>,

    /// Mode to start tokenizing in; the syntax's first mode when unset.
    #[serde(default)]
    pub mode: Option<String>,

    /// Output format (`text` or `json`).
    #[serde(default = "default_format")]
    pub format: String,

    /// Whether runs of unrecognized characters are printed.
    #[serde(default = "default_true")]
    pub show_data: bool,
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            syntax: None,
            mode: None,
            format: default_format(),
            show_data: true,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. `~/.config/sgmlt/`
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    ///
    /// A relative `syntax` path is resolved against the file's directory.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SgmltError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| SgmltError::Config(format!("Failed to parse configuration: {}", e)))?;

        if let (Some(syntax), Some(dir)) = (config.syntax.as_mut(), path.parent()) {
            if syntax.is_relative() {
                *syntax = dir.join(&*syntax);
            }
        }

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("sgmlt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("sgmlt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.syntax.is_none());
        assert!(config.mode.is_none());
        assert_eq!(config.format, "text");
        assert!(config.show_data);
    }

    #[test]
    fn test_load_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "format = \"json\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.format, "json");
        assert!(config.show_data);
        assert!(config.syntax.is_none());
    }

    #[test]
    fn test_relative_syntax_path_resolved() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "syntax = \"my.toml\"\nmode = \"tag\"\nshow_data = false\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.syntax, Some(temp_dir.path().join("my.toml")));
        assert_eq!(config.mode.as_deref(), Some("tag"));
        assert!(!config.show_data);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "colour = true\n").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(SgmltError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/path/sgmlt.toml"));
        assert!(result.is_err());
    }
}
