//! Shell configuration

use crate::AppError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Shell configuration (`config.toml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// User name shown in the prompt
    #[serde(default = "default_user_name")]
    pub user_name: String,

    /// Host name shown in the prompt
    #[serde(default = "default_computer_name")]
    pub computer_name: String,

    /// Archive backing the virtual file system
    pub vfs_path: PathBuf,
}

fn default_user_name() -> String {
    "user".to_string()
}

fn default_computer_name() -> String {
    "localhost".to_string()
}

impl ShellConfig {
    /// Load configuration from an explicit path, or the default location
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path(),
        };

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {}", config_path.display(), e))
        })?;

        let mut config = Self::from_toml(&content)?;

        // Relative archive paths are relative to the config file
        if config.vfs_path.is_relative() {
            if let Some(dir) = config_path.parent() {
                config.vfs_path = dir.join(&config.vfs_path);
            }
        }

        tracing::info!("Configuration loaded from {:?}", config_path);
        Ok(config)
    }

    /// Parse configuration text
    pub fn from_toml(content: &str) -> Result<Self, AppError> {
        let config: Self = toml::from_str(content)?;

        if config.vfs_path.as_os_str().is_empty() {
            return Err(AppError::Config("vfs_path must not be empty".into()));
        }

        Ok(config)
    }

    /// Get the default configuration file path
    ///
    /// `./config.toml` wins when present, otherwise the platform config
    /// directory is used.
    pub fn config_path() -> PathBuf {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }

        ProjectDirs::from("com", "ArchiveShell", "ArchiveShell")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or(local)
    }

    /// Prompt prefix, e.g. `user@host`
    pub fn prompt_identity(&self) -> String {
        format!("{}@{}", self.user_name, self.computer_name)
    }
}
