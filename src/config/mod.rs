//! Configuration module for placeseek
//!
//! This module loads the process-wide settings: API keys, upstream endpoints
//! and server options.

pub mod app_config;

pub use app_config::{AppConfig, ConfigOverlay};

use anyhow::{Context, Result};
use std::path::PathBuf;

const CONFIG_DIR_NAME: &str = "placeseek";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration: defaults, then the config file, then the environment.
///
/// An explicit `path` must exist. Without one, the XDG config file is read
/// only when present. The result is not validated.
pub fn load(path: Option<&str>) -> Result<AppConfig> {
    let file_config = match path {
        Some(p) => AppConfig::from_file(&resolve_path(p)?)?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                tracing::debug!("Loading config from {}", default_path.display());
                AppConfig::from_file(&default_path)?
            } else {
                AppConfig::default()
            }
        }
    };

    Ok(file_config.merge_with(&ConfigOverlay::from_env()?))
}

/// `$XDG_CONFIG_HOME/placeseek`, falling back to `~/.config/placeseek`
pub fn config_dir() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(CONFIG_DIR_NAME)
}

/// Config file read when `--config` is not given
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Turn a user-supplied config path into an absolute one
///
/// A leading `~` or `~/` goes to `$HOME`; relative paths are joined onto the
/// working directory.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let path = if path == "~" {
        home_dir()?
    } else if let Some(rest) = path.strip_prefix("~/") {
        home_dir()?.join(rest)
    } else {
        PathBuf::from(path)
    };

    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(path))
}

fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .context("HOME environment variable not set")
}
