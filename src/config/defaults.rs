// src/config/defaults.rs
use std::path::{Path, PathBuf};

use crate::consts::DEFAULT_SECRECY_MARKER;
use crate::error::ConfigError;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV_VAR: &str = "KEYDB_MIGRATE_CONFIG";

pub const CONFIG_DIR_NAME: &str = ".keymanager";
pub const CONFIG_FILE_NAME: &str = "keymanager.toml";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/keymanager/keymanager.toml";

pub fn default_secrecy_marker() -> String {
    DEFAULT_SECRECY_MARKER.into()
}

/// Pick the config file: explicit flag, env var, per-user file, system file
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let env_value = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    let user_file = user_config_path();
    resolve_from(explicit, env_value, user_file, |p| p.exists())
}

/// Resolution order without touching process state
pub fn resolve_from(
    explicit: Option<&Path>,
    env_value: Option<PathBuf>,
    user_file: Option<PathBuf>,
    exists: impl Fn(&Path) -> bool,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(absolute(path));
    }
    if let Some(path) = env_value.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(absolute(&path));
    }

    if cfg!(windows) {
        // No system-wide fallback on Windows
        return user_file.ok_or(ConfigError::NoConfigPath);
    }

    match user_file {
        Some(path) if exists(&path) => Ok(path),
        _ => Ok(PathBuf::from(SYSTEM_CONFIG_PATH)),
    }
}

fn user_config_path() -> Option<PathBuf> {
    if cfg!(windows) {
        dirs::data_local_dir().map(|d| d.join("keymanager").join(CONFIG_FILE_NAME))
    } else {
        dirs::home_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
