// src/config/app.rs
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::defaults::default_secrecy_marker;
use crate::agent::AgentSettings;
use crate::enums::{AgentMode, EmulatorMode};
use crate::error::ConfigError;

const MAIN_SECTION: &str = "main";
const CLI_PATH_KEY: &str = "dongles_cli_path";
const EMULATOR_PATH_KEY: &str = "dongles_cli_emulator_path";

/// Raw configuration file as parsed from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub main: Option<MainSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainSection {
    pub dongles_cli_path: Option<PathBuf>,
    pub dongles_cli_emulator_path: Option<PathBuf>,
    pub secrecy_marker: Option<String>,
}

impl ConfigFile {
    /// Read and parse a configuration file, then check required keys
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Err(ConfigError::Empty {
                path: path.to_path_buf(),
            });
        }

        let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        file.check()?;
        Ok(file)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let main = self.main.as_ref().ok_or(ConfigError::MissingSection {
            section: MAIN_SECTION,
        })?;

        if main.dongles_cli_path.is_none() {
            return Err(ConfigError::MissingKey {
                section: MAIN_SECTION,
                key: CLI_PATH_KEY,
            });
        }
        if main.dongles_cli_emulator_path.is_none() {
            return Err(ConfigError::MissingKey {
                section: MAIN_SECTION,
                key: EMULATOR_PATH_KEY,
            });
        }
        Ok(())
    }
}

/// Run parameters that come from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    pub emulator: bool,
    pub development: bool,
}

/// Everything a run needs, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub agent: AgentSettings,
    pub secrecy_marker: String,
}

impl MigrationConfig {
    /// Combine CLI options with a checked config file
    pub fn build(options: RunOptions, file: &ConfigFile) -> Result<Self, ConfigError> {
        file.check()?;
        let main = file.main.as_ref().ok_or(ConfigError::MissingSection {
            section: MAIN_SECTION,
        })?;

        let mode = if options.emulator {
            AgentMode::Emulator(if options.development {
                EmulatorMode::Dev
            } else {
                EmulatorMode::Main
            })
        } else {
            AgentMode::Hardware
        };

        let (cli_path, key) = if mode.is_emulator() {
            (main.dongles_cli_emulator_path.clone(), EMULATOR_PATH_KEY)
        } else {
            (main.dongles_cli_path.clone(), CLI_PATH_KEY)
        };
        let cli_path = cli_path.ok_or(ConfigError::MissingKey {
            section: MAIN_SECTION,
            key,
        })?;

        let secrecy_marker = main
            .secrecy_marker
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(default_secrecy_marker);

        Ok(Self {
            source_dir: options.input_folder,
            target_dir: options.output_folder,
            agent: AgentSettings { mode, cli_path },
            secrecy_marker,
        })
    }
}
