// src/config/mod.rs
//! Configuration system for keydb-migrate
//!
//! TOML config file + CLI options, folded once into an immutable
//! `MigrationConfig` that is passed into the migrator.

pub use app::{ConfigFile, MainSection, MigrationConfig, RunOptions};
pub use defaults::{resolve_config_path, resolve_from, CONFIG_ENV_VAR, SYSTEM_CONFIG_PATH};

mod app;
mod defaults;
