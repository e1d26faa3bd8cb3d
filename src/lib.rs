// src/lib.rs
//! keydb-migrate: one-shot migration of legacy key databases
//!
//! Features:
//! - Public / restricted classification by database name
//! - Root key (`UpperLevelKeys`) resolved once, before any conversion
//! - Per-record sign / encrypt through a pluggable crypto agent
//! - Generic and versioned trust-list target stores

pub mod agent;
pub mod aliases;
pub mod classify;
pub mod config;
pub mod consts;
pub mod db;
pub mod enums;
pub mod error;
pub mod migrate;
pub mod root_key;
pub mod writer;

// Re-export everything users need at the crate root
pub use agent::{AgentSettings, CryptoAgent, ProcessAgent, SoftwareAgent};
pub use classify::{classify, Classification, DatabaseEntry, DatabaseName};
pub use config::{ConfigFile, MigrationConfig, RunOptions};
pub use db::{SqliteLegacyReader, SqliteTargetStore};
pub use enums::{AgentMode, ConversionClass, EmulatorMode, RecordTransform, TargetSchemaKind};
pub use error::{AgentError, ConfigError, MigrateError, Result, StoreError};
pub use migrate::{DatabaseReport, MigrationReport, Migrator};
pub use root_key::{resolve_root_key, RootKeyHandle};
