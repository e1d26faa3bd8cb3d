// src/error.rs
//! Public error types for the entire crate
//!
//! Every fatal condition of a run maps onto one `MigrateError` variant.
//! Variants raised while converting a database carry its name, and
//! per-record variants carry the offending key as well.

use std::path::PathBuf;

use aescrypt_rs::AescryptError;
use thiserror::Error;

use crate::enums::{RecordTransform, TargetSchemaKind};

pub type Result<T> = std::result::Result<T, MigrateError>;

/// Configuration file problems, always raised before any conversion
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("can't read configuration file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file is empty! Please setup config at {path}")]
    Empty { path: PathBuf },

    #[error("invalid TOML in configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing section [{section}] in config")]
    MissingSection { section: &'static str },

    #[error("missing config parameter {key} in section [{section}]")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },

    #[error("no configuration path could be determined (HOME is not set)")]
    NoConfigPath,
}

/// Failures reported by a crypto agent for a single payload
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("failed to launch crypto agent {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("crypto agent I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("crypto agent rejected {operation} (exit status {status}): {stderr}")]
    Rejected {
        operation: RecordTransform,
        status: String,
        stderr: String,
    },

    #[error("crypto agent returned malformed output: {0}")]
    MalformedOutput(#[from] base64::DecodeError),

    #[error("software crypto failed: {0}")]
    Crypto(AescryptError),

    #[error("signature does not match payload")]
    BadSignature,
}

impl From<AescryptError> for AgentError {
    fn from(err: AescryptError) -> Self {
        AgentError::Crypto(err)
    }
}

/// Legacy and target storage failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("target store was created as {found_schema}/{found_transform}, expected {expected_schema}/{expected_transform}")]
    SchemaMismatch {
        expected_schema: TargetSchemaKind,
        expected_transform: RecordTransform,
        found_schema: String,
        found_transform: String,
    },

    #[error("unknown record transform {0:?}")]
    UnknownTransform(String),

    #[error("unknown target schema kind {0:?}")]
    UnknownSchemaKind(String),
}

/// Fatal run errors, any of these stops the whole migration
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("can't find {name} db in {}", dir.display())]
    MissingRootKey { name: &'static str, dir: PathBuf },

    #[error("root key database {name} holds no records")]
    EmptyRootKey { name: String },

    #[error("can't read source directory {}: {source}", path.display())]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't read legacy database {database}: {source}")]
    LegacyRead {
        database: String,
        #[source]
        source: StoreError,
    },

    #[error("can't open target database {database}: {source}")]
    TargetOpen {
        database: String,
        #[source]
        source: StoreError,
    },

    #[error("{transform} failed for key {key:?} in database {database}: {source}")]
    Transform {
        database: String,
        key: String,
        transform: RecordTransform,
        #[source]
        source: AgentError,
    },

    #[error("failed to save key {key:?} in database {database}: {source}")]
    Persist {
        database: String,
        key: String,
        #[source]
        source: StoreError,
    },
}

/// Render an opaque record key for operator messages
pub fn display_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}
