// src/db/mod.rs
//! Storage collaborators
//!
//! The migrator only sees the traits below. The SQLite implementations in
//! the submodules are what the binary wires in.

use std::collections::BTreeMap;
use std::path::Path;

use crate::enums::{RecordTransform, TargetSchemaKind};
use crate::error::StoreError;

pub mod legacy_db_conn;
pub mod target_db_conn;
pub mod target_db_ops;

pub use legacy_db_conn::{SqliteLegacyDatabase, SqliteLegacyReader};
pub use target_db_conn::{SqliteRecordSink, SqliteTargetStore};

/// Full key → value content of one legacy database
pub type LegacyData = BTreeMap<Vec<u8>, Vec<u8>>;

/// Opens legacy databases by path
pub trait LegacyReader {
    type Database: LegacyDatabase;

    fn open(&self, path: &Path) -> Result<Self::Database, StoreError>;
}

/// An opened legacy database
pub trait LegacyDatabase {
    fn all_data(&self) -> Result<LegacyData, StoreError>;
}

/// Opens or creates target databases of a given shape
pub trait TargetStore {
    type Sink: RecordSink;

    fn open(
        &self,
        path: &Path,
        schema: TargetSchemaKind,
        transform: RecordTransform,
    ) -> Result<Self::Sink, StoreError>;
}

/// Persists already-transformed artifacts
pub trait RecordSink {
    fn put(&mut self, key: &[u8], artifact: &[u8]) -> Result<(), StoreError>;
}

impl<T: LegacyReader + ?Sized> LegacyReader for &T {
    type Database = T::Database;

    fn open(&self, path: &Path) -> Result<Self::Database, StoreError> {
        (**self).open(path)
    }
}

impl<T: TargetStore + ?Sized> TargetStore for &T {
    type Sink = T::Sink;

    fn open(
        &self,
        path: &Path,
        schema: TargetSchemaKind,
        transform: RecordTransform,
    ) -> Result<Self::Sink, StoreError> {
        (**self).open(path, schema, transform)
    }
}
