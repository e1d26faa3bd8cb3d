// src/db/legacy_db_conn.rs
//! Read-only access to legacy key databases
//!
//! A legacy database is a SQLite file with a single `data(key, value)`
//! table. Keys and values may be stored as TEXT or BLOB; both come back
//! as raw bytes.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use super::{LegacyData, LegacyDatabase, LegacyReader};
use crate::consts::LEGACY_TABLE;
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteLegacyReader;

pub struct SqliteLegacyDatabase {
    conn: Connection,
}

impl LegacyReader for SqliteLegacyReader {
    type Database = SqliteLegacyDatabase;

    fn open(&self, path: &Path) -> Result<Self::Database, StoreError> {
        open_legacy_db(path).map(|conn| SqliteLegacyDatabase { conn })
    }
}

impl LegacyDatabase for SqliteLegacyDatabase {
    fn all_data(&self) -> Result<LegacyData, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT key, value FROM {LEGACY_TABLE}"))?;

        let rows = stmt.query_map([], |row| {
            Ok((as_bytes(row.get_ref(0)?), as_bytes(row.get_ref(1)?)))
        })?;

        let mut data = LegacyData::new();
        for row in rows {
            let (key, value) = row?;
            data.insert(key, value);
        }
        Ok(data)
    }
}

/// Open an existing legacy database without ever creating or writing it
pub fn open_legacy_db(path: &Path) -> Result<Connection, StoreError> {
    // SQLite would happily report "unable to open"; keep the real IO error
    std::fs::metadata(path)?;

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

fn as_bytes(value: ValueRef<'_>) -> Vec<u8> {
    match value {
        ValueRef::Text(b) | ValueRef::Blob(b) => b.to_vec(),
        ValueRef::Integer(i) => i.to_string().into_bytes(),
        ValueRef::Real(f) => f.to_string().into_bytes(),
        ValueRef::Null => Vec::new(),
    }
}
