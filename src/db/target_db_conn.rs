// src/db/target_db_conn.rs
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::target_db_ops::{append_trust_list_version, store_record};
use super::{RecordSink, TargetStore};
use crate::enums::{RecordTransform, TargetSchemaKind};
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteTargetStore;

/// One open target database, bound to its shape and transform
pub struct SqliteRecordSink {
    conn: Connection,
    schema: TargetSchemaKind,
    transform: RecordTransform,
}

impl SqliteRecordSink {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TargetStore for SqliteTargetStore {
    type Sink = SqliteRecordSink;

    fn open(
        &self,
        path: &Path,
        schema: TargetSchemaKind,
        transform: RecordTransform,
    ) -> Result<Self::Sink, StoreError> {
        let conn = open_target_db(path, schema, transform)?;
        Ok(SqliteRecordSink {
            conn,
            schema,
            transform,
        })
    }
}

impl RecordSink for SqliteRecordSink {
    fn put(&mut self, key: &[u8], artifact: &[u8]) -> Result<(), StoreError> {
        match self.schema {
            TargetSchemaKind::GenericRecord => {
                store_record(&self.conn, key, artifact, self.transform)?;
            }
            TargetSchemaKind::TrustListVersion => {
                append_trust_list_version(&mut self.conn, key, artifact, self.transform)?;
            }
        }
        Ok(())
    }
}

/// Open or create a target database and make sure it has the expected shape
pub fn open_target_db(
    path: &Path,
    schema: TargetSchemaKind,
    transform: RecordTransform,
) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS store_meta (
            name TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;

    check_or_record_meta(&conn, schema, transform)?;

    match schema {
        TargetSchemaKind::GenericRecord => conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                key BLOB PRIMARY KEY,
                artifact BLOB NOT NULL,
                transform TEXT NOT NULL,
                migrated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?,
        TargetSchemaKind::TrustListVersion => conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS trust_list_versions (
                key BLOB NOT NULL,
                version INTEGER NOT NULL,
                artifact BLOB NOT NULL,
                transform TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (key, version)
            );

            CREATE INDEX IF NOT EXISTS idx_trust_list_versions_key
                ON trust_list_versions(key);
            "#,
        )?,
    }

    Ok(conn)
}

/// First open records schema + transform; later opens must agree with them
fn check_or_record_meta(
    conn: &Connection,
    schema: TargetSchemaKind,
    transform: RecordTransform,
) -> Result<(), StoreError> {
    let found_schema = read_meta(conn, "schema_kind")?;
    let found_transform = read_meta(conn, "transform")?;

    match (found_schema, found_transform) {
        (None, None) => {
            conn.execute(
                "INSERT INTO store_meta (name, value) VALUES ('schema_kind', ?1), ('transform', ?2)",
                params![schema.as_str(), transform.as_str()],
            )?;
            Ok(())
        }
        (found_schema, found_transform) => {
            let found_schema = found_schema.unwrap_or_default();
            let found_transform = found_transform.unwrap_or_default();
            let parsed_schema: TargetSchemaKind = found_schema.parse()?;
            let parsed_transform: RecordTransform = found_transform.parse()?;
            if parsed_schema != schema || parsed_transform != transform {
                return Err(StoreError::SchemaMismatch {
                    expected_schema: schema,
                    expected_transform: transform,
                    found_schema,
                    found_transform,
                });
            }
            Ok(())
        }
    }
}

fn read_meta(conn: &Connection, name: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM store_meta WHERE name = ?1",
        [name],
        |row| row.get(0),
    )
    .optional()
}
