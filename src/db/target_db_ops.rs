//! Target database write operations
//!
//! Generic stores keep one artifact per key. The trust-list store keeps a
//! version history per key: each save appends the next version number.

use rusqlite::{params, Connection};

use crate::enums::RecordTransform;

/// Insert or replace the artifact stored under `key`
pub fn store_record(
    conn: &Connection,
    key: &[u8],
    artifact: &[u8],
    transform: RecordTransform,
) -> rusqlite::Result<()> {
    conn.execute(
        r#"
        INSERT OR REPLACE INTO records (key, artifact, transform, migrated_at)
        VALUES (?1, ?2, ?3, datetime('now'))
        "#,
        params![key, artifact, transform.as_str()],
    )?;
    Ok(())
}

/// Append a new trust-list version for `key`, returns the version written
pub fn append_trust_list_version(
    conn: &mut Connection,
    key: &[u8],
    artifact: &[u8],
    transform: RecordTransform,
) -> rusqlite::Result<i64> {
    let tx = conn.transaction()?;
    let version: i64 = tx.query_row(
        "SELECT COALESCE(MAX(version), 0) + 1 FROM trust_list_versions WHERE key = ?1",
        [key],
        |row| row.get(0),
    )?;
    tx.execute(
        "INSERT INTO trust_list_versions (key, version, artifact, transform)
         VALUES (?1, ?2, ?3, ?4)",
        params![key, version, artifact, transform.as_str()],
    )?;
    tx.commit()?;
    Ok(version)
}

/// Latest artifact for `key` in a generic store
pub fn load_record(conn: &Connection, key: &[u8]) -> rusqlite::Result<Option<Vec<u8>>> {
    use rusqlite::OptionalExtension;

    conn.query_row(
        "SELECT artifact FROM records WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .optional()
}

/// Highest version and its artifact for `key` in a trust-list store
pub fn load_latest_trust_list_version(
    conn: &Connection,
    key: &[u8],
) -> rusqlite::Result<Option<(i64, Vec<u8>)>> {
    use rusqlite::OptionalExtension;

    conn.query_row(
        "SELECT version, artifact FROM trust_list_versions
         WHERE key = ?1 ORDER BY version DESC LIMIT 1",
        [key],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}
