// src/writer.rs
//! Target writer binding
//!
//! Ties one target store to the transform of its database, the shared
//! root key and the crypto agent. `save` transforms first and persists
//! second; either failure names the database and key.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::agent::CryptoAgent;
use crate::classify::DatabaseEntry;
use crate::consts::TARGET_DB_EXTENSION;
use crate::db::{RecordSink, TargetStore};
use crate::enums::RecordTransform;
use crate::error::{display_key, MigrateError, Result};
use crate::root_key::RootKeyHandle;

/// Location of the converted database for `entry`
pub fn target_path(target_dir: &Path, entry: &DatabaseEntry) -> PathBuf {
    target_dir.join(format!("{}.{}", entry.name, TARGET_DB_EXTENSION))
}

pub struct BoundWriter<'r, S, A> {
    entry: &'r DatabaseEntry,
    sink: S,
    transform: RecordTransform,
    root: &'r RootKeyHandle,
    agent: &'r A,
    written: usize,
}

impl<'r, S, A> BoundWriter<'r, S, A>
where
    S: RecordSink,
    A: CryptoAgent,
{
    /// Open the target store for `entry` with the shape picked at classification
    pub fn open<T>(
        store: &T,
        target_dir: &Path,
        entry: &'r DatabaseEntry,
        root: &'r RootKeyHandle,
        agent: &'r A,
    ) -> Result<Self>
    where
        T: TargetStore<Sink = S>,
    {
        let transform = entry.transform();
        let path = target_path(target_dir, entry);
        let sink = store
            .open(&path, entry.schema, transform)
            .map_err(|source| MigrateError::TargetOpen {
                database: entry.name.to_string(),
                source,
            })?;

        Ok(Self {
            entry,
            sink,
            transform,
            root,
            agent,
            written: 0,
        })
    }

    pub fn save(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let artifact = self
            .agent
            .apply(self.transform, value, self.root)
            .map_err(|source| MigrateError::Transform {
                database: self.entry.name.to_string(),
                key: display_key(key),
                transform: self.transform,
                source,
            })?;

        self.sink
            .put(key, &artifact)
            .map_err(|source| MigrateError::Persist {
                database: self.entry.name.to_string(),
                key: display_key(key),
                source,
            })?;

        self.written += 1;
        debug!(database = %self.entry.name, key = %display_key(key), "saved");
        Ok(())
    }

    pub fn transform(&self) -> RecordTransform {
        self.transform
    }

    /// Close the store and return how many records went through
    pub fn finish(self) -> usize {
        self.written
    }
}
