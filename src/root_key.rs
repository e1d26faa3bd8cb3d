// src/root_key.rs
//! Root key resolution
//!
//! Every record transform needs the upper-level key material, so the
//! `UpperLevelKeys` database is opened exactly once, before any
//! conversion, and shared read-only for the rest of the run.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::aliases::{MaterialHex, RootKeyMaterial};
use crate::classify::{Classification, DatabaseName};
use crate::consts::{ROOT_KEY_CONTEXT, ROOT_KEY_DB};
use crate::db::{LegacyData, LegacyDatabase, LegacyReader};
use crate::error::{MigrateError, Result};

/// Opened root key database and the material derived from it
pub struct RootKeyHandle {
    name: DatabaseName,
    path: PathBuf,
    records: usize,
    material: RootKeyMaterial,
}

impl RootKeyHandle {
    pub fn from_data(name: DatabaseName, path: PathBuf, data: &LegacyData) -> Result<Self> {
        if data.is_empty() {
            return Err(MigrateError::EmptyRootKey {
                name: name.to_string(),
            });
        }
        Ok(Self {
            name,
            path,
            records: data.len(),
            material: derive_material(data),
        })
    }

    pub fn name(&self) -> &DatabaseName {
        &self.name
    }

    pub fn records(&self) -> usize {
        self.records
    }

    pub fn material(&self) -> &RootKeyMaterial {
        &self.material
    }

    pub fn material_hex(&self) -> MaterialHex {
        MaterialHex::new(hex::encode(self.material.expose_secret()))
    }
}

impl std::fmt::Debug for RootKeyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootKeyHandle")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

/// BLAKE3 derive-key over length-prefixed records in key order
pub fn derive_material(data: &LegacyData) -> RootKeyMaterial {
    let mut hasher = blake3::Hasher::new_derive_key(ROOT_KEY_CONTEXT);
    for (key, value) in data {
        hasher.update(&(key.len() as u64).to_le_bytes());
        hasher.update(key);
        hasher.update(&(value.len() as u64).to_le_bytes());
        hasher.update(value);
    }
    RootKeyMaterial::new(*hasher.finalize().as_bytes())
}

/// Find `UpperLevelKeys` among the public databases and open it
pub fn resolve_root_key<R: LegacyReader>(
    classification: &Classification,
    source_dir: &Path,
    reader: &R,
) -> Result<RootKeyHandle> {
    if !classification.contains_public(ROOT_KEY_DB) {
        return Err(MigrateError::MissingRootKey {
            name: ROOT_KEY_DB,
            dir: source_dir.to_path_buf(),
        });
    }

    let name = DatabaseName::new(ROOT_KEY_DB);
    let path = source_dir.join(name.legacy_file_name());
    let read_err = |source| MigrateError::LegacyRead {
        database: name.to_string(),
        source,
    };

    let data = reader
        .open(&path)
        .map_err(read_err)?
        .all_data()
        .map_err(read_err)?;

    let handle = RootKeyHandle::from_data(name.clone(), path, &data)?;
    info!(
        "Loaded root key material from {} ({} records)",
        handle.name(),
        handle.records()
    );
    Ok(handle)
}
