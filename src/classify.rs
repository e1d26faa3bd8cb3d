// src/classify.rs
//! Database classification
//!
//! Scans the source directory once and splits the legacy databases into
//! public (signed) and restricted (encrypted) sets. Schema kind and class
//! are decided here and carried with the name for the rest of the run.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::consts::LEGACY_DB_EXTENSION;
use crate::enums::{ConversionClass, RecordTransform, TargetSchemaKind};
use crate::error::{MigrateError, Result};

/// Legacy file name without its extension
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DatabaseName(String);

impl DatabaseName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of this database inside the source directory
    pub fn legacy_file_name(&self) -> String {
        format!("{}{}", self.0, LEGACY_DB_EXTENSION)
    }
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for DatabaseName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A classified database as it flows through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseEntry {
    pub name: DatabaseName,
    pub class: ConversionClass,
    pub schema: TargetSchemaKind,
}

impl DatabaseEntry {
    pub fn new(name: DatabaseName, marker: &str) -> Self {
        let class = classify_name(name.as_str(), marker);
        let schema = TargetSchemaKind::for_database(name.as_str());
        Self {
            name,
            class,
            schema,
        }
    }

    pub fn transform(&self) -> RecordTransform {
        self.class.transform()
    }
}

/// Both sets, each sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub public: Vec<DatabaseEntry>,
    pub restricted: Vec<DatabaseEntry>,
}

impl Classification {
    pub fn contains_public(&self, name: &str) -> bool {
        self.public.iter().any(|e| e.name == *name)
    }

    pub fn len(&self) -> usize {
        self.public.len() + self.restricted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Public entries first, then restricted: the conversion order
    pub fn in_conversion_order(&self) -> impl Iterator<Item = &DatabaseEntry> {
        self.public.iter().chain(self.restricted.iter())
    }
}

/// Names containing the marker are restricted; everything else, including
/// the empty name, is public.
pub fn classify_name(name: &str, marker: &str) -> ConversionClass {
    if !marker.is_empty() && name.contains(marker) {
        ConversionClass::Restricted
    } else {
        ConversionClass::Public
    }
}

/// List `<name>.db` regular files in `dir` and classify them
pub fn classify(dir: &Path, marker: &str) -> Result<Classification> {
    let source_err = |source| MigrateError::SourceDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut out = Classification::default();
    for entry in std::fs::read_dir(dir).map_err(source_err)? {
        let entry = entry.map_err(source_err)?;
        let path = entry.path();

        // Follows symlinks, like a plain `is_file` check
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            _ => continue,
        }

        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            warn!("Skipping non UTF-8 file name {}", path.display());
            continue;
        };
        let Some(stem) = file_name.strip_suffix(LEGACY_DB_EXTENSION) else {
            continue;
        };

        let db = DatabaseEntry::new(DatabaseName::new(stem), marker);
        debug!(name = %db.name, class = ?db.class, schema = %db.schema, "classified");
        match db.class {
            ConversionClass::Public => out.public.push(db),
            ConversionClass::Restricted => out.restricted.push(db),
        }
    }

    out.public.sort_by(|a, b| a.name.cmp(&b.name));
    out.restricted.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}
