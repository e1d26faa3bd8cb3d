// src/migrate.rs
//! Migration orchestrator
//!
//! Order of a run is fixed:
//! 1. classify the source directory
//! 2. resolve the root key (hard stop if missing)
//! 3. convert every public database with `Sign`
//! 4. convert every restricted database with `Encrypt`
//!
//! The first failing record aborts the run. Nothing is retried or skipped.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::agent::CryptoAgent;
use crate::classify::{classify, Classification, DatabaseEntry, DatabaseName};
use crate::config::MigrationConfig;
use crate::db::{LegacyDatabase, LegacyReader, TargetStore};
use crate::enums::{ConversionClass, RecordTransform, TargetSchemaKind};
use crate::error::{MigrateError, Result};
use crate::root_key::{resolve_root_key, RootKeyHandle};
use crate::writer::BoundWriter;

/// Outcome of one converted database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseReport {
    pub name: DatabaseName,
    pub class: ConversionClass,
    pub schema: TargetSchemaKind,
    pub transform: RecordTransform,
    pub records: usize,
}

/// Summary of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub databases: Vec<DatabaseReport>,
}

impl MigrationReport {
    pub fn total_records(&self) -> usize {
        self.databases.iter().map(|d| d.records).sum()
    }
}

pub struct Migrator<R, T, A> {
    source_dir: PathBuf,
    target_dir: PathBuf,
    secrecy_marker: String,
    reader: R,
    store: T,
    agent: A,
}

impl<R, T, A> Migrator<R, T, A>
where
    R: LegacyReader,
    T: TargetStore,
    A: CryptoAgent,
{
    pub fn new(config: &MigrationConfig, reader: R, store: T, agent: A) -> Self {
        Self {
            source_dir: config.source_dir.clone(),
            target_dir: config.target_dir.clone(),
            secrecy_marker: config.secrecy_marker.clone(),
            reader,
            store,
            agent,
        }
    }

    pub fn classify(&self) -> Result<Classification> {
        classify(&self.source_dir, &self.secrecy_marker)
    }

    pub fn run(&self) -> Result<MigrationReport> {
        let started_at = Utc::now();

        let classification = self.classify()?;
        info!(
            "Found {} public and {} restricted database(s) in {}",
            classification.public.len(),
            classification.restricted.len(),
            self.source_dir.display()
        );

        let root = resolve_root_key(&classification, &self.source_dir, &self.reader)?;

        info!("Start convert db's...");
        let mut databases = Vec::with_capacity(classification.len());
        for entry in classification.in_conversion_order() {
            databases.push(self.convert_database(entry, &root)?);
        }
        info!("All convert finished.");

        Ok(MigrationReport {
            source_dir: self.source_dir.clone(),
            target_dir: self.target_dir.clone(),
            started_at,
            finished_at: Utc::now(),
            databases,
        })
    }

    /// Read one legacy database in full and write every key through the agent
    pub fn convert_database(
        &self,
        entry: &DatabaseEntry,
        root: &RootKeyHandle,
    ) -> Result<DatabaseReport> {
        info!("Converting {}...", entry.name);

        let path = self.source_dir.join(entry.name.legacy_file_name());
        let read_err = |source| MigrateError::LegacyRead {
            database: entry.name.to_string(),
            source,
        };
        let data = self
            .reader
            .open(&path)
            .map_err(read_err)?
            .all_data()
            .map_err(read_err)?;

        let mut writer = BoundWriter::open(&self.store, &self.target_dir, entry, root, &self.agent)?;
        for (key, value) in &data {
            writer.save(key, value)?;
        }
        let transform = writer.transform();
        let records = writer.finish();

        info!("Convert finished: {} ({} records, {})", entry.name, records, transform);
        Ok(DatabaseReport {
            name: entry.name.clone(),
            class: entry.class,
            schema: entry.schema,
            transform,
            records,
        })
    }
}
