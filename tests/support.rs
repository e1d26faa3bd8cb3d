// tests/support.rs
//! Test utilities: recording collaborators and SQLite fixtures

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use keydb_migrate::agent::{AgentSettings, CryptoAgent};
use keydb_migrate::db::{LegacyData, LegacyDatabase, LegacyReader, RecordSink, TargetStore};
use keydb_migrate::{
    AgentError, AgentMode, MigrationConfig, RecordTransform, RootKeyHandle, StoreError,
    TargetSchemaKind,
};
use rusqlite::{params, Connection};

/// Everything a collaborator was asked to do, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Call {
    LegacyOpen(String),
    TargetOpen(String, TargetSchemaKind, RecordTransform),
    Agent(RecordTransform, Vec<u8>),
    Put(String, Vec<u8>),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

#[allow(dead_code)]
pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

fn db_name(path: &Path) -> String {
    let file = path.file_name().unwrap().to_str().unwrap();
    file.strip_suffix(".db").unwrap_or(file).to_string()
}

/// Legacy reader serving in-memory mappings by database name
pub struct MockReader {
    pub data: HashMap<String, LegacyData>,
    pub log: CallLog,
}

pub struct MockLegacyDb(LegacyData);

impl LegacyReader for MockReader {
    type Database = MockLegacyDb;

    fn open(&self, path: &Path) -> Result<Self::Database, StoreError> {
        let name = db_name(path);
        self.log.borrow_mut().push(Call::LegacyOpen(name.clone()));
        self.data.get(&name).cloned().map(MockLegacyDb).ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no legacy data for {name}"),
            ))
        })
    }
}

impl LegacyDatabase for MockLegacyDb {
    fn all_data(&self) -> Result<LegacyData, StoreError> {
        Ok(self.0.clone())
    }
}

/// Target store keeping every put in memory, optionally failing one key
pub struct MockStore {
    pub log: CallLog,
    pub stored: Rc<RefCell<HashMap<String, Vec<(Vec<u8>, Vec<u8>)>>>>,
    pub fail_on_key: Option<Vec<u8>>,
}

pub struct MockSink {
    name: String,
    log: CallLog,
    stored: Rc<RefCell<HashMap<String, Vec<(Vec<u8>, Vec<u8>)>>>>,
    fail_on_key: Option<Vec<u8>>,
}

impl TargetStore for MockStore {
    type Sink = MockSink;

    fn open(
        &self,
        path: &Path,
        schema: TargetSchemaKind,
        transform: RecordTransform,
    ) -> Result<Self::Sink, StoreError> {
        let name = db_name(path);
        self.log
            .borrow_mut()
            .push(Call::TargetOpen(name.clone(), schema, transform));
        Ok(MockSink {
            name,
            log: self.log.clone(),
            stored: self.stored.clone(),
            fail_on_key: self.fail_on_key.clone(),
        })
    }
}

impl RecordSink for MockSink {
    fn put(&mut self, key: &[u8], artifact: &[u8]) -> Result<(), StoreError> {
        self.log
            .borrow_mut()
            .push(Call::Put(self.name.clone(), key.to_vec()));
        if self.fail_on_key.as_deref() == Some(key) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "no space left on target volume",
            )));
        }
        self.stored
            .borrow_mut()
            .entry(self.name.clone())
            .or_default()
            .push((key.to_vec(), artifact.to_vec()));
        Ok(())
    }
}

/// Agent that tags values with `S:` / `E:` and can be told to fail
pub struct MockAgent {
    pub log: CallLog,
    pub fail_on: Option<Vec<u8>>,
}

impl MockAgent {
    fn run(&self, transform: RecordTransform, value: &[u8]) -> Result<Vec<u8>, AgentError> {
        self.log
            .borrow_mut()
            .push(Call::Agent(transform, value.to_vec()));
        if self.fail_on.as_deref() == Some(value) {
            return Err(AgentError::Rejected {
                operation: transform,
                status: "1".into(),
                stderr: "dongle not responding".into(),
            });
        }
        let prefix: &[u8] = match transform {
            RecordTransform::Sign => b"S:",
            RecordTransform::Encrypt => b"E:",
        };
        Ok([prefix, value].concat())
    }
}

impl CryptoAgent for MockAgent {
    fn sign(&self, value: &[u8], _root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        self.run(RecordTransform::Sign, value)
    }

    fn encrypt(&self, value: &[u8], _root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        self.run(RecordTransform::Encrypt, value)
    }
}

/// Recording collaborators sharing one call log
pub struct Harness {
    pub log: CallLog,
    pub reader: MockReader,
    pub store: MockStore,
    pub agent: MockAgent,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        let log = call_log();
        Self {
            reader: MockReader {
                data: HashMap::new(),
                log: log.clone(),
            },
            store: MockStore {
                log: log.clone(),
                stored: Rc::new(RefCell::new(HashMap::new())),
                fail_on_key: None,
            },
            agent: MockAgent {
                log: log.clone(),
                fail_on: None,
            },
            log,
        }
    }

    pub fn with_db(mut self, name: &str, records: &[(&str, &str)]) -> Self {
        self.reader.data.insert(name.to_string(), mapping(records));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn target_opens(&self) -> Vec<(String, TargetSchemaKind, RecordTransform)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::TargetOpen(name, schema, transform) => Some((name, schema, transform)),
                _ => None,
            })
            .collect()
    }

    pub fn stored(&self, name: &str) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.store
            .stored
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

#[allow(dead_code)]
pub fn mapping(records: &[(&str, &str)]) -> LegacyData {
    records
        .iter()
        .map(|(k, v)| (k.as_bytes().to_vec(), v.as_bytes().to_vec()))
        .collect()
}

/// Create empty `<name>.db` files so the classifier sees them
#[allow(dead_code)]
pub fn touch_dbs(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(format!("{name}.db")), b"").expect("create legacy file");
    }
}

#[allow(dead_code)]
pub fn test_config(source: &Path, target: &Path) -> MigrationConfig {
    MigrationConfig {
        source_dir: source.to_path_buf(),
        target_dir: target.to_path_buf(),
        agent: AgentSettings {
            mode: AgentMode::Hardware,
            cli_path: PathBuf::from("/nonexistent/dongles-cli"),
        },
        secrecy_marker: "Private".into(),
    }
}

/// Write a real legacy SQLite database with a `data(key, value)` table
#[allow(dead_code)]
pub fn write_legacy_db(dir: &Path, name: &str, records: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(format!("{name}.db"));
    let conn = Connection::open(&path).expect("create legacy db");
    conn.execute_batch("CREATE TABLE data (key TEXT PRIMARY KEY, value BLOB NOT NULL);")
        .expect("create data table");
    for (key, value) in records {
        conn.execute(
            "INSERT INTO data (key, value) VALUES (?1, ?2)",
            params![key, value.as_bytes()],
        )
        .expect("insert legacy record");
    }
    path
}

/// Root key handle over a fixed mapping, for agent-level tests
#[allow(dead_code)]
pub fn root_handle(records: &[(&str, &str)]) -> RootKeyHandle {
    RootKeyHandle::from_data(
        keydb_migrate::DatabaseName::new("UpperLevelKeys"),
        PathBuf::from("UpperLevelKeys.db"),
        &mapping(records),
    )
    .expect("non-empty root key data")
}
