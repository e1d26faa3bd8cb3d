// src/consts.rs
//! Shared constants: naming conventions and crypto parameters

/// Extension of legacy database files in the source directory
pub const LEGACY_DB_EXTENSION: &str = ".db";

/// Extension given to converted databases in the target directory
pub const TARGET_DB_EXTENSION: &str = "db";

/// Database that supplies the upper-level key material
pub const ROOT_KEY_DB: &str = "UpperLevelKeys";

/// Database that is stored with the versioned trust-list shape
pub const TRUST_LIST_VERSIONS_DB: &str = "TrustListVersions";

/// Default substring marking a database as restricted
pub const DEFAULT_SECRECY_MARKER: &str = "Private";

/// Table holding the records of a legacy database
pub const LEGACY_TABLE: &str = "data";

/// BLAKE3 derive-key context for root key material
pub const ROOT_KEY_CONTEXT: &str = "keydb-migrate 2025 upper-level key material v1";

/// KDF iterations for software-agent encryption
// Material is a uniformly random 256-bit digest, stretching adds nothing
pub const SOFTWARE_AGENT_KDF_ITERATIONS: u32 = 1;

/// Length of the BLAKE3 tag appended by the software agent
pub const SIGNATURE_LEN: usize = blake3::OUT_LEN;

/// Header magic for AES-Crypt v3 payloads
pub const AESCRYPT_V3_HEADER: &[u8; 5] = b"AES\x03\x00";
