// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the closed sets a run is built from: conversion
//! classes, record transforms, target schema kinds and agent modes.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::consts::TRUST_LIST_VERSIONS_DB;
use crate::error::StoreError;

/// Class of a legacy database, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionClass {
    Public,
    Restricted,
}

impl ConversionClass {
    /// Restricted databases are encrypted, everything else is signed
    pub const fn transform(self) -> RecordTransform {
        match self {
            ConversionClass::Public => RecordTransform::Sign,
            ConversionClass::Restricted => RecordTransform::Encrypt,
        }
    }
}

/// Cryptographic operation applied to every value before it is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordTransform {
    Sign,
    Encrypt,
}

impl RecordTransform {
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordTransform::Sign => "sign",
            RecordTransform::Encrypt => "encrypt",
        }
    }
}

impl fmt::Display for RecordTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordTransform {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sign" => Ok(RecordTransform::Sign),
            "encrypt" => Ok(RecordTransform::Encrypt),
            other => Err(StoreError::UnknownTransform(other.to_owned())),
        }
    }
}

/// Shape of the target store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSchemaKind {
    GenericRecord,
    TrustListVersion,
}

impl TargetSchemaKind {
    /// Only the exact name `TrustListVersions` gets the versioned shape
    pub fn for_database(name: &str) -> Self {
        if name == TRUST_LIST_VERSIONS_DB {
            TargetSchemaKind::TrustListVersion
        } else {
            TargetSchemaKind::GenericRecord
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TargetSchemaKind::GenericRecord => "generic_record",
            TargetSchemaKind::TrustListVersion => "trust_list_version",
        }
    }
}

impl fmt::Display for TargetSchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetSchemaKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic_record" => Ok(TargetSchemaKind::GenericRecord),
            "trust_list_version" => Ok(TargetSchemaKind::TrustListVersion),
            other => Err(StoreError::UnknownSchemaKind(other.to_owned())),
        }
    }
}

/// Emulator firmware flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmulatorMode {
    #[default]
    Main,
    Dev,
}

impl EmulatorMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            EmulatorMode::Main => "main",
            EmulatorMode::Dev => "dev",
        }
    }
}

/// Run-wide choice between live hardware and the emulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    Hardware,
    Emulator(EmulatorMode),
}

impl AgentMode {
    pub const fn is_emulator(self) -> bool {
        matches!(self, AgentMode::Emulator(_))
    }
}
