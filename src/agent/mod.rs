// src/agent/mod.rs
//! Crypto agents: the providers that sign or encrypt each record
//!
//! `ProcessAgent` drives the dongles CLI (hardware or emulator);
//! `SoftwareAgent` does the same job in-process.

use std::path::PathBuf;

use crate::enums::{AgentMode, RecordTransform};
use crate::error::AgentError;
use crate::root_key::RootKeyHandle;

mod process;
mod software;

pub use process::ProcessAgent;
pub use software::SoftwareAgent;

/// How the agent is addressed for the whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub mode: AgentMode,
    pub cli_path: PathBuf,
}

pub trait CryptoAgent {
    fn sign(&self, value: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError>;

    fn encrypt(&self, value: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError>;

    /// Dispatch on the bound transform
    fn apply(
        &self,
        transform: RecordTransform,
        value: &[u8],
        root: &RootKeyHandle,
    ) -> Result<Vec<u8>, AgentError> {
        match transform {
            RecordTransform::Sign => self.sign(value, root),
            RecordTransform::Encrypt => self.encrypt(value, root),
        }
    }
}

impl<T: CryptoAgent + ?Sized> CryptoAgent for &T {
    fn sign(&self, value: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        (**self).sign(value, root)
    }

    fn encrypt(&self, value: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        (**self).encrypt(value, root)
    }
}

impl<T: CryptoAgent + ?Sized> CryptoAgent for Box<T> {
    fn sign(&self, value: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        (**self).sign(value, root)
    }

    fn encrypt(&self, value: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        (**self).encrypt(value, root)
    }
}
