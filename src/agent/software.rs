// src/agent/software.rs
//! In-process agent for offline runs and tests
//!
//! Sign: `value || BLAKE3 keyed_hash(material, value)`.
//! Encrypt: AES-Crypt v3 with the hex material as password.

use std::io::Cursor;

use aescrypt_rs::aliases::Password;
use aescrypt_rs::{decrypt, encrypt};

use super::CryptoAgent;
use crate::consts::{SIGNATURE_LEN, SOFTWARE_AGENT_KDF_ITERATIONS};
use crate::error::AgentError;
use crate::root_key::RootKeyHandle;

#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareAgent;

impl SoftwareAgent {
    pub fn new() -> Self {
        Self
    }

    /// Check a signed artifact and return the original payload
    pub fn verify<'a>(signed: &'a [u8], root: &RootKeyHandle) -> Result<&'a [u8], AgentError> {
        if signed.len() < SIGNATURE_LEN {
            return Err(AgentError::BadSignature);
        }
        let (payload, tag) = signed.split_at(signed.len() - SIGNATURE_LEN);
        let tag: [u8; SIGNATURE_LEN] = tag.try_into().map_err(|_| AgentError::BadSignature)?;
        let expected = blake3::keyed_hash(root.material().expose_secret(), payload);
        // blake3::Hash equality is constant-time
        if expected == blake3::Hash::from(tag) {
            Ok(payload)
        } else {
            Err(AgentError::BadSignature)
        }
    }

    /// Reverse `encrypt`
    pub fn decrypt(ciphertext: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        let password = password_for(root);
        let mut out = Vec::new();
        decrypt(Cursor::new(ciphertext), &mut out, &password)?;
        Ok(out)
    }
}

impl CryptoAgent for SoftwareAgent {
    fn sign(&self, value: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        let tag = blake3::keyed_hash(root.material().expose_secret(), value);
        let mut out = Vec::with_capacity(value.len() + SIGNATURE_LEN);
        out.extend_from_slice(value);
        out.extend_from_slice(tag.as_bytes());
        Ok(out)
    }

    fn encrypt(&self, value: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        let password = password_for(root);
        let mut out = Vec::new();
        encrypt(
            Cursor::new(value),
            &mut out,
            &password,
            SOFTWARE_AGENT_KDF_ITERATIONS,
        )?;
        Ok(out)
    }
}

fn password_for(root: &RootKeyHandle) -> Password {
    Password::new(root.material_hex().expose_secret().clone())
}
