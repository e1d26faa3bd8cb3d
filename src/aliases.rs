// src/aliases.rs
//! Re-exports secure-gate's secret types used for key material
//!
//! Anything derived from the root key database lives in one of these
//! wrappers so it is zeroized on drop.

pub use secure_gate::{dynamic_alias, fixed_alias};

// 256-bit digest over the UpperLevelKeys records
fixed_alias!(RootKeyMaterial, 32);

// Hex form of the material, handed to agents as a password / CLI argument
dynamic_alias!(MaterialHex, String);
