//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`cipher`)
//! - Argon2id password-based key derivation (`kdf`)
//! - The zeroizing `DerivedKey` and the HKDF/HMAC key verifier (`keys`)

pub mod cipher;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use cipher::{decrypt, encrypt};
pub use kdf::{derive_key, generate_salt, spawn_derive_key, CostParams};
pub use keys::DerivedKey;
