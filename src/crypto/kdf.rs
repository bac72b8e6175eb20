//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The cost parameters are persisted alongside the
//! salt in the vault metadata so the exact same key can be re-derived on
//! every unlock.

use std::thread::{self, JoinHandle};
use std::time::Instant;

use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::keys::DerivedKey;
use crate::errors::{Result, VaultError};

/// Length of a freshly generated salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Shortest salt accepted when deriving a key.
pub const MIN_SALT_LEN: usize = 8;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Shortest derived key we are willing to produce.
pub const MIN_KEY_LEN: u32 = 16;

/// Argon2id cost parameters.
///
/// Serialized as JSON under the `argon2_params` metadata key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostParams {
    /// Number of passes over memory (t_cost).
    pub time_cost: u32,
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Parallelism lanes.
    pub parallelism: u32,
    /// Length of the derived key in bytes.
    pub key_length: u32,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            time_cost: 3,
            memory_kib: 65_536,
            parallelism: 4,
            key_length: 32,
        }
    }
}

impl CostParams {
    /// Reject zero or dangerously low values.
    pub fn validate(&self) -> Result<()> {
        if self.time_cost == 0 {
            return Err(VaultError::InvalidInput(
                "Argon2 time cost must be at least 1".into(),
            ));
        }
        if self.parallelism == 0 {
            return Err(VaultError::InvalidInput(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        if self.key_length < MIN_KEY_LEN {
            return Err(VaultError::InvalidInput(format!(
                "derived key length must be at least {MIN_KEY_LEN} bytes (got {})",
                self.key_length
            )));
        }
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::InvalidInput(format!(
                "Argon2 memory cost must be at least {MIN_MEMORY_KIB} KiB (got {})",
                self.memory_kib
            )));
        }
        Ok(())
    }
}

/// Derive a key from a password and salt with explicit Argon2id parameters.
///
/// The same password + salt + params will always produce the same key.
pub fn derive_key(password: &[u8], salt: &[u8], cost: &CostParams) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(VaultError::InvalidInput("password cannot be empty".into()));
    }
    if salt.len() < MIN_SALT_LEN {
        return Err(VaultError::InvalidInput(format!(
            "salt must be at least {MIN_SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    cost.validate()?;

    let key_len = usize::try_from(cost.key_length)
        .map_err(|_| VaultError::InvalidInput("derived key length out of range".into()))?;

    let params = Params::new(
        cost.memory_kib,
        cost.time_cost,
        cost.parallelism,
        Some(key_len),
    )
    .map_err(|e| VaultError::InvalidInput(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let started = Instant::now();
    let mut key = Zeroizing::new(vec![0u8; key_len]);
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| VaultError::InvalidInput(format!("Argon2id hashing failed: {e}")))?;

    tracing::debug!(
        elapsed = ?started.elapsed(),
        memory_kib = cost.memory_kib,
        time_cost = cost.time_cost,
        "derived key"
    );

    Ok(DerivedKey::from_zeroizing(key))
}

/// Run `derive_key` on a dedicated thread.
///
/// The derivation cannot be cancelled: joining the handle yields either
/// the complete key or an error.
pub fn spawn_derive_key(
    password: Zeroizing<Vec<u8>>,
    salt: Vec<u8>,
    cost: CostParams,
) -> JoinHandle<Result<DerivedKey>> {
    thread::spawn(move || derive_key(&password, &salt, &cost))
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| VaultError::RandomSourceFailure(e.to_string()))?;
    Ok(salt)
}
