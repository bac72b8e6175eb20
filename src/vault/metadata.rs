//! Vault metadata — salt, KDF parameters and free-form key/value fields.
//!
//! Everything is stored as an opaque string: the salt base64-encoded,
//! the cost parameters as JSON.  The metadata table never needs to know
//! anything about cryptography; the lifecycle helpers at the bottom of
//! this file tie it to the KDF.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};

use super::db::Vault;
use crate::crypto::cipher::KEY_LEN;
use crate::crypto::kdf::{derive_key, generate_salt, CostParams, MIN_SALT_LEN};
use crate::crypto::keys::{compute_key_check, verify_key_check, DerivedKey};
use crate::errors::{Result, VaultError};

/// Metadata key holding the base64 salt.
pub const META_SALT: &str = "salt";

/// Metadata key holding the JSON cost parameters.
pub const META_ARGON2_PARAMS: &str = "argon2_params";

/// Metadata key holding the vault schema version.
pub const META_VERSION: &str = "version";

/// Metadata key holding the RFC 3339 creation time.
pub const META_CREATED_AT: &str = "created_at";

/// Metadata key holding the base64 key verifier.
pub const META_KEY_CHECK: &str = "key_check";

/// Current vault schema version.
pub const SCHEMA_VERSION: &str = "1";

impl Vault {
    // ------------------------------------------------------------------
    // Raw key/value access
    // ------------------------------------------------------------------

    /// Insert or overwrite a metadata value.
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(VaultError::InvalidInput(
                "metadata key cannot be empty".into(),
            ));
        }

        self.conn
            .execute(
                "INSERT INTO metadata (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(VaultError::persistence("write metadata"))?;
        Ok(())
    }

    /// Read a metadata value, failing with `NotFound` if it is absent.
    pub fn get_meta(&self, key: &str) -> Result<String> {
        if key.is_empty() {
            return Err(VaultError::InvalidInput(
                "metadata key cannot be empty".into(),
            ));
        }
        self.read_meta(key)?
            .ok_or_else(|| VaultError::NotFound(key.to_string()))
    }

    /// Remove a metadata value.
    pub fn delete_meta(&self, key: &str) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM metadata WHERE key = ?1", params![key])
            .map_err(VaultError::persistence("delete metadata"))?;
        if removed == 0 {
            return Err(VaultError::NotFound(key.to_string()));
        }
        Ok(())
    }

    /// All metadata keys, sorted.
    pub fn list_meta_keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM metadata ORDER BY key")
            .map_err(VaultError::persistence("list metadata"))?;
        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(VaultError::persistence("list metadata"))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row.map_err(VaultError::persistence("read metadata key"))?);
        }
        Ok(keys)
    }

    pub(crate) fn read_meta(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM metadata WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(VaultError::persistence("read metadata"))
    }

    // ------------------------------------------------------------------
    // Salt and cost parameters
    // ------------------------------------------------------------------

    /// Store the KDF salt (base64-encoded).
    pub fn set_salt(&self, salt: &[u8]) -> Result<()> {
        if salt.len() < MIN_SALT_LEN {
            return Err(VaultError::InvalidInput(format!(
                "salt must be at least {MIN_SALT_LEN} bytes (got {})",
                salt.len()
            )));
        }
        self.set_meta(META_SALT, &BASE64.encode(salt))
    }

    /// Load the KDF salt.
    pub fn get_salt(&self) -> Result<Vec<u8>> {
        let encoded = self.read_meta(META_SALT)?.ok_or(VaultError::NotInitialized)?;
        BASE64
            .decode(encoded)
            .map_err(|e| VaultError::Serialization(format!("stored salt: {e}")))
    }

    /// Validate and store the KDF cost parameters.
    pub fn set_params(&self, cost: &CostParams) -> Result<()> {
        cost.validate()?;
        let json = serde_json::to_string(cost)
            .map_err(|e| VaultError::Serialization(format!("cost params: {e}")))?;
        self.set_meta(META_ARGON2_PARAMS, &json)
    }

    /// Load the KDF cost parameters, re-validating what was stored.
    pub fn get_params(&self) -> Result<CostParams> {
        let json = self
            .read_meta(META_ARGON2_PARAMS)?
            .ok_or(VaultError::NotInitialized)?;
        let cost: CostParams = serde_json::from_str(&json)
            .map_err(|e| VaultError::Serialization(format!("stored cost params: {e}")))?;
        cost.validate()?;
        Ok(cost)
    }

    /// Return the stored salt, generating and storing one if absent.
    pub fn get_or_init_salt(&self) -> Result<Vec<u8>> {
        if self.read_meta(META_SALT)?.is_some() {
            return self.get_salt();
        }
        let salt = generate_salt()?;
        self.set_salt(&salt)?;
        Ok(salt.to_vec())
    }

    /// Return the stored cost parameters, storing `defaults` if absent.
    pub fn get_or_init_params(&self, defaults: &CostParams) -> Result<CostParams> {
        if self.read_meta(META_ARGON2_PARAMS)?.is_some() {
            return self.get_params();
        }
        self.set_params(defaults)?;
        Ok(*defaults)
    }

    /// `true` once both the salt and the cost parameters are stored.
    ///
    /// A salt on its own (from `get_or_init_salt`) is not enough to unlock
    /// anything, so `initialize` may still run over it.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.read_meta(META_SALT)?.is_some() && self.read_meta(META_ARGON2_PARAMS)?.is_some())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Set up a brand-new vault and return its derived key.
    ///
    /// Salt, parameters, version, creation time and the key verifier are
    /// written in one transaction.
    pub fn initialize(&self, password: &[u8], cost: &CostParams) -> Result<DerivedKey> {
        if self.is_initialized()? {
            return Err(VaultError::AlreadyInitialized);
        }
        cost.validate()?;
        check_cipher_key_length(cost)?;

        let salt = generate_salt()?;
        let key = derive_key(password, &salt, cost)?;
        let key_check = compute_key_check(key.as_bytes())?;

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(VaultError::persistence("begin transaction"))?;
        self.set_salt(&salt)?;
        self.set_params(cost)?;
        self.set_meta(META_VERSION, SCHEMA_VERSION)?;
        self.set_meta(
            META_CREATED_AT,
            &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        )?;
        self.set_meta(META_KEY_CHECK, &BASE64.encode(key_check))?;
        tx.commit()
            .map_err(VaultError::persistence("commit initialization"))?;

        tracing::info!("vault initialized");
        Ok(key)
    }

    /// Re-derive the key from the master password and the stored salt
    /// and parameters.
    pub fn unlock(&self, password: &[u8]) -> Result<DerivedKey> {
        let salt = self.get_salt()?;
        let cost = self.get_params()?;
        let key = derive_key(password, &salt, &cost)?;

        if let Err(e) = self.verify_key(key.as_bytes()) {
            tracing::warn!("vault unlock rejected");
            return Err(e);
        }

        tracing::info!("vault unlocked");
        Ok(key)
    }

    /// Check `key` against the stored verifier.
    ///
    /// Vaults written without a verifier accept any key here; a wrong
    /// key then surfaces on the first decryption instead.
    pub fn verify_key(&self, key: &[u8]) -> Result<()> {
        let Some(encoded) = self.read_meta(META_KEY_CHECK)? else {
            return Ok(());
        };
        let expected = BASE64
            .decode(encoded)
            .map_err(|e| VaultError::Serialization(format!("stored key check: {e}")))?;
        verify_key_check(key, &expected)
    }
}

/// Entries are sealed with AES-256, so the KDF must produce exactly
/// `KEY_LEN` bytes for a vault to be usable.
pub(crate) fn check_cipher_key_length(cost: &CostParams) -> Result<()> {
    if cost.key_length as usize != KEY_LEN {
        return Err(VaultError::InvalidInput(format!(
            "derived key length must be {KEY_LEN} bytes to encrypt entries (got {})",
            cost.key_length
        )));
    }
    Ok(())
}
