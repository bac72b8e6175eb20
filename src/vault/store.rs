//! Encrypted record store.
//!
//! Every operation that reads or writes secret fields takes the derived
//! key as an explicit argument; the store never caches it.  Listing and
//! counting work from plaintext columns only, so they stay usable while
//! the vault is locked.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::db::Vault;
use super::entry::{normalize_category, search_text, Entry, EntryPayload, EntrySummary, NewEntry};
use super::metadata::{check_cipher_key_length, META_KEY_CHECK};
use crate::crypto::cipher::{self, KEY_LEN};
use crate::crypto::kdf::{derive_key, generate_salt, CostParams};
use crate::crypto::keys::{compute_key_check, DerivedKey};
use crate::errors::{Result, VaultError};

const SUMMARY_COLUMNS: &str = "id, name, category, created_at, updated_at";

/// The two ciphertexts written for every entry.
struct SealedEntry {
    payload: Vec<u8>,
    search: Vec<u8>,
}

/// Timestamps as they come out of the database, before parsing.
struct RawSummary {
    id: String,
    name: String,
    category: String,
    created_at: String,
    updated_at: String,
}

impl RawSummary {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn into_summary(self) -> Result<EntrySummary> {
        Ok(EntrySummary {
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            id: self.id,
            name: self.name,
            category: self.category,
        })
    }
}

impl Vault {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Encrypt and store a new entry.
    ///
    /// Assigns a fresh id and sets both timestamps to now.
    pub fn create_entry(&self, new: &NewEntry, key: &[u8]) -> Result<Entry> {
        validate_fields(&new.name, &new.password)?;
        validate_key(key)?;

        let name = new.name.trim().to_string();
        if self.name_taken(&name, None)? {
            return Err(VaultError::DuplicateName(name));
        }

        let now = Utc::now();
        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            name,
            category: normalize_category(&new.category),
            username: new.username.clone(),
            password: new.password.clone(),
            url: new.url.clone(),
            notes: new.notes.clone(),
            tags: new.tags.clone(),
            created_at: now,
            updated_at: now,
        };

        let sealed = seal(&entry, key)?;
        let stamp = format_timestamp(&now);

        self.conn
            .execute(
                "INSERT INTO entries (
                    id, name, category, encrypted_payload, encrypted_search,
                    payload_nonce, search_nonce, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    entry.id,
                    entry.name,
                    entry.category,
                    sealed.payload,
                    sealed.search,
                    cipher::nonce_of(&sealed.payload),
                    cipher::nonce_of(&sealed.search),
                    stamp,
                    stamp,
                ],
            )
            .map_err(|e| write_error(e, &entry.name, "insert entry"))?;

        tracing::debug!(id = %entry.id, name = %entry.name, "entry created");
        Ok(entry)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch and decrypt an entry by id.
    pub fn get_entry(&self, id: &str, key: &[u8]) -> Result<Entry> {
        if id.is_empty() {
            return Err(VaultError::Validation("entry id cannot be empty".into()));
        }
        validate_key(key)?;

        let row = self
            .conn
            .query_row(
                "SELECT id, name, category, created_at, updated_at, encrypted_payload
                 FROM entries WHERE id = ?1",
                params![id],
                |row| Ok((RawSummary::from_row(row)?, row.get::<_, Vec<u8>>(5)?)),
            )
            .optional()
            .map_err(VaultError::persistence("query entry"))?;

        let (raw, encrypted_payload) = row.ok_or_else(|| VaultError::NotFound(id.to_string()))?;
        let summary = raw.into_summary()?;
        let payload = open_payload(key, &encrypted_payload)?;

        Ok(Entry {
            id: summary.id,
            name: summary.name,
            category: summary.category,
            username: payload.username.clone(),
            password: payload.password.clone(),
            url: payload.url.clone(),
            notes: payload.notes.clone(),
            tags: payload.tags.clone(),
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        })
    }

    /// Fetch and decrypt an entry by its unique name.
    pub fn get_entry_by_name(&self, name: &str, key: &[u8]) -> Result<Entry> {
        let id = self.find_id_by_name(name)?;
        self.get_entry(&id, key)
    }

    /// Resolve a name to an id without decrypting anything.
    pub fn find_id_by_name(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(VaultError::Validation("entry name cannot be empty".into()));
        }
        self.conn
            .query_row(
                "SELECT id FROM entries WHERE name = ?1",
                params![name.trim()],
                |row| row.get(0),
            )
            .optional()
            .map_err(VaultError::persistence("query entry by name"))?
            .ok_or_else(|| VaultError::NotFound(name.to_string()))
    }

    /// Plaintext metadata for every entry, ordered by name.
    pub fn list_entries(&self) -> Result<Vec<EntrySummary>> {
        self.query_summaries(
            &format!("SELECT {SUMMARY_COLUMNS} FROM entries ORDER BY name ASC"),
            &[],
        )
    }

    /// Plaintext metadata for entries in one category, ordered by name.
    pub fn list_entries_by_category(&self, category: &str) -> Result<Vec<EntrySummary>> {
        self.query_summaries(
            &format!(
                "SELECT {SUMMARY_COLUMNS} FROM entries WHERE category = ?1 ORDER BY name ASC"
            ),
            &[&category],
        )
    }

    /// Find entries whose search text contains every whitespace-separated
    /// term of `query`, ignoring case.
    ///
    /// Decrypts each entry's search blob; an empty query matches all.
    pub fn search_entries(&self, query: &str, key: &[u8]) -> Result<Vec<EntrySummary>> {
        validate_key(key)?;
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {SUMMARY_COLUMNS}, encrypted_search FROM entries ORDER BY name ASC"
            ))
            .map_err(VaultError::persistence("prepare search"))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((RawSummary::from_row(row)?, row.get::<_, Vec<u8>>(5)?))
            })
            .map_err(VaultError::persistence("run search"))?;

        let mut matches = Vec::new();
        for row in rows {
            let (raw, encrypted_search) = row.map_err(VaultError::persistence("read entry"))?;
            let plain = Zeroizing::new(cipher::decrypt(key, &encrypted_search)?);
            let haystack = Zeroizing::new(String::from_utf8_lossy(&plain).to_lowercase());
            if terms.iter().all(|t| haystack.contains(t.as_str())) {
                matches.push(raw.into_summary()?);
            }
        }
        Ok(matches)
    }

    /// Number of entries in the vault.
    pub fn count_entries(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .map_err(VaultError::persistence("count entries"))?;
        usize::try_from(count)
            .map_err(|_| VaultError::Serialization(format!("invalid entry count {count}")))
    }

    // ------------------------------------------------------------------
    // Update / delete
    // ------------------------------------------------------------------

    /// Re-encrypt an existing entry with the given field values.
    ///
    /// The entry is addressed by `entry.id`.  `created_at` is taken from
    /// the database, not from the argument; `updated_at` becomes now.
    pub fn update_entry(&self, entry: &Entry, key: &[u8]) -> Result<Entry> {
        if entry.id.is_empty() {
            return Err(VaultError::Validation("entry id cannot be empty".into()));
        }
        validate_fields(&entry.name, &entry.password)?;
        validate_key(key)?;

        let created: String = self
            .conn
            .query_row(
                "SELECT created_at FROM entries WHERE id = ?1",
                params![entry.id],
                |row| row.get(0),
            )
            .optional()
            .map_err(VaultError::persistence("query entry"))?
            .ok_or_else(|| VaultError::NotFound(entry.id.clone()))?;

        let name = entry.name.trim().to_string();
        if self.name_taken(&name, Some(&entry.id))? {
            return Err(VaultError::DuplicateName(name));
        }

        let now = Utc::now();
        let updated = Entry {
            name,
            category: normalize_category(&entry.category),
            created_at: parse_timestamp(&created)?,
            updated_at: now,
            ..entry.clone()
        };

        let sealed = seal(&updated, key)?;
        let changed = self
            .conn
            .execute(
                "UPDATE entries
                 SET name = ?1, category = ?2, encrypted_payload = ?3, encrypted_search = ?4,
                     payload_nonce = ?5, search_nonce = ?6, updated_at = ?7
                 WHERE id = ?8",
                params![
                    updated.name,
                    updated.category,
                    sealed.payload,
                    sealed.search,
                    cipher::nonce_of(&sealed.payload),
                    cipher::nonce_of(&sealed.search),
                    format_timestamp(&now),
                    updated.id,
                ],
            )
            .map_err(|e| write_error(e, &updated.name, "update entry"))?;

        if changed == 0 {
            return Err(VaultError::NotFound(updated.id));
        }

        tracing::debug!(id = %updated.id, "entry updated");
        Ok(updated)
    }

    /// Permanently remove an entry.
    pub fn delete_entry(&self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(VaultError::Validation("entry id cannot be empty".into()));
        }
        let removed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id])
            .map_err(VaultError::persistence("delete entry"))?;
        if removed == 0 {
            return Err(VaultError::NotFound(id.to_string()));
        }

        tracing::debug!(id, "entry deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Re-keying
    // ------------------------------------------------------------------

    /// Change the master password.
    ///
    /// Generates a new salt, derives a new key with `cost`, re-encrypts
    /// every entry and rewrites salt, parameters and verifier in a single
    /// transaction.  Entry timestamps are left untouched.
    pub fn change_password(
        &self,
        old_key: &[u8],
        new_password: &[u8],
        cost: &CostParams,
    ) -> Result<DerivedKey> {
        validate_key(old_key)?;
        self.verify_key(old_key)?;
        cost.validate()?;
        check_cipher_key_length(cost)?;

        let salt = generate_salt()?;
        let new_key = derive_key(new_password, &salt, cost)?;
        validate_key(new_key.as_bytes())?;
        let key_check = compute_key_check(new_key.as_bytes())?;

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(VaultError::persistence("begin transaction"))?;

        let blobs = {
            let mut stmt = self
                .conn
                .prepare("SELECT id, encrypted_payload, encrypted_search FROM entries")
                .map_err(VaultError::persistence("prepare re-key"))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Vec<u8>>(1)?,
                        row.get::<_, Vec<u8>>(2)?,
                    ))
                })
                .map_err(VaultError::persistence("read entries"))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(VaultError::persistence("read entries"))?
        };

        for (id, payload, search) in &blobs {
            let payload = Zeroizing::new(cipher::decrypt(old_key, payload)?);
            let search = Zeroizing::new(cipher::decrypt(old_key, search)?);
            let payload = cipher::encrypt(new_key.as_bytes(), &payload)?;
            let search = cipher::encrypt(new_key.as_bytes(), &search)?;

            self.conn
                .execute(
                    "UPDATE entries
                     SET encrypted_payload = ?1, encrypted_search = ?2,
                         payload_nonce = ?3, search_nonce = ?4
                     WHERE id = ?5",
                    params![
                        payload,
                        search,
                        cipher::nonce_of(&payload),
                        cipher::nonce_of(&search),
                        id
                    ],
                )
                .map_err(VaultError::persistence("re-encrypt entry"))?;
        }

        self.set_salt(&salt)?;
        self.set_params(cost)?;
        self.set_meta(META_KEY_CHECK, &BASE64.encode(key_check))?;
        tx.commit()
            .map_err(VaultError::persistence("commit re-key"))?;

        tracing::info!(entries = blobs.len(), "master password changed");
        Ok(new_key)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn name_taken(&self, name: &str, except_id: Option<&str>) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM entries WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(VaultError::persistence("check entry name"))?;

        Ok(match (found, except_id) {
            (Some(id), Some(except)) => id != except,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    fn query_summaries(
        &self,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<EntrySummary>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(VaultError::persistence("prepare listing"))?;
        let rows = stmt
            .query_map(args, RawSummary::from_row)
            .map_err(VaultError::persistence("list entries"))?;

        let mut entries = Vec::new();
        for row in rows {
            let raw = row.map_err(VaultError::persistence("read entry"))?;
            entries.push(raw.into_summary()?);
        }
        Ok(entries)
    }
}

fn validate_fields(name: &str, password: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(VaultError::Validation("entry name cannot be empty".into()));
    }
    if password.is_empty() {
        return Err(VaultError::Validation(
            "entry password cannot be empty".into(),
        ));
    }
    Ok(())
}

fn validate_key(key: &[u8]) -> Result<()> {
    if key.len() != KEY_LEN {
        return Err(VaultError::Validation(format!(
            "encryption key must be {KEY_LEN} bytes (got {})",
            key.len()
        )));
    }
    Ok(())
}

/// Serialize and encrypt the payload and the search text, each with its
/// own fresh nonce.
fn seal(entry: &Entry, key: &[u8]) -> Result<SealedEntry> {
    let payload = EntryPayload {
        username: entry.username.clone(),
        password: entry.password.clone(),
        url: entry.url.clone(),
        notes: entry.notes.clone(),
        tags: entry.tags.clone(),
    };
    let json = Zeroizing::new(
        serde_json::to_vec(&payload)
            .map_err(|e| VaultError::Serialization(format!("entry payload: {e}")))?,
    );
    let text = Zeroizing::new(search_text(
        &entry.name,
        &entry.category,
        &entry.tags,
        &entry.username,
        &entry.url,
    ));

    Ok(SealedEntry {
        payload: cipher::encrypt(key, &json)?,
        search: cipher::encrypt(key, text.as_bytes())?,
    })
}

fn open_payload(key: &[u8], encrypted: &[u8]) -> Result<EntryPayload> {
    let json = Zeroizing::new(cipher::decrypt(key, encrypted)?);
    serde_json::from_slice(&json)
        .map_err(|e| VaultError::Serialization(format!("entry payload: {e}")))
}

/// Map a write error, turning a unique-name violation into `DuplicateName`.
fn write_error(err: rusqlite::Error, name: &str, context: &str) -> VaultError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            VaultError::DuplicateName(name.to_string())
        }
        other => VaultError::persistence(context)(other),
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| VaultError::Serialization(format!("timestamp '{raw}': {e}")))
}
