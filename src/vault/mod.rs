//! Vault module — the SQLite-backed encrypted store.
//!
//! This module provides:
//! - The `Vault` handle and its schema (`db`)
//! - Salt, KDF parameters and key/value metadata (`metadata`)
//! - `Entry`, `NewEntry` and `EntrySummary` types (`entry`)
//! - Encrypted create/read/update/delete, search and re-keying (`store`)

pub mod db;
pub mod entry;
pub mod metadata;
pub mod store;

// Re-export the most commonly used items.
pub use db::Vault;
pub use entry::{Entry, EntrySummary, NewEntry, DEFAULT_CATEGORY};
pub use metadata::{
    META_ARGON2_PARAMS, META_CREATED_AT, META_KEY_CHECK, META_SALT, META_VERSION, SCHEMA_VERSION,
};
