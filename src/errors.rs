use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Input errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // --- Crypto errors ---
    #[error("Authentication failed — wrong master password or corrupted vault")]
    AuthenticationFailure,

    #[error("Secure random source unavailable: {0}")]
    RandomSourceFailure(String),

    // --- Vault errors ---
    #[error("Vault is not initialized — run `passvault init` first")]
    NotInitialized,

    #[error("Vault is already initialized")]
    AlreadyInitialized,

    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("'{0}' not found")]
    NotFound(String),

    #[error("An entry named '{0}' already exists")]
    DuplicateName(String),

    // --- Generator errors ---
    #[error("Password length must be between {min} and {max} (got {length})")]
    InvalidLength {
        length: usize,
        min: usize,
        max: usize,
    },

    #[error("At least one character class must be enabled")]
    NoCharsetSelected,

    // --- Storage errors ---
    #[error("Storage error ({context}): {source}")]
    Persistence {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl VaultError {
    /// Build a closure that wraps a SQLite error with a short description
    /// of the operation that failed.
    pub(crate) fn persistence(context: &str) -> impl FnOnce(rusqlite::Error) -> Self + '_ {
        move |source| Self::Persistence {
            context: context.to_string(),
            source,
        }
    }
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
