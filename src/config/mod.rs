//! Project configuration (`.passvault.toml`).

pub mod settings;

pub use settings::{Settings, VAULT_FILE_NAME};
