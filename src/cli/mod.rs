//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{Settings, VAULT_FILE_NAME};
use crate::crypto::DerivedKey;
use crate::errors::{Result, VaultError};
use crate::vault::Vault;

/// Minimum master password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the master password (CI/scripts).
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// Environment variable holding the replacement master password.
pub const NEW_PASSWORD_ENV: &str = "PASSVAULT_NEW_PASSWORD";

/// PassVault CLI: local encrypted password manager.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local encrypted password manager",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: from .passvault.toml, else .passvault)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault protected by a master password
    Init,

    /// Add a new entry
    Add {
        /// Unique entry name (e.g. github.com)
        name: String,

        #[command(flatten)]
        fields: EntryFields,

        /// Entry password (omit to be prompted, or use --generate)
        #[arg(short, long)]
        password: Option<String>,

        /// Generate a strong password instead of entering one
        #[arg(short, long, conflicts_with = "password")]
        generate: bool,

        /// Length of the generated password
        #[arg(long)]
        gen_length: Option<usize>,
    },

    /// Show an entry
    Show {
        /// Entry name
        name: String,

        /// Print the password instead of masking it
        #[arg(short, long)]
        reveal: bool,
    },

    /// List entries (no password required)
    List {
        /// Only list entries in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Search entries by name, category, tags, username and URL
    Search {
        /// Search terms; every term must match
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Edit an existing entry
    Edit {
        /// Entry name
        name: String,

        /// Rename the entry
        #[arg(long)]
        rename: Option<String>,

        #[command(flatten)]
        fields: EntryFields,

        /// New password
        #[arg(short, long)]
        password: Option<String>,

        /// Replace the password with a generated one
        #[arg(short, long, conflicts_with = "password")]
        generate: bool,

        /// Length of the generated password
        #[arg(long)]
        gen_length: Option<usize>,
    },

    /// Delete an entry
    Delete {
        /// Entry name
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate random passwords
    Generate {
        /// Password length (4-128)
        #[arg(short, long)]
        length: Option<usize>,

        /// Number of passwords to generate (1-10)
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Exclude uppercase letters
        #[arg(long)]
        no_uppercase: bool,

        /// Exclude lowercase letters
        #[arg(long)]
        no_lowercase: bool,

        /// Exclude digits
        #[arg(long)]
        no_digits: bool,

        /// Exclude symbols
        #[arg(long)]
        no_symbols: bool,

        /// Exclude look-alike characters (0, O, 1, l, I)
        #[arg(long)]
        exclude_ambiguous: bool,

        /// Print a strength analysis under each password
        #[arg(short, long)]
        show_strength: bool,
    },

    /// Show vault metadata (no password required)
    Info,

    /// Change the master password and re-encrypt every entry
    ChangePassword,
}

/// Optional entry fields shared by `add` and `edit`.
#[derive(clap::Args, Default)]
pub struct EntryFields {
    /// Category (e.g. email, social, banking)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Username or email
    #[arg(short, long)]
    pub username: Option<String>,

    /// Website URL
    #[arg(long)]
    pub url: Option<String>,

    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Comma-separated tags
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the current project directory.
pub fn load_settings() -> Result<(PathBuf, Settings)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    Ok((cwd, settings))
}

/// Build the full path to the vault database from the CLI arguments.
///
/// `--vault-dir` wins over the `vault_dir` setting.
pub fn vault_path(cli: &Cli, project_dir: &Path, settings: &Settings) -> PathBuf {
    match &cli.vault_dir {
        Some(dir) => project_dir.join(dir).join(VAULT_FILE_NAME),
        None => settings.vault_path(project_dir),
    }
}

/// Open an existing, initialized vault.
pub fn open_vault(path: &Path) -> Result<Vault> {
    if !path.exists() {
        output::tip("Run `passvault init` to create a vault.");
        return Err(VaultError::VaultNotFound(path.to_path_buf()));
    }
    let vault = Vault::open(path)?;
    if !vault.is_initialized()? {
        return Err(VaultError::NotInitialized);
    }
    Ok(vault)
}

/// Get the master password, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (CI/scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// Respects `env_var` for scripted usage and enforces a minimum length.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(env_var) {
        if pw.chars().count() < MIN_PASSWORD_LEN {
            return Err(VaultError::CommandFailed(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

/// Unlock `vault`, re-prompting after a wrong password up to the
/// configured attempt limit.
///
/// A password supplied through the environment gets exactly one try.
pub fn unlock(vault: &Vault, settings: &Settings) -> Result<DerivedKey> {
    let limit = settings.security.failed_attempts_limit.max(1);
    let scripted = password_from_env(PASSWORD_ENV).is_some();

    let mut attempt = 1;
    loop {
        let password = prompt_password()?;
        match vault.unlock(password.as_bytes()) {
            Ok(key) => return Ok(key),
            Err(VaultError::AuthenticationFailure) if !scripted && attempt < limit => {
                output::warning(&format!(
                    "Wrong master password ({attempt}/{limit} attempts)"
                ));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Ask a yes/no question.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}

/// `true` when `var` holds a non-empty password, i.e. no prompt was shown.
pub(crate) fn password_is_scripted(var: &str) -> bool {
    password_from_env(var).is_some()
}

fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    match std::env::var(var) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn empty_password_variable_is_not_scripted() {
        let var = "PASSVAULT_TEST_SCRIPTED_PASSWORD";
        std::env::remove_var(var);
        assert!(!password_is_scripted(var));

        std::env::set_var(var, "");
        assert!(!password_is_scripted(var));

        std::env::set_var(var, "correct-horse-battery");
        assert!(password_is_scripted(var));
        std::env::remove_var(var);
    }

    #[test]
    fn vault_dir_flag_overrides_settings() {
        let cli = Cli::parse_from(["passvault", "--vault-dir", "elsewhere", "info"]);
        let path = vault_path(&cli, Path::new("/proj"), &Settings::default());
        assert_eq!(path, PathBuf::from("/proj/elsewhere/vault.db"));
    }

    #[test]
    fn vault_dir_defaults_to_settings() {
        let cli = Cli::parse_from(["passvault", "list"]);
        let path = vault_path(&cli, Path::new("/proj"), &Settings::default());
        assert_eq!(path, PathBuf::from("/proj/.passvault/vault.db"));
    }

    #[test]
    fn tags_are_comma_separated() {
        let cli = Cli::parse_from(["passvault", "add", "site", "--tags", "work,code"]);
        match cli.command {
            Commands::Add { fields, .. } => {
                assert_eq!(fields.tags, Some(vec!["work".into(), "code".into()]));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn open_vault_reports_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join(".passvault").join("vault.db");
        assert!(matches!(
            open_vault(&path),
            Err(VaultError::VaultNotFound(_))
        ));
    }
}
