use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::CostParams;
use crate::errors::{Result, VaultError};
use crate::password::GenerateOptions;

/// File name of the vault database inside the vault directory.
pub const VAULT_FILE_NAME: &str = "vault.db";

/// Project-level configuration, loaded from `.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the vault database.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub clipboard: ClipboardSettings,

    #[serde(default)]
    pub generator: GeneratorSettings,

    #[serde(default)]
    pub security: SecuritySettings,

    /// KDF cost parameters used when creating or re-keying a vault.
    #[serde(default)]
    pub argon2: Argon2Settings,
}

/// Idle time before an unlocked session should be locked again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_timeout")]
    pub timeout_secs: u64,
}

/// How long a copied secret may stay on the clipboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardSettings {
    #[serde(default = "default_clipboard_timeout")]
    pub clear_timeout_secs: u64,
}

/// Defaults for `passvault generate` and generated entry passwords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_generator_length")]
    pub length: usize,
    #[serde(default = "default_true")]
    pub uppercase: bool,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_true")]
    pub digits: bool,
    #[serde(default = "default_true")]
    pub symbols: bool,
    #[serde(default)]
    pub exclude_ambiguous: bool,
}

/// Unlock attempt policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySettings {
    /// Wrong passwords accepted before an interactive unlock gives up.
    #[serde(default = "default_failed_attempts")]
    pub failed_attempts_limit: u32,
    #[serde(default = "default_lockout_duration")]
    pub lockout_duration_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Settings {
    #[serde(default = "default_argon2_time_cost")]
    pub time_cost: u32,

    /// Memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub memory_kib: u32,

    #[serde(default = "default_argon2_parallelism")]
    pub parallelism: u32,

    /// Derived key length in bytes.
    #[serde(default = "default_argon2_key_length")]
    pub key_length: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".passvault".to_string()
}

fn default_session_timeout() -> u64 {
    300
}

fn default_clipboard_timeout() -> u64 {
    30
}

fn default_generator_length() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_failed_attempts() -> u32 {
    5
}

fn default_lockout_duration() -> u64 {
    30
}

fn default_argon2_time_cost() -> u32 {
    3
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_argon2_key_length() -> u32 {
    32
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            session: SessionSettings::default(),
            clipboard: ClipboardSettings::default(),
            generator: GeneratorSettings::default(),
            security: SecuritySettings::default(),
            argon2: Argon2Settings::default(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_session_timeout(),
        }
    }
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self {
            clear_timeout_secs: default_clipboard_timeout(),
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            length: default_generator_length(),
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
            exclude_ambiguous: false,
        }
    }
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            failed_attempts_limit: default_failed_attempts(),
            lockout_duration_secs: default_lockout_duration(),
        }
    }
}

impl Default for Argon2Settings {
    fn default() -> Self {
        Self {
            time_cost: default_argon2_time_cost(),
            memory_kib: default_argon2_memory_kib(),
            parallelism: default_argon2_parallelism(),
            key_length: default_argon2_key_length(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<project_dir>/.passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Build the full path to the vault database.
    ///
    /// Example: `project_dir/.passvault/vault.db`
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir).join(VAULT_FILE_NAME)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn cost_params(&self) -> CostParams {
        CostParams {
            time_cost: self.argon2.time_cost,
            memory_kib: self.argon2.memory_kib,
            parallelism: self.argon2.parallelism,
            key_length: self.argon2.key_length,
        }
    }

    /// Default options for the password generator.
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            uppercase: self.generator.uppercase,
            lowercase: self.generator.lowercase,
            digits: self.generator.digits,
            symbols: self.generator.symbols,
            exclude_ambiguous: self.generator.exclude_ambiguous,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_dir, ".passvault");
        assert_eq!(s.session.timeout_secs, 300);
        assert_eq!(s.clipboard.clear_timeout_secs, 30);
        assert_eq!(s.generator.length, 20);
        assert!(s.generator.symbols);
        assert!(!s.generator.exclude_ambiguous);
        assert_eq!(s.security.failed_attempts_limit, 5);
        assert_eq!(s.security.lockout_duration_secs, 30);
        assert_eq!(s.cost_params(), CostParams::default());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, ".passvault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_dir = "secrets"

[generator]
length = 32
symbols = false
exclude_ambiguous = true

[security]
failed_attempts_limit = 3

[argon2]
time_cost = 1
memory_kib = 8192
parallelism = 1
"#;
        fs::write(tmp.path().join(".passvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, "secrets");
        assert_eq!(settings.generator.length, 32);
        assert_eq!(settings.security.failed_attempts_limit, 3);

        let opts = settings.generate_options();
        assert!(!opts.symbols);
        assert!(opts.uppercase);
        assert!(opts.exclude_ambiguous);

        let cost = settings.cost_params();
        assert_eq!(cost.time_cost, 1);
        assert_eq!(cost.memory_kib, 8_192);
        assert_eq!(cost.key_length, 32);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".passvault.toml"), "[session]\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, ".passvault");
        assert_eq!(settings.session.timeout_secs, 300);
        assert_eq!(settings.argon2.time_cost, 3);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".passvault.toml"), "not valid {{toml").unwrap();

        assert!(matches!(
            Settings::load(tmp.path()),
            Err(VaultError::Config(_))
        ));
    }

    #[test]
    fn vault_path_builds_correct_path() {
        let s = Settings::default();
        let project = Path::new("/home/user/myproject");
        assert_eq!(
            s.vault_path(project),
            PathBuf::from("/home/user/myproject/.passvault/vault.db")
        );
    }

    #[test]
    fn vault_path_respects_custom_vault_dir() {
        let s = Settings {
            vault_dir: "secrets".to_string(),
            ..Settings::default()
        };
        let project = Path::new("/home/user/myproject");
        assert_eq!(
            s.vault_path(project),
            PathBuf::from("/home/user/myproject/secrets/vault.db")
        );
    }
}
