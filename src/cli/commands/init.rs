//! `passvault init` — create a new vault protected by a master password.

use crate::cli::output;
use crate::cli::{
    confirm, load_settings, password_is_scripted, prompt_new_password, vault_path, Cli,
    PASSWORD_ENV,
};
use crate::errors::{Result, VaultError};
use crate::password::{check_strength, StrengthLevel};
use crate::vault::Vault;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (cwd, settings) = load_settings()?;
    let path = vault_path(cli, &cwd, &settings);

    // 1. Refuse to overwrite an existing vault.
    if path.exists() && Vault::open(&path)?.is_initialized()? {
        output::tip("Use `passvault add` to add entries to the existing vault.");
        return Err(VaultError::AlreadyInitialized);
    }

    // 2. Prompt for a new master password and show its strength.
    let password = prompt_new_password(PASSWORD_ENV)?;
    let report = check_strength(&password);
    output::print_strength(&report);

    if report.level < StrengthLevel::Fair
        && !password_is_scripted(PASSWORD_ENV)
        && !confirm("This master password is weak. Use it anyway?", false)?
    {
        return Err(VaultError::UserCancelled);
    }

    // 3. Create the database and derive the key.
    let vault = Vault::open(&path)?;
    let _key = vault.initialize(password.as_bytes(), &settings.cost_params())?;

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `passvault add <NAME>` to add an entry.");
    output::tip("Run `passvault generate` to create a strong password.");

    Ok(())
}
