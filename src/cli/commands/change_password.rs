//! `passvault change-password` — change the master password.
//!
//! Unlocks with the current password, derives a new key from a fresh
//! salt and re-encrypts every entry in one transaction.

use crate::cli::output;
use crate::cli::{load_settings, open_vault, prompt_new_password, unlock, vault_path, Cli};
use crate::cli::NEW_PASSWORD_ENV;
use crate::errors::Result;
use crate::password::check_strength;

/// Execute the `change-password` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (cwd, settings) = load_settings()?;
    let path = vault_path(cli, &cwd, &settings);
    let vault = open_vault(&path)?;

    // 1. Unlock with the current password.
    output::info("Enter your current master password.");
    let old_key = unlock(&vault, &settings)?;

    // 2. Prompt for the new password.
    output::info("Choose your new master password.");
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;
    output::print_strength(&check_strength(&new_password));

    // 3. Re-key with the configured cost parameters.
    let _new_key = vault.change_password(
        old_key.as_bytes(),
        new_password.as_bytes(),
        &settings.cost_params(),
    )?;

    output::success(&format!(
        "Master password changed ({} entries re-encrypted)",
        vault.count_entries()?
    ));

    Ok(())
}
