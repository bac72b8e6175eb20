//! `passvault delete` — permanently remove an entry.

use crate::cli::output;
use crate::cli::{confirm, load_settings, open_vault, unlock, vault_path, Cli};
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let (cwd, settings) = load_settings()?;
    let path = vault_path(cli, &cwd, &settings);
    let vault = open_vault(&path)?;

    let id = vault.find_id_by_name(name)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete entry '{name}'?"), false)? {
        output::info("Cancelled.");
        return Ok(());
    }

    // Deleting needs no key, but only the vault owner may do it.
    let _key = unlock(&vault, &settings)?;
    vault.delete_entry(&id)?;

    output::success(&format!("Deleted entry '{name}'"));

    Ok(())
}
