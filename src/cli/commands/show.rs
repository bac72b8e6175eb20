//! `passvault show` — decrypt and display a single entry.

use crate::cli::output;
use crate::cli::{load_settings, open_vault, unlock, vault_path, Cli};
use crate::errors::Result;

/// Execute the `show` command.
pub fn execute(cli: &Cli, name: &str, reveal: bool) -> Result<()> {
    let (cwd, settings) = load_settings()?;
    let path = vault_path(cli, &cwd, &settings);
    let vault = open_vault(&path)?;

    // Resolve the name first so a typo never costs a key derivation.
    let id = vault.find_id_by_name(name)?;
    let key = unlock(&vault, &settings)?;
    let entry = vault.get_entry(&id, key.as_bytes())?;

    output::print_entry(&entry, reveal);
    if !reveal {
        output::tip("Pass --reveal to show the password.");
    }

    Ok(())
}
