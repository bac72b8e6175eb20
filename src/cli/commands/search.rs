//! `passvault search` — find entries by their encrypted search text.

use crate::cli::output;
use crate::cli::{load_settings, open_vault, unlock, vault_path, Cli};
use crate::errors::Result;

/// Execute the `search` command.
pub fn execute(cli: &Cli, terms: &[String]) -> Result<()> {
    let (cwd, settings) = load_settings()?;
    let path = vault_path(cli, &cwd, &settings);
    let vault = open_vault(&path)?;
    let key = unlock(&vault, &settings)?;

    let query = terms.join(" ");
    let matches = vault.search_entries(&query, key.as_bytes())?;

    output::info(&format!("{} match(es) for '{query}'", matches.len()));
    output::print_entries_table(&matches);

    Ok(())
}
