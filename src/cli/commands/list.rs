//! `passvault list` — display entries in a table.
//!
//! Reads only plaintext columns, so no master password is needed.

use crate::cli::output;
use crate::cli::{load_settings, open_vault, vault_path, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, category: Option<&str>) -> Result<()> {
    let (cwd, settings) = load_settings()?;
    let path = vault_path(cli, &cwd, &settings);
    let vault = open_vault(&path)?;

    let entries = match category {
        Some(category) => vault.list_entries_by_category(category)?,
        None => vault.list_entries()?,
    };

    let scope = category
        .map(|c| format!("Category '{c}' — "))
        .unwrap_or_default();
    let noun = if entries.len() == 1 { "entry" } else { "entries" };
    output::info(&format!("{scope}{} {noun}", entries.len()));

    output::print_entries_table(&entries);

    Ok(())
}
