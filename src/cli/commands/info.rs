//! `passvault info` — show vault metadata without unlocking it.

use comfy_table::{ContentArrangement, Table};

use crate::cli::output;
use crate::cli::{load_settings, open_vault, vault_path, Cli};
use crate::errors::Result;
use crate::vault::{META_CREATED_AT, META_KEY_CHECK, META_VERSION};

/// Execute the `info` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (cwd, settings) = load_settings()?;
    let path = vault_path(cli, &cwd, &settings);
    let vault = open_vault(&path)?;

    let params = vault.get_params()?;
    let version = vault.get_meta(META_VERSION).unwrap_or_else(|_| "unknown".into());
    let created = vault
        .get_meta(META_CREATED_AT)
        .unwrap_or_else(|_| "unknown".into());
    let verifier = if vault.list_meta_keys()?.iter().any(|k| k == META_KEY_CHECK) {
        "yes"
    } else {
        "no"
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Property", "Value"]);
    table.add_row(vec!["Path".to_string(), path.display().to_string()]);
    table.add_row(vec!["Format version".to_string(), version]);
    table.add_row(vec!["Created".to_string(), created]);
    table.add_row(vec![
        "Entries".to_string(),
        vault.count_entries()?.to_string(),
    ]);
    table.add_row(vec![
        "Argon2id".to_string(),
        format!(
            "t={}, m={} KiB, p={}, key={} bytes",
            params.time_cost, params.memory_kib, params.parallelism, params.key_length
        ),
    ]);
    table.add_row(vec!["Key verifier".to_string(), verifier.to_string()]);

    output::info("Vault information:");
    println!("{table}");

    Ok(())
}
