//! `passvault add` — encrypt and store a new entry.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, open_vault, unlock, vault_path, Cli, EntryFields};
use crate::errors::{Result, VaultError};
use crate::password::{check_strength, generate};
use crate::vault::{NewEntry, Vault};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    name: &str,
    fields: &EntryFields,
    password: Option<&str>,
    generated: bool,
    gen_length: Option<usize>,
) -> Result<()> {
    let (cwd, settings) = load_settings()?;
    let path = vault_path(cli, &cwd, &settings);
    let vault = open_vault(&path)?;

    // Fail on a duplicate before asking for any secret.
    ensure_name_free(&vault, name)?;

    let key = unlock(&vault, &settings)?;

    // The entry password comes from one of three sources.
    let secret = if generated {
        let length = gen_length.unwrap_or(settings.generator.length);
        generate(length, &settings.generate_options())?
    } else if let Some(pw) = password {
        output::warning("Password provided on command line — it may appear in shell history.");
        Zeroizing::new(pw.to_string())
    } else {
        Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(format!("Password for {name}"))
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        )
    };

    let new = NewEntry {
        name: name.to_string(),
        category: fields.category.clone().unwrap_or_default(),
        username: fields.username.clone().unwrap_or_default(),
        password: secret.as_str().to_owned(),
        url: fields.url.clone().unwrap_or_default(),
        notes: fields.notes.clone().unwrap_or_default(),
        tags: fields.tags.clone().unwrap_or_default(),
    };

    let entry = vault.create_entry(&new, key.as_bytes())?;

    output::success(&format!(
        "Entry '{}' added to category '{}' ({} total)",
        entry.name,
        entry.category,
        vault.count_entries()?
    ));
    if generated {
        output::info("Generated password stored.");
    } else {
        output::print_strength(&check_strength(&entry.password));
    }
    output::tip(&format!("Run `passvault show {} --reveal` to view it.", entry.name));

    Ok(())
}

fn ensure_name_free(vault: &Vault, name: &str) -> Result<()> {
    match vault.find_id_by_name(name) {
        Ok(_) => Err(VaultError::DuplicateName(name.trim().to_string())),
        Err(VaultError::NotFound(_)) => Ok(()),
        Err(e) => Err(e),
    }
}
