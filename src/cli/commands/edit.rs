//! `passvault edit` — change fields of an existing entry.
//!
//! Fields passed as flags are applied directly.  With no flags at all
//! (and a terminal attached) every field is prompted for, pre-filled with
//! its current value.

use std::io::{self, IsTerminal};

use dialoguer::Input;

use crate::cli::output;
use crate::cli::{confirm, load_settings, open_vault, unlock, vault_path, Cli, EntryFields};
use crate::errors::{Result, VaultError};
use crate::password::{check_strength, generate};
use crate::vault::Entry;

/// Flags accepted by `edit`, bundled for `execute`.
pub struct EditArgs<'a> {
    pub rename: Option<&'a str>,
    pub fields: &'a EntryFields,
    pub password: Option<&'a str>,
    pub generate: bool,
    pub gen_length: Option<usize>,
}

impl EditArgs<'_> {
    fn is_empty(&self) -> bool {
        self.rename.is_none()
            && self.fields.category.is_none()
            && self.fields.username.is_none()
            && self.fields.url.is_none()
            && self.fields.notes.is_none()
            && self.fields.tags.is_none()
            && self.password.is_none()
            && !self.generate
    }
}

/// Execute the `edit` command.
pub fn execute(cli: &Cli, name: &str, args: &EditArgs<'_>) -> Result<()> {
    let (cwd, settings) = load_settings()?;
    let path = vault_path(cli, &cwd, &settings);
    let vault = open_vault(&path)?;

    let id = vault.find_id_by_name(name)?;
    let key = unlock(&vault, &settings)?;
    let mut entry = vault.get_entry(&id, key.as_bytes())?;
    let mut prompted_password = false;

    if args.is_empty() {
        if !io::stdin().is_terminal() {
            return Err(VaultError::CommandFailed(
                "nothing to change — pass at least one field flag".into(),
            ));
        }
        prompt_fields(&mut entry)?;
        if confirm("Change the password?", false)? {
            entry.password = dialoguer::Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
            prompted_password = true;
        }
    } else {
        apply_flags(&mut entry, args);
        if args.generate {
            let length = args.gen_length.unwrap_or(settings.generator.length);
            entry.password = generate(length, &settings.generate_options())?.as_str().to_owned();
        } else if let Some(pw) = args.password {
            output::warning("Password provided on command line — it may appear in shell history.");
            entry.password = pw.to_string();
        }
    }

    let updated = vault.update_entry(&entry, key.as_bytes())?;

    output::success(&format!("Entry '{}' updated", updated.name));
    if typed_new_password(args, prompted_password) {
        output::print_strength(&check_strength(&updated.password));
    }

    Ok(())
}

/// Whether the user chose the new password themselves, either on the
/// command line or at the prompt.  Generated passwords are not scored.
fn typed_new_password(args: &EditArgs<'_>, prompted: bool) -> bool {
    prompted || (args.password.is_some() && !args.generate)
}

fn apply_flags(entry: &mut Entry, args: &EditArgs<'_>) {
    if let Some(name) = args.rename {
        entry.name = name.to_string();
    }
    let fields = args.fields;
    if let Some(category) = &fields.category {
        entry.category = category.clone();
    }
    if let Some(username) = &fields.username {
        entry.username = username.clone();
    }
    if let Some(url) = &fields.url {
        entry.url = url.clone();
    }
    if let Some(notes) = &fields.notes {
        entry.notes = notes.clone();
    }
    if let Some(tags) = &fields.tags {
        entry.tags = tags.clone();
    }
}

fn prompt_fields(entry: &mut Entry) -> Result<()> {
    entry.name = ask("Name", &entry.name)?;
    entry.category = ask("Category", &entry.category)?;
    entry.username = ask("Username", &entry.username)?;
    entry.url = ask("URL", &entry.url)?;
    entry.notes = ask("Notes", &entry.notes)?;

    let tags = ask("Tags (comma-separated)", &entry.tags.join(","))?;
    entry.tags = tags
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    Ok(())
}

fn ask(prompt: &str, current: &str) -> Result<String> {
    Input::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
}
