//! `passvault generate` — print random passwords.

use crate::cli::output;
use crate::cli::{load_settings, Cli};
use crate::errors::{Result, VaultError};
use crate::password::{check_strength, generate, GenerateOptions};

/// Most passwords a single invocation prints.
const MAX_COUNT: usize = 10;

/// Flags accepted by `generate`.
pub struct GenerateArgs {
    pub length: Option<usize>,
    pub count: usize,
    pub no_uppercase: bool,
    pub no_lowercase: bool,
    pub no_digits: bool,
    pub no_symbols: bool,
    pub exclude_ambiguous: bool,
    pub show_strength: bool,
}

/// Execute the `generate` command.
pub fn execute(_cli: &Cli, args: &GenerateArgs) -> Result<()> {
    if !(1..=MAX_COUNT).contains(&args.count) {
        return Err(VaultError::InvalidInput(format!(
            "count must be between 1 and {MAX_COUNT}"
        )));
    }

    let (_, settings) = load_settings()?;
    let length = args.length.unwrap_or(settings.generator.length);
    let options = merge_options(settings.generate_options(), args);

    for i in 0..args.count {
        let password = generate(length, &options)?;
        println!("{}", password.as_str());

        if args.show_strength {
            output::print_strength(&check_strength(&password));
            if i + 1 < args.count {
                println!();
            }
        }
    }

    Ok(())
}

/// Apply the `--no-*` and `--exclude-ambiguous` flags over the configured
/// defaults.
fn merge_options(defaults: GenerateOptions, args: &GenerateArgs) -> GenerateOptions {
    GenerateOptions {
        uppercase: defaults.uppercase && !args.no_uppercase,
        lowercase: defaults.lowercase && !args.no_lowercase,
        digits: defaults.digits && !args.no_digits,
        symbols: defaults.symbols && !args.no_symbols,
        exclude_ambiguous: defaults.exclude_ambiguous || args.exclude_ambiguous,
    }
}
