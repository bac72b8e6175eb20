use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use passvault::cli::commands::{edit::EditArgs, generate::GenerateArgs};
use passvault::cli::{Cli, Commands};

/// Environment variable holding the log filter (e.g. `passvault=debug`).
const LOG_ENV: &str = "PASSVAULT_LOG";

fn init_logging() {
    // Log to stderr so command output on stdout stays clean.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(filter)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => passvault::cli::commands::init::execute(&cli),
        Commands::Add {
            ref name,
            ref fields,
            ref password,
            generate,
            gen_length,
        } => passvault::cli::commands::add::execute(
            &cli,
            name,
            fields,
            password.as_deref(),
            generate,
            gen_length,
        ),
        Commands::Show { ref name, reveal } => {
            passvault::cli::commands::show::execute(&cli, name, reveal)
        }
        Commands::List { ref category } => {
            passvault::cli::commands::list::execute(&cli, category.as_deref())
        }
        Commands::Search { ref terms } => passvault::cli::commands::search::execute(&cli, terms),
        Commands::Edit {
            ref name,
            ref rename,
            ref fields,
            ref password,
            generate,
            gen_length,
        } => passvault::cli::commands::edit::execute(
            &cli,
            name,
            &EditArgs {
                rename: rename.as_deref(),
                fields,
                password: password.as_deref(),
                generate,
                gen_length,
            },
        ),
        Commands::Delete { ref name, force } => {
            passvault::cli::commands::delete::execute(&cli, name, force)
        }
        Commands::Generate {
            length,
            count,
            no_uppercase,
            no_lowercase,
            no_digits,
            no_symbols,
            exclude_ambiguous,
            show_strength,
        } => passvault::cli::commands::generate::execute(
            &cli,
            &GenerateArgs {
                length,
                count,
                no_uppercase,
                no_lowercase,
                no_digits,
                no_symbols,
                exclude_ambiguous,
                show_strength,
            },
        ),
        Commands::Info => passvault::cli::commands::info::execute(&cli),
        Commands::ChangePassword => passvault::cli::commands::change_password::execute(&cli),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
