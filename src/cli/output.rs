//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::password::{StrengthLevel, StrengthReport};
use crate::vault::{Entry, EntrySummary};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of entry summaries (Name, Category, Created, Updated).
pub fn print_entries_table(entries: &[EntrySummary]) {
    if entries.is_empty() {
        info("No entries found.");
        tip("Run `passvault add <NAME>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Category", "Created", "Updated"]);

    for e in entries {
        table.add_row(vec![
            e.name.clone(),
            e.category.clone(),
            e.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            e.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}

/// Print every field of a decrypted entry as a two-column table.
///
/// The password is masked unless `reveal` is set.
pub fn print_entry(entry: &Entry, reveal: bool) {
    let password = if reveal {
        entry.password.clone()
    } else {
        "*".repeat(8)
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Name".to_string(), entry.name.clone()]);
    table.add_row(vec!["Category".to_string(), entry.category.clone()]);
    table.add_row(vec!["Username".to_string(), entry.username.clone()]);
    table.add_row(vec!["Password".to_string(), password]);
    table.add_row(vec!["URL".to_string(), entry.url.clone()]);
    table.add_row(vec!["Tags".to_string(), entry.tags.join(", ")]);
    table.add_row(vec!["Notes".to_string(), entry.notes.clone()]);
    table.add_row(vec![
        "Created".to_string(),
        entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    table.add_row(vec![
        "Updated".to_string(),
        entry.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);

    println!("{table}");
}

/// Print a strength level, colored by how strong it is, plus any hints.
pub fn print_strength(report: &StrengthReport) {
    let label = format!("{} ({}/100)", report.level, report.score);
    let styled = match report.level {
        StrengthLevel::VeryWeak | StrengthLevel::Weak => style(label).red(),
        StrengthLevel::Fair => style(label).yellow(),
        StrengthLevel::Strong | StrengthLevel::VeryStrong => style(label).green(),
    };
    println!("  Strength: {styled}");
    for hint in &report.feedback {
        println!("    {} {}", style("-").dim(), hint);
    }
}
