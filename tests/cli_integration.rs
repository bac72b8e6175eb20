//! Integration tests for the PassVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Passwords are supplied through `PASSVAULT_PASSWORD` and
//! `PASSVAULT_NEW_PASSWORD`, so no test ever reaches an interactive prompt.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const MASTER: &str = "correct-horse-battery";

/// Fast KDF settings so every unlock takes milliseconds.
const FAST_CONFIG: &str = r#"
[argon2]
time_cost = 1
memory_kib = 8192
parallelism = 1
"#;

/// Helper: get a Command pointing at the passvault binary.
fn passvault() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("passvault").expect("binary should exist");
    cmd.env_remove("PASSVAULT_PASSWORD")
        .env_remove("PASSVAULT_NEW_PASSWORD")
        .env_remove("PASSVAULT_LOG");
    cmd
}

/// Helper: a project dir with fast settings.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".passvault.toml").write_str(FAST_CONFIG).unwrap();
    tmp
}

/// Helper: a command running inside `dir` with the master password set.
fn unlocked(dir: &TempDir) -> Command {
    let mut cmd = passvault();
    cmd.current_dir(dir.path()).env("PASSVAULT_PASSWORD", MASTER);
    cmd
}

/// Helper: a project with an initialized vault.
fn initialized() -> TempDir {
    let dir = project();
    unlocked(&dir).arg("init").assert().success();
    dir
}

fn add_github(dir: &TempDir) {
    unlocked(dir)
        .args([
            "add",
            "github.com",
            "--password",
            "hunter2-secret",
            "--username",
            "octo",
            "--category",
            "dev",
            "--tags",
            "work,code",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("github.com"));
}

// ---------------------------------------------------------------------------
// Basics
// ---------------------------------------------------------------------------

#[test]
fn help_flag_shows_usage() {
    passvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted password manager"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("change-password"));
}

#[test]
fn version_flag_shows_version() {
    passvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}

#[test]
fn no_args_shows_help() {
    passvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_vault_database() {
    let dir = project();
    unlocked(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault created"));

    dir.child(".passvault/vault.db")
        .assert(predicate::path::exists());
}

#[test]
fn init_twice_fails() {
    let dir = initialized();
    unlocked(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_rejects_short_password() {
    let dir = project();
    passvault()
        .current_dir(dir.path())
        .env("PASSVAULT_PASSWORD", "short")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
}

#[test]
fn vault_dir_flag_is_respected() {
    let dir = project();
    unlocked(&dir)
        .args(["--vault-dir", "custom", "init"])
        .assert()
        .success();
    dir.child("custom/vault.db").assert(predicate::path::exists());
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[test]
fn commands_on_missing_vault_fail() {
    let dir = project();
    passvault()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault not found"));
}

#[test]
fn list_needs_no_password_and_hides_secrets() {
    let dir = initialized();
    add_github(&dir);

    passvault()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("github.com"))
        .stdout(predicate::str::contains("dev"))
        .stdout(predicate::str::contains("hunter2-secret").not())
        .stdout(predicate::str::contains("octo").not());
}

#[test]
fn list_filters_by_category() {
    let dir = initialized();
    add_github(&dir);
    unlocked(&dir)
        .args(["add", "bank", "--password", "pin-1234-xyz"])
        .assert()
        .success();

    passvault()
        .current_dir(dir.path())
        .args(["list", "--category", "general"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bank"))
        .stdout(predicate::str::contains("github.com").not());
}

#[test]
fn show_masks_password_unless_revealed() {
    let dir = initialized();
    add_github(&dir);

    unlocked(&dir)
        .args(["show", "github.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("octo"))
        .stdout(predicate::str::contains("hunter2-secret").not());

    unlocked(&dir)
        .args(["show", "github.com", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2-secret"));
}

#[test]
fn wrong_master_password_is_reported_as_authentication_failure() {
    let dir = initialized();
    add_github(&dir);

    passvault()
        .current_dir(dir.path())
        .env("PASSVAULT_PASSWORD", "not-the-password")
        .args(["show", "github.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));
}

#[test]
fn duplicate_add_fails() {
    let dir = initialized();
    add_github(&dir);

    unlocked(&dir)
        .args(["add", "github.com", "--password", "another-one"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn add_with_generated_password() {
    let dir = initialized();
    unlocked(&dir)
        .args(["add", "generated", "--generate", "--gen-length", "32"])
        .assert()
        .success();

    unlocked(&dir)
        .args(["show", "generated", "--reveal"])
        .assert()
        .success();
}

#[test]
fn search_finds_by_tag_and_username() {
    let dir = initialized();
    add_github(&dir);
    unlocked(&dir)
        .args(["add", "bank", "--password", "pin-1234-xyz"])
        .assert()
        .success();

    unlocked(&dir)
        .args(["search", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("github.com"))
        .stdout(predicate::str::contains("bank").not());

    unlocked(&dir)
        .args(["search", "OCTO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("github.com"));
}

#[test]
fn edit_updates_fields() {
    let dir = initialized();
    add_github(&dir);

    unlocked(&dir)
        .args(["edit", "github.com", "--username", "hubot", "--rename", "gh"])
        .assert()
        .success();

    unlocked(&dir)
        .args(["show", "gh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hubot"));

    unlocked(&dir)
        .args(["show", "github.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn delete_with_force_removes_entry() {
    let dir = initialized();
    add_github(&dir);

    unlocked(&dir)
        .args(["delete", "github.com", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted entry"));

    unlocked(&dir)
        .args(["show", "github.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn info_shows_metadata_without_password() {
    let dir = initialized();
    add_github(&dir);

    passvault()
        .current_dir(dir.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries"))
        .stdout(predicate::str::contains("m=8192 KiB"));
}

#[test]
fn change_password_rekeys_vault() {
    let dir = initialized();
    add_github(&dir);

    unlocked(&dir)
        .env("PASSVAULT_NEW_PASSWORD", "brand-new-master")
        .arg("change-password")
        .assert()
        .success()
        .stdout(predicate::str::contains("Master password changed"));

    unlocked(&dir)
        .args(["show", "github.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));

    passvault()
        .current_dir(dir.path())
        .env("PASSVAULT_PASSWORD", "brand-new-master")
        .args(["show", "github.com", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2-secret"));
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn generate_prints_requested_passwords() {
    let dir = project();
    let output = passvault()
        .current_dir(dir.path())
        .args(["generate", "--length", "32", "--count", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        assert_eq!(line.chars().count(), 32);
    }
}

#[test]
fn generate_without_symbols() {
    let dir = project();
    let output = passvault()
        .current_dir(dir.path())
        .args(["generate", "--length", "64", "--no-symbols"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim().chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn generate_rejects_bad_length() {
    let dir = project();
    passvault()
        .current_dir(dir.path())
        .args(["generate", "--length", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 4 and 128"));
}

#[test]
fn generate_with_no_classes_fails() {
    let dir = project();
    passvault()
        .current_dir(dir.path())
        .args([
            "generate",
            "--no-uppercase",
            "--no-lowercase",
            "--no-digits",
            "--no-symbols",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("character class"));
}
