//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, and each subcommand
//! responds to `--help` with appropriate text. None of these touch the network.

#![allow(deprecated)] // cargo_bin deprecation; replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `dramaid` binary.
fn dramaid() -> Command {
    Command::cargo_bin("dramaid").expect("binary 'dramaid' should be built")
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    dramaid()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: dramaid"))
        .stdout(predicate::str::contains("home"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("load"))
        .stdout(predicate::str::contains("links"));
}

#[test]
fn version_flag_shows_semver() {
    dramaid()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^dramaid \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    dramaid()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: dramaid"));
}

#[test]
fn invalid_subcommand_fails() {
    dramaid()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn home_help() {
    dramaid()
        .args(["home", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List a home section page"))
        .stdout(predicate::str::contains("--section"))
        .stdout(predicate::str::contains("--page"));
}

#[test]
fn links_help() {
    dramaid()
        .args(["links", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve playable links"))
        .stdout(predicate::str::contains("<URL>"));
}

// ─── Subcommand argument validation ──────────────────────────────────────────

#[test]
fn search_missing_query_fails() {
    dramaid()
        .arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<QUERY>"));
}

#[test]
fn load_missing_url_fails() {
    dramaid()
        .arg("load")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[test]
fn home_rejects_non_numeric_page() {
    dramaid()
        .args(["home", "--page", "two"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn malformed_config_file_fails_before_network() {
    let dir = std::env::temp_dir().join(format!("dramaid-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();

    dramaid()
        .args(["--config", path.to_str().unwrap(), "search", "love"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid TOML"));

    std::fs::remove_dir_all(&dir).ok();
}
