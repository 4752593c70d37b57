//! CLI smoke tests: argument surface, config failure modes, and
//! anonymous-session behavior that needs no network.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("decanter").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("DECANTER_API_URL")
        .env("DECANTER_API_URL", "http://127.0.0.1:9");
    cmd
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("decanter")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("favorites"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn missing_api_url_is_a_config_error() {
    let home = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("decanter").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("DECANTER_API_URL")
        .arg("whoami")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn whoami_without_a_session_reports_anonymous() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("not logged in"));
}

#[test]
fn favorites_list_without_a_session_is_empty_without_network() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .args(["favorites", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("favorites: empty"));
}

#[test]
fn toggle_without_a_session_demands_authentication() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .args(["favorites", "toggle", "wine-42"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("authentication required"));
}

#[test]
fn config_file_is_honored() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("config.toml");
    std::fs::write(
        &config,
        "[api]\nbase_url = \"http://127.0.0.1:9\"\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("decanter").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("DECANTER_API_URL")
        .args(["--config"])
        .arg(&config)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("not logged in"));
}
