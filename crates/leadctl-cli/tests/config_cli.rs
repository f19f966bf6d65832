//! Integration tests for the config commands.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    assert!(config_path.exists());

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("# leadctl configuration"));
    assert!(contents.contains("base_url ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    fs::write(&config_path, "# existing config").unwrap();

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_set_url_updates_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", dir.path())
        .args(["config", "set-url", "https://crm.example.test/"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Backend base URL set to https://crm.example.test.",
        ));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains(r#"base_url = "https://crm.example.test""#));
}

#[test]
fn test_config_set_url_preserves_existing_values() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    fs::write(&config_path, "base_url = \"http://old.example.test\"\n").unwrap();

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", dir.path())
        .args(["config", "set-url", "http://new.example.test"])
        .assert()
        .success();

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains(r#"base_url = "http://new.example.test""#));
    assert!(!contents.contains("old.example.test"));
}

#[test]
fn test_config_help_shows_subcommands() {
    cargo_bin_cmd!("leadctl")
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set-url"));
}
