use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

#[allow(deprecated)]
fn get_webpunch_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("webpunch")
}

fn set_full_config(dir: &Path) {
    Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir)
        .args([
            "config",
            "set",
            "--url",
            "https://portal.example.com/login",
            "--user-id",
            "emp042",
            "--password",
            "s3cret-p@ss",
        ])
        .assert()
        .success();
}

#[test]
fn test_config_set_persists_and_encrypts_password() {
    let dir = tempfile::tempdir().unwrap();
    set_full_config(dir.path());

    let config_path = dir.path().join("config.json");
    assert!(config_path.exists());

    // The document must not contain the plaintext password.
    let raw = std::fs::read_to_string(&config_path).unwrap();
    assert!(!raw.contains("s3cret-p@ss"));
    assert!(raw.contains("emp042"));
}

#[test]
fn test_config_set_rejects_invalid_url() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir")
        .arg(dir.path())
        .args(["config", "set", "--url", "not a url"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid URL"));
}

#[test]
fn test_config_set_rejects_unknown_selector_role() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir")
        .arg(dir.path())
        .args(["config", "set", "--selector", "frobnicator=x"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown locator role"));
}

#[test]
fn test_config_set_rejects_malformed_auto_end() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir")
        .arg(dir.path())
        .args(["config", "set", "--auto-end", "25:99"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("expected HH:MM"));
}

#[test]
fn test_config_set_selector_override_shows_up() {
    let dir = tempfile::tempdir().unwrap();
    set_full_config(dir.path());

    Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
        .args(["config", "set", "--selector", "login_button=signin-btn"])
        .assert()
        .success();

    let output = Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let doc: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(doc["selectors"]["login_button"], "signin-btn");
    // Untouched roles resolve to their default identifier.
    assert_eq!(doc["selectors"]["clock_in_button"], "clock_in_button");
    // Credentials survive a selector-only edit.
    assert_eq!(doc["user_id"], "emp042");
    assert_eq!(doc["password"], "********");
}

#[test]
fn test_config_show_masks_password() {
    let dir = tempfile::tempdir().unwrap();
    set_full_config(dir.path());

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir").arg(dir.path()).args(["config", "show"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("s3cret-p@ss").not());
}

#[test]
fn test_config_set_auto_end_and_headless_options() {
    let dir = tempfile::tempdir().unwrap();
    set_full_config(dir.path());

    Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
        .args(["config", "set", "--auto-end", "17:30", "--no-headless"])
        .assert()
        .success();

    let output = Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let doc: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(doc["auto_end"]["enabled"], true);
    assert_eq!(doc["auto_end"]["time"], "17:30");
    assert_eq!(doc["headless_mode"], false);

    // --no-auto-end turns the schedule off but keeps the time.
    Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
        .args(["config", "set", "--no-auto-end"])
        .assert()
        .success();

    let output = Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let doc: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(doc["auto_end"]["enabled"], false);
    assert_eq!(doc["auto_end"]["time"], "17:30");
}

#[test]
fn test_config_reset_deletes_document_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    set_full_config(dir.path());
    assert!(dir.path().join("config.json").exists());

    Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
        .args(["config", "reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    assert!(!dir.path().join("config.json").exists());

    // Resetting again still succeeds.
    Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
        .args(["config", "reset", "--yes"])
        .assert()
        .success();
}

#[test]
fn test_config_set_partial_update_keeps_other_fields() {
    let dir = tempfile::tempdir().unwrap();
    set_full_config(dir.path());

    Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
        .args(["config", "set", "--user-id", "emp999"])
        .assert()
        .success();

    let output = Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let doc: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(doc["configured"], true);
    assert_eq!(doc["user_id"], "emp999");
    assert_eq!(doc["url"], "https://portal.example.com/login");
    assert_eq!(doc["password_set"], true);
}
