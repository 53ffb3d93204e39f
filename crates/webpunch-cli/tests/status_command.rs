use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_webpunch_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("webpunch")
}

#[test]
fn test_status_on_fresh_directory_reports_not_configured() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir").arg(dir.path()).arg("status");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("not configured"))
        .stdout(predicate::str::contains("webpunch config set"));
}

#[test]
fn test_status_json_on_fresh_directory() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir")
        .arg(dir.path())
        .arg("status")
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let doc: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(doc["configured"], false);
    assert_eq!(doc["password_set"], false);
    assert_eq!(doc["headless_mode"], true);
    assert_eq!(doc["auto_end"]["enabled"], false);
}

#[test]
fn test_status_reflects_saved_configuration() {
    let dir = tempfile::tempdir().unwrap();

    Command::new(get_webpunch_bin())
        .arg("--config-dir")
        .arg(dir.path())
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

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir").arg(dir.path()).arg("status");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("configured"))
        .stdout(predicate::str::contains("https://portal.example.com/login"))
        .stdout(predicate::str::contains("emp042"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("s3cret-p@ss").not());
}

#[test]
fn test_status_honors_config_dir_env_var() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.env("WEBPUNCH_CONFIG_DIR", dir.path()).arg("status");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("not configured"))
        .stdout(predicate::str::contains(dir.path().to_string_lossy().as_ref()));
}
