use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_webpunch_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("webpunch")
}

// Punch commands that reach the portal need a browser; these tests only
// exercise the guard path that runs before any launch.

#[test]
fn test_clock_in_fails_when_not_configured() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir").arg(dir.path()).arg("clock-in");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not configured"))
        .stderr(predicate::str::contains("webpunch config set"));
}

#[test]
fn test_clock_out_fails_when_not_configured() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir").arg(dir.path()).arg("clock-out");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_test_login_fails_when_not_configured() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir").arg(dir.path()).arg("test-login");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_partial_configuration_still_blocks_punching() {
    let dir = tempfile::tempdir().unwrap();

    // URL and user id but no password.
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
        ])
        .assert()
        .success();

    let mut cmd = Command::new(get_webpunch_bin());
    cmd.arg("--config-dir").arg(dir.path()).arg("clock-in");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}
