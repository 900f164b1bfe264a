//! CLI integration tests.

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mailsignal() -> Command {
    let mut cmd = cargo_bin_cmd!("mailsignal");
    cmd.env_remove("MAILSIGNAL_MAIL_PASSWORD")
        .env_remove("MAILSIGNAL_WEBHOOK_TOKEN")
        .env_remove("MAILSIGNAL_SMTP_PASSWORD");
    cmd
}

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

const VALID: &str = r#"
[mailbox]
host = "127.0.0.1"
port = 1
account = "trader@icloud.com"
timeout_secs = 1
"#;

#[test]
fn help_lists_commands() {
    mailsignal()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn version_prints_name() {
    mailsignal()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mailsignal"));
}

#[test]
fn run_requires_a_mode() {
    mailsignal()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--mode"));
}

#[test]
fn check_config_accepts_a_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, VALID);

    mailsignal()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("MAILSIGNAL_WEBHOOK_TOKEN is not set"));
}

#[test]
fn check_config_fails_on_invalid_value() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &format!("{VALID}\n[polling]\ninterval_secs = 0\n"));

    let output = mailsignal()
        .args(["check", "config", "--config"])
        .arg(&path)
        .output()
        .expect("run mailsignal");

    assert!(!output.status.success(), "Expected nonzero exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("polling.interval_secs"),
        "Expected error about the interval.\nstderr: {stderr}"
    );
}

#[test]
fn check_config_fails_on_missing_file() {
    mailsignal()
        .args(["check", "config", "--config", "/nonexistent/mailsignal.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn json_errors_are_machine_readable() {
    mailsignal()
        .args(["--json", "check", "config", "--config", "/nonexistent/mailsignal.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"type\":\"error\""));
}

#[test]
fn run_without_password_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, VALID);

    mailsignal()
        .args(["--quiet", "run", "--mode", "local", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("MAILSIGNAL_MAIL_PASSWORD"));
}

#[test]
fn public_mode_without_url_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, VALID);

    mailsignal()
        .args(["run", "--mode", "public", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("webhook.public_url"));
}

#[test]
fn check_alert_refuses_when_disabled() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, VALID);

    mailsignal()
        .args(["check", "alert", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("alerts are disabled"));
}

#[test]
fn check_mailbox_needs_the_password() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, VALID);

    mailsignal()
        .args(["check", "mailbox", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("MAILSIGNAL_MAIL_PASSWORD"));
}
