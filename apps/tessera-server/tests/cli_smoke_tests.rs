#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the tessera-server binary

use std::process::{Command, Stdio};

use tempfile::TempDir;

const SECRET: &str = "smoke-test-secret-smoke-test-secret";

fn run_tessera_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tessera-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute tessera-server")
}

fn write_config(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write config file");
    path.to_str().unwrap().to_owned()
}

#[test]
fn help_lists_subcommands_and_flags() {
    let output = run_tessera_server(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--print-config"));
}

#[test]
fn missing_config_file_is_reported() {
    let output = run_tessera_server(&["-c", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {stderr}");
}

#[test]
fn check_accepts_a_complete_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "valid.yaml",
        &format!(
            r#"
server:
  port: 18087
database:
  url: "sqlite::memory:"
auth:
  secret: "{SECRET}"
  access_token_ttl: 10m
"#
        ),
    );

    let output = run_tessera_server(&["--config", &path, "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Configuration is valid"));
}

#[test]
fn check_rejects_a_missing_secret() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "nosecret.yaml", "server:\n  port: 18088\n");

    let output = run_tessera_server(&["--config", &path, "check"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("auth.secret"), "stderr: {stderr}");
}

#[test]
fn check_rejects_unknown_keys() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "typo.yaml", "sever:\n  port: 1\n");

    let output = run_tessera_server(&["--config", &path, "check"]);
    assert!(!output.status.success());
}

#[test]
fn print_config_applies_port_override_and_hides_secret() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "print.yaml",
        &format!("auth:\n  secret: \"{SECRET}\"\n"),
    );

    let output = run_tessera_server(&["--config", &path, "--port", "19999", "--print-config"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let rendered: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rendered["server"]["port"], 19999);
    assert!(!stdout.contains(SECRET));
}

#[test]
fn check_rejects_a_zero_lookup_timeout() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "zero-timeout.yaml",
        &format!("auth:\n  secret: \"{SECRET}\"\nauthority:\n  lookup_timeout: 0s\n"),
    );

    let output = run_tessera_server(&["--config", &path, "check"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("authority.lookup_timeout"), "stderr: {stderr}");
}
