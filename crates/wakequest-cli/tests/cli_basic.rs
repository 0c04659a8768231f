//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against an isolated data
//! directory and verify JSON outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against the given data directory and return output.
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "wakequest-cli", "--"])
        .args(args)
        .env("WAKEQUEST_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\nstderr: {stderr}");
    stdout
}

#[test]
fn help_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["--help"]);
    assert_eq!(code, 0);
}

#[test]
fn add_then_list_shows_armed_alarm() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(
        dir.path(),
        &["alarm", "add", "--time", "06:30", "--label", "E2E", "--repeat", "mon,tue"],
    );
    assert!(stdout.contains("AlarmArmed"), "got: {stdout}");

    let stdout = run_cli_success(dir.path(), &["alarm", "list"]);
    assert!(stdout.contains("E2E"));
    assert!(stdout.contains("\"armed\": true"));
    assert!(stdout.contains("next_occurrence"));
}

#[test]
fn add_rejects_malformed_time() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["alarm", "add", "--time", "25:99"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid time"), "got: {stderr}");
}

/// Create an alarm and return its id, read back via `alarm list`.
fn add_alarm(data_dir: &Path) -> String {
    run_cli_success(data_dir, &["alarm", "add", "--time", "06:30"]);
    let listed = run_cli_success(data_dir, &["alarm", "list"]);
    let alarms: serde_json::Value = serde_json::from_str(&listed).expect("alarm list JSON");
    alarms[0]["id"].as_str().expect("alarm id").to_string()
}

#[test]
fn fire_and_snooze_report_events() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_alarm(dir.path());

    let stdout = run_cli_success(dir.path(), &["ring", "fire", &id]);
    assert!(stdout.contains("AlarmFired"));

    let stdout = run_cli_success(dir.path(), &["ring", "snooze", &id]);
    assert!(stdout.contains("AlarmSnoozed"));
    assert!(stdout.contains("\"snoozes_remaining\": 2"));
}

#[test]
fn mission_start_and_status_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_alarm(dir.path());

    run_cli_success(dir.path(), &["ring", "fire", &id]);
    let stdout = run_cli_success(dir.path(), &["mission", "start", &id]);
    assert!(stdout.contains("prompt"));
    assert!(stdout.contains("\"required\": 3"));

    let stdout = run_cli_success(dir.path(), &["mission", "status"]);
    assert!(stdout.contains(&id));
}

#[test]
fn config_get_and_set_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["config", "get", "defaults.time"]);
    assert_eq!(stdout.trim(), "07:00");

    run_cli_success(dir.path(), &["config", "set", "defaults.time", "06:45"]);
    let stdout = run_cli_success(dir.path(), &["config", "get", "defaults.time"]);
    assert_eq!(stdout.trim(), "06:45");
}

#[test]
fn player_show_starts_at_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["player", "show"]);
    assert!(stdout.contains("\"level\": 1"));
    assert!(stdout.contains("\"total_wakes\": 0"));
}

#[test]
fn audit_on_empty_state_reports_nothing_to_do() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["audit"]);
    assert!(stdout.contains("AuditCompleted"));
    assert!(stdout.contains("\"rearmed\": 0"));
    assert!(stdout.contains("\"cancelled\": 0"));
}
